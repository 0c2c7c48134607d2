use std::future::Future;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tokio::io::AsyncWriteExt;

#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("document already exists: {0}")]
    AlreadyExists(String),
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("path escapes the vault: {0}")]
    InvalidPath(String),
}

/// Hierarchical store of plain-text notes addressed by `/`-separated,
/// vault-relative paths.
pub trait Vault {
    /// Every `.md` document in the vault, vault-relative.
    fn list_markdown_files(&self) -> impl Future<Output = Result<Vec<String>, VaultError>> + Send;

    fn folder_exists(&self, path: &str) -> impl Future<Output = Result<bool, VaultError>> + Send;

    fn create_folder(&self, path: &str) -> impl Future<Output = Result<(), VaultError>> + Send;

    fn file_exists(&self, path: &str) -> impl Future<Output = Result<bool, VaultError>> + Send;

    /// Fails with [`VaultError::AlreadyExists`] when something is already at `path`.
    fn create_file(
        &self,
        path: &str,
        content: &str,
    ) -> impl Future<Output = Result<(), VaultError>> + Send;

    fn read_file(&self, path: &str) -> impl Future<Output = Result<String, VaultError>> + Send;

    /// Replaces the full contents of an existing document.
    fn modify_file(
        &self,
        path: &str,
        content: &str,
    ) -> impl Future<Output = Result<(), VaultError>> + Send;

    fn rename_file(&self, from: &str, to: &str)
        -> impl Future<Output = Result<(), VaultError>> + Send;
}

#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, VaultError> {
        let relative = Path::new(path);
        let is_plain = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if path.is_empty() || !is_plain {
            return Err(VaultError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

fn io_error(path: &str, source: std::io::Error) -> VaultError {
    match source.kind() {
        ErrorKind::NotFound => VaultError::NotFound(path.to_string()),
        ErrorKind::AlreadyExists => VaultError::AlreadyExists(path.to_string()),
        _ => VaultError::Io {
            path: path.to_string(),
            source,
        },
    }
}

fn to_vault_path(root: &Path, absolute: &Path) -> Option<String> {
    let relative = absolute.strip_prefix(root).ok()?;
    let segments = relative
        .components()
        .map(|component| component.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(segments.join("/"))
}

impl Vault for FsVault {
    async fn list_markdown_files(&self) -> Result<Vec<String>, VaultError> {
        let root = self.root.clone();
        let walk = tokio::task::spawn_blocking(move || {
            let mut files = Vec::new();
            for entry in walkdir::WalkDir::new(&root).follow_links(false) {
                let entry = entry.map_err(|error| VaultError::Io {
                    path: error
                        .path()
                        .map(|path| path.display().to_string())
                        .unwrap_or_default(),
                    source: error.into(),
                })?;
                // `Path::extension` is `None` for a bare `.md`, the index note of an untitled feed.
                let is_markdown = entry.file_type().is_file()
                    && entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| name.ends_with(".md"));
                if !is_markdown {
                    continue;
                }
                if let Some(path) = to_vault_path(&root, entry.path()) {
                    files.push(path);
                }
            }
            Ok::<_, VaultError>(files)
        });
        walk.await.map_err(|error| VaultError::Io {
            path: self.root.display().to_string(),
            source: std::io::Error::other(error),
        })?
    }

    async fn folder_exists(&self, path: &str) -> Result<bool, VaultError> {
        let target = self.resolve(path)?;
        match tokio::fs::metadata(&target).await {
            Ok(metadata) => Ok(metadata.is_dir()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(false),
            Err(error) => Err(io_error(path, error)),
        }
    }

    async fn create_folder(&self, path: &str) -> Result<(), VaultError> {
        let target = self.resolve(path)?;
        tokio::fs::create_dir_all(&target)
            .await
            .map_err(|error| io_error(path, error))
    }

    async fn file_exists(&self, path: &str) -> Result<bool, VaultError> {
        let target = self.resolve(path)?;
        match tokio::fs::metadata(&target).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(false),
            Err(error) => Err(io_error(path, error)),
        }
    }

    async fn create_file(&self, path: &str, content: &str) -> Result<(), VaultError> {
        let target = self.resolve(path)?;
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .await
            .map_err(|error| io_error(path, error))?;
        file.write_all(content.as_bytes())
            .await
            .map_err(|error| io_error(path, error))?;
        file.flush().await.map_err(|error| io_error(path, error))
    }

    async fn read_file(&self, path: &str) -> Result<String, VaultError> {
        let target = self.resolve(path)?;
        tokio::fs::read_to_string(&target)
            .await
            .map_err(|error| io_error(path, error))
    }

    async fn modify_file(&self, path: &str, content: &str) -> Result<(), VaultError> {
        if !self.file_exists(path).await? {
            return Err(VaultError::NotFound(path.to_string()));
        }
        let target = self.resolve(path)?;
        tokio::fs::write(&target, content)
            .await
            .map_err(|error| io_error(path, error))
    }

    async fn rename_file(&self, from: &str, to: &str) -> Result<(), VaultError> {
        if from == to {
            return Ok(());
        }
        if self.file_exists(to).await? || self.folder_exists(to).await? {
            return Err(VaultError::AlreadyExists(to.to_string()));
        }
        let source = self.resolve(from)?;
        let target = self.resolve(to)?;
        tokio::fs::rename(&source, &target)
            .await
            .map_err(|error| io_error(from, error))
    }
}
