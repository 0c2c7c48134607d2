pub mod vault;

pub use vault::{FsVault, Vault, VaultError};

/// Parent folder of a `/`-separated vault path, empty for top-level documents.
pub fn parent_folder(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

/// Name of the folder directly containing `path`.
pub fn parent_folder_name(path: &str) -> &str {
    let parent = parent_folder(path);
    parent.rsplit('/').next().unwrap_or(parent)
}
