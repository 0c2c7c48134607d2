//! In-memory collaborators for exercising the sync pipeline without network
//! or disk.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use super::clock::Clock;
use super::feed::fetcher::{FeedFetcher, FetchError};
use super::storage::{parent_folder, Vault, VaultError};

#[derive(Debug, Default)]
pub struct StaticFetcher {
    feeds: Mutex<HashMap<String, Vec<u8>>>,
    calls: AtomicUsize,
}

impl StaticFetcher {
    pub fn serve(&self, url: &str, body: impl Into<Vec<u8>>) {
        self.feeds
            .lock()
            .expect("fetcher lock poisoned")
            .insert(url.to_string(), body.into());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FeedFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.feeds
            .lock()
            .expect("fetcher lock poisoned")
            .get(url)
            .cloned()
            .ok_or(FetchError::HttpStatus(404))
    }
}

#[derive(Debug, Default)]
pub struct MemoryVault {
    files: Mutex<BTreeMap<String, String>>,
    folders: Mutex<BTreeSet<String>>,
    creates: AtomicUsize,
    lose_next_create: AtomicBool,
}

impl MemoryVault {
    pub fn insert(&self, path: &str, content: &str) {
        self.files
            .lock()
            .expect("vault lock poisoned")
            .insert(path.to_string(), content.to_string());
    }

    pub fn get(&self, path: &str) -> Option<String> {
        self.files.lock().expect("vault lock poisoned").get(path).cloned()
    }

    pub fn paths(&self) -> Vec<String> {
        self.files
            .lock()
            .expect("vault lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    pub fn insert_folder(&self, path: &str) {
        let mut folders = self.folders.lock().expect("vault lock poisoned");
        let mut current = String::new();
        for segment in path.split('/') {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(segment);
            folders.insert(current.clone());
        }
    }

    /// Makes the next `create_file` behave as if another writer got there first.
    pub fn fail_next_create_as_existing(&self) {
        self.lose_next_create.store(true, Ordering::SeqCst);
    }

    pub fn has_folder(&self, path: &str) -> bool {
        self.folders.lock().expect("vault lock poisoned").contains(path)
    }

    /// Number of successful `create_file` calls.
    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

impl Vault for MemoryVault {
    async fn list_markdown_files(&self) -> Result<Vec<String>, VaultError> {
        Ok(self
            .paths()
            .into_iter()
            .filter(|path| path.ends_with(".md"))
            .collect())
    }

    async fn folder_exists(&self, path: &str) -> Result<bool, VaultError> {
        Ok(self.has_folder(path))
    }

    async fn create_folder(&self, path: &str) -> Result<(), VaultError> {
        self.insert_folder(path);
        Ok(())
    }

    async fn file_exists(&self, path: &str) -> Result<bool, VaultError> {
        Ok(self.get(path).is_some())
    }

    async fn create_file(&self, path: &str, content: &str) -> Result<(), VaultError> {
        let parent = parent_folder(path);
        if !parent.is_empty() && !self.has_folder(parent) {
            return Err(VaultError::NotFound(parent.to_string()));
        }
        if self.lose_next_create.swap(false, Ordering::SeqCst) {
            return Err(VaultError::AlreadyExists(path.to_string()));
        }
        let mut files = self.files.lock().expect("vault lock poisoned");
        if files.contains_key(path) {
            return Err(VaultError::AlreadyExists(path.to_string()));
        }
        files.insert(path.to_string(), content.to_string());
        self.creates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn read_file(&self, path: &str) -> Result<String, VaultError> {
        self.get(path)
            .ok_or_else(|| VaultError::NotFound(path.to_string()))
    }

    async fn modify_file(&self, path: &str, content: &str) -> Result<(), VaultError> {
        let mut files = self.files.lock().expect("vault lock poisoned");
        match files.get_mut(path) {
            Some(existing) => {
                *existing = content.to_string();
                Ok(())
            }
            None => Err(VaultError::NotFound(path.to_string())),
        }
    }

    async fn rename_file(&self, from: &str, to: &str) -> Result<(), VaultError> {
        if from == to {
            return Ok(());
        }
        let mut files = self.files.lock().expect("vault lock poisoned");
        if files.contains_key(to) {
            return Err(VaultError::AlreadyExists(to.to_string()));
        }
        let content = files
            .remove(from)
            .ok_or_else(|| VaultError::NotFound(from.to_string()))?;
        files.insert(to.to_string(), content);
        Ok(())
    }
}

#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock poisoned")
    }
}
