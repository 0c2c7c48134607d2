pub mod clock;
pub mod config;
pub mod feed;
pub mod importer;
pub mod notes;
pub mod storage;
pub mod subscription;
pub mod sync;

#[cfg(test)]
pub(crate) mod testing;

use clock::SystemClock;
use config::Config;
use feed::fetcher::{FetchError, HttpFetcher};
use storage::FsVault;
use sync::SyncService;

/// The production wiring: HTTP fetching into a vault on disk.
pub type VaultSync = SyncService<HttpFetcher, FsVault, SystemClock>;

pub fn build_service(config: &Config) -> Result<VaultSync, FetchError> {
    let fetcher = HttpFetcher::new(config.request_timeout)?;
    Ok(SyncService::new(
        fetcher,
        FsVault::new(&config.vault_dir),
        SystemClock,
        config.root_folder.clone(),
    ))
}
