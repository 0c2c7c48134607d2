use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ROOT_FOLDER: &str = "RSS";
pub const DEFAULT_INTERVAL_MINUTES: u64 = 60;
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
/// One year. Longer periods overflow timer deadlines.
pub const MAX_INTERVAL_MINUTES: u64 = 365 * 24 * 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("vault directory does not exist: {0}")]
    MissingVault(PathBuf),
    #[error("vault path is not a directory: {0}")]
    VaultNotDirectory(PathBuf),
    #[error("root folder must be a single non-empty folder name, got {0:?}")]
    InvalidRootFolder(String),
    #[error("sync interval must be at least one minute")]
    ZeroInterval,
    #[error("sync interval of {0} minutes is too large")]
    IntervalTooLarge(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub vault_dir: PathBuf,
    pub root_folder: String,
    pub interval: Duration,
    pub request_timeout: Duration,
}

impl Config {
    pub fn new(
        vault_dir: PathBuf,
        root_folder: String,
        interval_minutes: u64,
        timeout_secs: u64,
    ) -> Result<Self, ConfigError> {
        let root_folder = root_folder.trim().to_string();
        let is_single_segment = !root_folder.is_empty()
            && root_folder != "."
            && root_folder != ".."
            && !root_folder.contains(['/', '\\']);
        if !is_single_segment {
            return Err(ConfigError::InvalidRootFolder(root_folder));
        }
        if interval_minutes == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if interval_minutes > MAX_INTERVAL_MINUTES {
            return Err(ConfigError::IntervalTooLarge(interval_minutes));
        }

        Ok(Self {
            vault_dir,
            root_folder,
            interval: Duration::from_secs(interval_minutes * 60),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn check_vault(&self) -> Result<(), ConfigError> {
        if !self.vault_dir.exists() {
            return Err(ConfigError::MissingVault(self.vault_dir.clone()));
        }
        if !self.vault_dir.is_dir() {
            return Err(ConfigError::VaultNotDirectory(self.vault_dir.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_durations_from_minutes_and_seconds() {
        let config = Config::new(PathBuf::from("vault"), " RSS ".to_string(), 60, 20)
            .expect("config should build");
        assert_eq!(config.root_folder, "RSS");
        assert_eq!(config.interval, Duration::from_secs(3600));
        assert_eq!(config.request_timeout, Duration::from_secs(20));
    }

    #[test]
    fn rejects_nested_or_empty_root_folder() {
        for root in ["", "RSS/feeds", "..", "a\\b"] {
            let error = Config::new(PathBuf::from("vault"), root.to_string(), 60, 20)
                .expect_err("invalid root must be rejected");
            assert!(matches!(error, ConfigError::InvalidRootFolder(_)));
        }
    }

    #[test]
    fn rejects_zero_interval() {
        let error = Config::new(PathBuf::from("vault"), "RSS".to_string(), 0, 20)
            .expect_err("zero interval must be rejected");
        assert!(matches!(error, ConfigError::ZeroInterval));
    }

    #[test]
    fn rejects_interval_beyond_one_year() {
        for minutes in [MAX_INTERVAL_MINUTES + 1, u64::MAX / 2, u64::MAX] {
            let error = Config::new(PathBuf::from("vault"), "RSS".to_string(), minutes, 20)
                .expect_err("oversized interval must be rejected");
            assert!(matches!(error, ConfigError::IntervalTooLarge(m) if m == minutes));
        }
        let longest = Config::new(PathBuf::from("vault"), "RSS".to_string(), MAX_INTERVAL_MINUTES, 20)
            .expect("one year is accepted");
        assert_eq!(longest.interval, Duration::from_secs(MAX_INTERVAL_MINUTES * 60));
    }

    #[test]
    fn vault_must_be_an_existing_directory() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let file = dir.path().join("note.md");
        std::fs::write(&file, "").expect("write file");

        let ok = Config::new(dir.path().to_path_buf(), "RSS".to_string(), 60, 20).expect("config");
        let missing = Config::new(dir.path().join("nope"), "RSS".to_string(), 60, 20).expect("config");
        let not_dir = Config::new(file, "RSS".to_string(), 60, 20).expect("config");

        assert!(ok.check_vault().is_ok());
        assert!(matches!(missing.check_vault(), Err(ConfigError::MissingVault(_))));
        assert!(matches!(not_dir.check_vault(), Err(ConfigError::VaultNotDirectory(_))));
    }
}
