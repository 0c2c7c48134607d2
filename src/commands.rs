use std::path::PathBuf;

use crate::cli::{Cli, Commands};
use crate::core::config::{Config, ConfigError};
use crate::core::feed::fetcher::FetchError;
use crate::core::importer::{parse_candidates, ImportError, ImportFormat};
use crate::core::storage::VaultError;
use crate::core::sync::scheduler::run_every;
use crate::core::sync::SyncError;
use crate::core::{build_service, VaultSync};

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot build http client: {0}")]
    Client(#[from] FetchError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error(transparent)]
    Vault(#[from] VaultError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot encode output: {0}")]
    Json(#[from] serde_json::Error),
}

pub async fn dispatch(cli: Cli) -> Result<(), CommandError> {
    let config = Config::new(
        cli.vault,
        cli.root_folder,
        cli.interval_minutes,
        cli.timeout_secs,
    )?;
    config.check_vault()?;
    let service = build_service(&config)?;
    tracing::debug!(vault = %config.vault_dir.display(), root = %config.root_folder, "service ready");

    match cli.command {
        Commands::Sync => sync_once(&service).await,
        Commands::Watch => {
            let passes = run_every(&service, config.interval, shutdown_signal()).await;
            println!("Stopped after {passes} pass(es)");
            Ok(())
        }
        Commands::Subscribe { url } => {
            let outcome = service.subscribe(&url).await?;
            println!(
                "Subscribed {url} -> {} ({} new item notes)",
                outcome.index_note_path, outcome.created_items
            );
            Ok(())
        }
        Commands::Import { file, format } => import_file(&service, file, format).await,
        Commands::List { json } => list(&service, json).await,
    }
}

async fn sync_once(service: &VaultSync) -> Result<(), CommandError> {
    let report = service.sync_all().await?;
    println!(
        "Synced {} feed(s), {} failed, {} new item note(s), {} already present",
        report.synced_feeds, report.failed_feeds, report.created_items, report.skipped_items
    );
    Ok(())
}

async fn import_file(
    service: &VaultSync,
    file: PathBuf,
    format: Option<ImportFormat>,
) -> Result<(), CommandError> {
    let content = tokio::fs::read_to_string(&file)
        .await
        .map_err(|source| CommandError::Read {
            path: file.clone(),
            source,
        })?;
    let format = format.unwrap_or_else(|| ImportFormat::from_path(&file));
    let candidates = parse_candidates(&content, format)?;
    let report = service.import(candidates).await?;

    for registration in &report.subscribed {
        println!("subscribed\t{}\t{}", registration.url, registration.index_note_path);
    }
    for candidate in &report.duplicates {
        println!("duplicate\t{}", candidate.url);
    }
    for candidate in &report.failed {
        println!("failed\t{}", candidate.url);
    }
    Ok(())
}

async fn list(service: &VaultSync, json: bool) -> Result<(), CommandError> {
    let registrations = service.registrations().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&registrations)?);
        return Ok(());
    }
    for registration in registrations {
        println!("{}\t{}", registration.url, registration.index_note_path);
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "cannot listen for ctrl-c, stopping");
    }
}
