pub mod scheduler;

use std::collections::HashSet;

use serde::Serialize;

use super::clock::Clock;
use super::feed::fetcher::{FeedFetcher, FetchError};
use super::feed::parser::{parse_feed_bytes, FeedParseError};
use super::feed::types::ParsedFeed;
use super::importer::{normalize_url, plan_import, FeedCandidate};
use super::notes::index::render_index_note;
use super::notes::item::render_item_note;
use super::notes::paths::{feed_folder_path, index_note_path, item_note_path};
use super::storage::{Vault, VaultError};
use super::subscription::{extract_feed_url, scan_registrations, FeedRegistration};

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] FeedParseError),
    #[error(transparent)]
    Vault(#[from] VaultError),
    #[error("html conversion failed: {0}")]
    Html(#[from] html2text::Error),
    #[error("front matter serialization failed: {0}")]
    Frontmatter(#[from] serde_yaml::Error),
    #[error("{path} already exists and is not the index note of this feed")]
    AlreadySubscribed { path: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedSyncOutcome {
    pub index_note_path: String,
    pub created_items: usize,
    pub skipped_items: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub synced_feeds: usize,
    pub failed_feeds: usize,
    pub created_items: usize,
    pub skipped_items: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub subscribed: Vec<FeedRegistration>,
    pub duplicates: Vec<FeedCandidate>,
    pub failed: Vec<FeedCandidate>,
}

/// Drives feed synchronisation against a vault. Feeds and items are
/// processed strictly one after another.
#[derive(Debug)]
pub struct SyncService<F, V, C> {
    fetcher: F,
    vault: V,
    clock: C,
    root_folder: String,
}

impl<F, V, C> SyncService<F, V, C>
where
    F: FeedFetcher,
    V: Vault,
    C: Clock,
{
    pub fn new(fetcher: F, vault: V, clock: C, root_folder: impl Into<String>) -> Self {
        Self {
            fetcher,
            vault,
            clock,
            root_folder: root_folder.into(),
        }
    }

    pub fn vault(&self) -> &V {
        &self.vault
    }

    pub async fn registrations(&self) -> Result<Vec<FeedRegistration>, VaultError> {
        scan_registrations(&self.vault, &self.root_folder).await
    }

    /// One full pass over every registered feed. A failing feed is logged and
    /// counted; it never stops the feeds after it.
    pub async fn sync_all(&self) -> Result<SyncReport, SyncError> {
        let registrations = self.registrations().await?;
        tracing::info!(feeds = registrations.len(), "sync pass started");

        let mut report = SyncReport::default();
        for registration in registrations {
            match self.sync_feed(&registration).await {
                Ok(outcome) => {
                    report.synced_feeds += 1;
                    report.created_items += outcome.created_items;
                    report.skipped_items += outcome.skipped_items;
                }
                Err(error) => {
                    tracing::warn!(
                        url = %registration.url,
                        path = %registration.index_note_path,
                        %error,
                        "feed sync failed"
                    );
                    report.failed_feeds += 1;
                }
            }
        }

        tracing::info!(
            synced = report.synced_feeds,
            failed = report.failed_feeds,
            created = report.created_items,
            "sync pass finished"
        );
        Ok(report)
    }

    pub async fn sync_feed(
        &self,
        registration: &FeedRegistration,
    ) -> Result<FeedSyncOutcome, SyncError> {
        let feed = self.fetch_parsed(&registration.url).await?;
        self.apply_feed(registration, &feed).await
    }

    /// Registers `url` by writing its index note, then materialises its items.
    /// A note already at the feed's index path is never taken over: the same
    /// url re-syncs through it, anything else is refused.
    pub async fn subscribe(&self, url: &str) -> Result<FeedSyncOutcome, SyncError> {
        let feed = self.fetch_parsed(url).await?;
        let path = index_note_path(&self.root_folder, feed.title.as_deref());

        if self.vault.file_exists(&path).await? {
            let text = self.vault.read_file(&path).await?;
            return match extract_feed_url(&text) {
                Some(existing) if normalize_url(&existing) == normalize_url(url) => {
                    tracing::info!(url, path = %path, "already subscribed, syncing");
                    let registration = FeedRegistration {
                        url: existing,
                        index_note_path: path,
                    };
                    self.apply_feed(&registration, &feed).await
                }
                _ => Err(SyncError::AlreadySubscribed { path }),
            };
        }

        let registration = FeedRegistration {
            url: url.to_string(),
            index_note_path: path,
        };
        tracing::info!(url, path = %registration.index_note_path, "subscribing");
        self.apply_feed(&registration, &feed).await
    }

    /// Subscribes to every candidate not already registered.
    pub async fn import(&self, candidates: Vec<FeedCandidate>) -> Result<ImportReport, SyncError> {
        let registered: HashSet<String> = self
            .registrations()
            .await?
            .iter()
            .map(|registration| normalize_url(&registration.url))
            .collect();
        let plan = plan_import(candidates, &registered);

        let mut report = ImportReport {
            duplicates: plan.duplicates,
            ..ImportReport::default()
        };
        for candidate in plan.new_feeds {
            match self.subscribe(&candidate.url).await {
                Ok(outcome) => report.subscribed.push(FeedRegistration {
                    url: candidate.url,
                    index_note_path: outcome.index_note_path,
                }),
                Err(error) => {
                    tracing::warn!(url = %candidate.url, %error, "import of feed failed");
                    report.failed.push(candidate);
                }
            }
        }
        Ok(report)
    }

    async fn fetch_parsed(&self, url: &str) -> Result<ParsedFeed, SyncError> {
        let body = self.fetcher.fetch(url).await?;
        Ok(parse_feed_bytes(&body)?)
    }

    async fn apply_feed(
        &self,
        registration: &FeedRegistration,
        feed: &ParsedFeed,
    ) -> Result<FeedSyncOutcome, SyncError> {
        let (created_items, skipped_items) = self.materialize_items(feed).await?;
        let index_note_path = self.write_index_note(registration, feed).await?;
        tracing::info!(
            feed = feed.title.as_deref().unwrap_or_default(),
            created = created_items,
            skipped = skipped_items,
            "feed synced"
        );
        Ok(FeedSyncOutcome {
            index_note_path,
            created_items,
            skipped_items,
        })
    }

    /// Writes a note for every item that has none yet. Returns
    /// `(created, skipped)`.
    async fn materialize_items(&self, feed: &ParsedFeed) -> Result<(usize, usize), SyncError> {
        let folder = feed_folder_path(&self.root_folder, feed.title.as_deref());
        if !self.vault.folder_exists(&folder).await? {
            self.vault.create_folder(&folder).await?;
        }

        let mut created = 0_usize;
        let mut skipped = 0_usize;
        for item in &feed.items {
            let path = item_note_path(
                &self.root_folder,
                feed.title.as_deref(),
                item.title.as_deref(),
                item.published,
            );
            if self.vault.file_exists(&path).await? {
                skipped += 1;
                continue;
            }
            let note = render_item_note(item, feed.image.as_deref())?;
            self.vault.create_file(&path, &note).await?;
            tracing::debug!(path = %path, "item note created");
            created += 1;
        }
        Ok((created, skipped))
    }

    /// Rewrites the index note and moves it to the path matching the feed's
    /// current title. Returns the final path.
    async fn write_index_note(
        &self,
        registration: &FeedRegistration,
        feed: &ParsedFeed,
    ) -> Result<String, SyncError> {
        let target = index_note_path(&self.root_folder, feed.title.as_deref());
        let text = render_index_note(
            &self.root_folder,
            feed,
            &registration.url,
            self.clock.now(),
        )?;

        if self.vault.file_exists(&registration.index_note_path).await? {
            self.vault
                .modify_file(&registration.index_note_path, &text)
                .await?;
            if registration.index_note_path != target {
                tracing::info!(
                    from = %registration.index_note_path,
                    to = %target,
                    "feed title changed, renaming index note"
                );
                self.vault
                    .rename_file(&registration.index_note_path, &target)
                    .await?;
            }
        } else if self.vault.file_exists(&target).await? {
            self.vault.modify_file(&target, &text).await?;
        } else {
            tracing::info!(path = %target, "creating missing index note");
            self.vault.create_folder(&self.root_folder).await?;
            self.vault.create_file(&target, &text).await?;
        }
        Ok(target)
    }
}
