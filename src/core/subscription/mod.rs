//! Recovers feed registrations from the index notes already in the vault.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::core::notes::frontmatter::{parse_index_frontmatter, split_frontmatter};
use crate::core::storage::{parent_folder_name, Vault, VaultError};

/// `url:` line inside a header that is not valid YAML (unquoted values
/// containing `: ` written by older tools).
static LEGACY_URL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^url:[ \t]*(\S.*?)[ \t\r]*$").expect("legacy url pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedRegistration {
    pub url: String,
    pub index_note_path: String,
}

/// Every index note directly under `root` that declares a feed url, sorted by path.
pub async fn scan_registrations<V: Vault>(
    vault: &V,
    root: &str,
) -> Result<Vec<FeedRegistration>, VaultError> {
    let mut registrations = Vec::new();
    for path in vault.list_markdown_files().await? {
        if parent_folder_name(&path) != root || !path.starts_with(root) {
            continue;
        }
        let text = vault.read_file(&path).await?;
        match extract_feed_url(&text) {
            Some(url) => registrations.push(FeedRegistration {
                url,
                index_note_path: path,
            }),
            None => tracing::debug!(path = %path, "index note declares no feed url"),
        }
    }
    registrations.sort_by(|a, b| a.index_note_path.cmp(&b.index_note_path));
    Ok(registrations)
}

/// Feed url declared in a note's front matter.
pub fn extract_feed_url(text: &str) -> Option<String> {
    let (yaml, _) = split_frontmatter(text)?;
    let url = match parse_index_frontmatter(yaml) {
        Ok(frontmatter) => frontmatter.url,
        Err(error) => {
            tracing::debug!(%error, "front matter is not valid yaml, scanning for url line");
            LEGACY_URL_LINE
                .captures(yaml)
                .and_then(|captures| captures.get(1))
                .map(|value| value.as_str().to_string())
        }
    };
    url.map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}
