use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;

/// A feed url offered for subscription by an import file.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FeedCandidate {
    pub url: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ImportPlan {
    pub new_feeds: Vec<FeedCandidate>,
    pub duplicates: Vec<FeedCandidate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ImportFormat {
    Opml,
    Urls,
}

impl ImportFormat {
    /// `.opml` and `.xml` files are OPML, everything else a url list.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("opml" | "xml") => Self::Opml,
            _ => Self::Urls,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("invalid OPML content: {0}")]
    Opml(#[from] roxmltree::Error),
}

pub fn parse_candidates(content: &str, format: ImportFormat) -> Result<Vec<FeedCandidate>, ImportError> {
    match format {
        ImportFormat::Opml => parse_opml(content),
        ImportFormat::Urls => Ok(parse_url_list(content)),
    }
}

/// Every `outline` carrying a non-empty `xmlUrl`, at any nesting depth.
pub fn parse_opml(content: &str) -> Result<Vec<FeedCandidate>, ImportError> {
    let doc = roxmltree::Document::parse(content)?;
    let candidates = doc
        .descendants()
        .filter(|node| node.has_tag_name("outline"))
        .filter_map(|node| {
            let url = node.attribute("xmlUrl")?.trim();
            if url.is_empty() {
                return None;
            }
            Some(FeedCandidate {
                url: url.to_string(),
                title: node
                    .attribute("title")
                    .or_else(|| node.attribute("text"))
                    .map(ToString::to_string),
            })
        })
        .collect();
    Ok(candidates)
}

/// One `http(s)://` url per line; blank lines and `#` comments are ignored.
pub fn parse_url_list(input: &str) -> Vec<FeedCandidate> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| line.starts_with("http://") || line.starts_with("https://"))
        .map(|line| FeedCandidate {
            url: line.to_string(),
            title: None,
        })
        .collect()
}

/// Splits candidates into new feeds and ones already registered or repeated
/// earlier in the same input.
pub fn plan_import(candidates: Vec<FeedCandidate>, registered_urls: &HashSet<String>) -> ImportPlan {
    let mut seen = HashSet::new();
    let mut plan = ImportPlan::default();

    for candidate in candidates {
        let normalized = normalize_url(&candidate.url);
        if registered_urls.contains(&normalized) || !seen.insert(normalized) {
            plan.duplicates.push(candidate);
        } else {
            plan.new_feeds.push(candidate);
        }
    }

    plan
}

pub fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_lowercase()
}
