use feed_rs::model::{Entry, Feed, MediaObject};

use super::types::{ParsedFeed, ParsedItem};

#[derive(Debug, thiserror::Error)]
pub enum FeedParseError {
    #[error("feed payload is empty")]
    EmptyPayload,
    #[error("feed parse error: {0}")]
    Feed(#[from] feed_rs::parser::ParseFeedError),
}

/// Parses an RSS, Atom or JSON Feed document.
pub fn parse_feed_bytes(raw: &[u8]) -> Result<ParsedFeed, FeedParseError> {
    let trimmed = trim_leading_ascii_whitespace(raw);
    if trimmed.is_empty() {
        return Err(FeedParseError::EmptyPayload);
    }
    let feed = feed_rs::parser::parse(trimmed)?;
    Ok(feed_from_model(&feed))
}

fn feed_from_model(feed: &Feed) -> ParsedFeed {
    let self_url = feed
        .links
        .iter()
        .find(|link| link.rel.as_deref() == Some("self"))
        .map(|link| link.href.clone());
    let image = feed
        .logo
        .as_ref()
        .or(feed.icon.as_ref())
        .map(|image| image.uri.clone());

    ParsedFeed {
        title: feed.title.as_ref().map(|text| text.content.clone()),
        description: feed.description.as_ref().map(|text| text.content.clone()),
        self_url,
        updated: feed.updated,
        image,
        items: feed.entries.iter().map(item_from_entry).collect(),
    }
}

fn item_from_entry(entry: &Entry) -> ParsedItem {
    let authors = entry
        .authors
        .iter()
        .map(|person| person.name.clone())
        .collect();
    let categories = entry
        .categories
        .iter()
        .map(|category| {
            category
                .label
                .clone()
                .unwrap_or_else(|| category.term.clone())
        })
        .collect();
    let content = entry
        .content
        .as_ref()
        .and_then(|content| content.body.clone());

    ParsedItem {
        id: entry.id.clone(),
        title: entry.title.as_ref().map(|text| text.content.clone()),
        authors,
        categories,
        description: entry.summary.as_ref().map(|text| text.content.clone()),
        content,
        published: entry.published,
        updated: entry.updated,
        image: first_thumbnail(&entry.media),
        media_images: media_image_urls(&entry.media),
    }
}

fn first_thumbnail(media: &[MediaObject]) -> Option<String> {
    media
        .iter()
        .flat_map(|object| object.thumbnails.iter())
        .map(|thumbnail| thumbnail.image.uri.clone())
        .find(|uri| !uri.trim().is_empty())
}

fn media_image_urls(media: &[MediaObject]) -> Vec<String> {
    media
        .iter()
        .flat_map(|object| object.content.iter())
        .filter(|content| {
            content
                .content_type
                .as_ref()
                .is_some_and(|mime| mime.essence().to_string().starts_with("image/"))
        })
        .filter_map(|content| content.url.as_ref().map(|url| url.as_str().to_string()))
        .collect()
}

fn trim_leading_ascii_whitespace(raw: &[u8]) -> &[u8] {
    let mut index = 0;
    while index < raw.len() && raw[index].is_ascii_whitespace() {
        index += 1;
    }
    &raw[index..]
}
