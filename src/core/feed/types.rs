use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedItem {
    pub id: String,
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub categories: Vec<String>,
    /// Summary as delivered by the feed, usually html.
    pub description: Option<String>,
    /// Full body html.
    pub content: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub image: Option<String>,
    pub media_images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub self_url: Option<String>,
    pub updated: Option<DateTime<Utc>>,
    pub image: Option<String>,
    pub items: Vec<ParsedItem>,
}
