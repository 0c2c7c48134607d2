use crate::core::feed::types::ParsedItem;

use super::markdown::{html_to_markdown, inline_markdown};
use super::paths::iso_timestamp;

/// Item image, then the first media image, then the feed image.
pub fn select_cover<'a>(item: &'a ParsedItem, feed_image: Option<&'a str>) -> Option<&'a str> {
    item.image
        .as_deref()
        .or_else(|| item.media_images.first().map(String::as_str))
        .or(feed_image)
}

/// Renders a complete item note. Key order and key spelling (`cathegories`,
/// `desciption`) are what existing vaults and their views query on.
pub fn render_item_note(
    item: &ParsedItem,
    feed_image: Option<&str>,
) -> Result<String, html2text::Error> {
    let mut note = String::from("---\n");

    note.push_str(&format!(
        "title: {}\n",
        item.title.as_deref().unwrap_or_default().replace(':', " -")
    ));

    note.push_str("authors:\n");
    for author in &item.authors {
        note.push_str(&format!(" - {author}\n"));
    }

    note.push_str("cathegories:\n");
    for category in &item.categories {
        note.push_str(&format!(" - {category}\n"));
    }

    match item.description.as_deref() {
        Some(description) => {
            note.push_str(&format!("desciption: \"{}\"\n", inline_markdown(description)?));
        }
        None => note.push_str("description: \n"),
    }

    note.push_str(&format!(
        "published: {}\n",
        item.published.map(iso_timestamp).unwrap_or_default()
    ));
    note.push_str(&format!(
        "updated: {}\n",
        item.updated.map(iso_timestamp).unwrap_or_default()
    ));
    note.push_str(&format!("id: {}\n", item.id));

    if let Some(cover) = select_cover(item, feed_image) {
        note.push_str(&format!("cover: {cover}\n"));
    }
    note.push_str("---\n");

    if let Some(content) = item.content.as_deref() {
        note.push_str(&html_to_markdown(content)?);
    }

    Ok(note)
}
