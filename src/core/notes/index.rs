use chrono::{DateTime, Utc};

use crate::core::feed::types::ParsedFeed;

use super::frontmatter::{render_index_frontmatter, IndexFrontmatter};
use super::paths::{feed_folder_path, iso_timestamp};

/// Renders the feed index note: metadata header plus a cards view over the
/// feed's item folder.
///
/// `registration_url` is written when the feed does not declare a self link,
/// so the note keeps pointing at a fetchable URL.
pub fn render_index_note(
    root: &str,
    feed: &ParsedFeed,
    registration_url: &str,
    checked_at: DateTime<Utc>,
) -> Result<String, serde_yaml::Error> {
    let frontmatter = IndexFrontmatter {
        description: feed.description.clone(),
        url: Some(
            feed.self_url
                .clone()
                .unwrap_or_else(|| registration_url.to_string()),
        ),
        updated: feed.updated.map(iso_timestamp),
        last_checked: Some(iso_timestamp(checked_at)),
    };

    let mut note = render_index_frontmatter(&frontmatter)?;
    note.push_str("# Feed\n");
    note.push_str(&render_base_block(&feed_folder_path(
        root,
        feed.title.as_deref(),
    )));
    Ok(note)
}

fn render_base_block(folder: &str) -> String {
    let folder = folder.replace('\\', "\\\\").replace('"', "\\\"");
    format!(
        r#"```base
filters:
  and:
    - file.inFolder("{folder}")
formulas:
  Untitled: ""
views:
  - type: cards
    name: Feed
    order:
      - file.name
      - authors
      - published
      - desciption
    sort:
      - property: published
        direction: DESC
    cardSize: 400
    image: note.cover
    imageAspectRatio: 0.5

```
"#
    )
}
