use chrono::{DateTime, SecondsFormat, Utc};

/// Makes a title usable as a single path segment.
pub fn escape_for_path(text: Option<&str>) -> String {
    match text {
        Some(text) => text.replace(':', " -").replace(['/', '\\'], "-"),
        None => String::new(),
    }
}

pub fn feed_folder_path(root: &str, feed_title: Option<&str>) -> String {
    format!("{root}/{}", escape_for_path(feed_title))
}

pub fn index_note_path(root: &str, feed_title: Option<&str>) -> String {
    format!("{}.md", feed_folder_path(root, feed_title))
}

/// `<root>/<feed>/<item>_<published epoch ms>.md`, or `<root>/<feed>/<item>.md`
/// for items without a publish date.
pub fn item_note_path(
    root: &str,
    feed_title: Option<&str>,
    item_title: Option<&str>,
    published: Option<DateTime<Utc>>,
) -> String {
    let folder = feed_folder_path(root, feed_title);
    let name = escape_for_path(item_title);
    match published {
        Some(timestamp) => format!("{folder}/{name}_{}.md", timestamp.timestamp_millis()),
        None => format!("{folder}/{name}.md"),
    }
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-01-02T03:04:05.000Z`.
pub fn iso_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn escaping_replaces_every_separator() {
        assert_eq!(
            escape_for_path(Some("a:b/c\\d::e//")),
            "a -b-c-d - -e--"
        );
        assert_eq!(escape_for_path(Some("plain title")), "plain title");
        assert_eq!(escape_for_path(None), "");
    }

    #[test]
    fn item_path_is_deterministic() {
        let published = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let first = item_note_path("RSS", Some("Tech Blog"), Some("Hello: World"), Some(published));
        let second = item_note_path("RSS", Some("Tech Blog"), Some("Hello: World"), Some(published));

        assert_eq!(first, second);
        assert_eq!(first, "RSS/Tech Blog/Hello - World_1704164645000.md");
    }

    #[test]
    fn item_path_without_publish_date_has_no_suffix() {
        assert_eq!(
            item_note_path("RSS", Some("a/b"), Some("Untimed"), None),
            "RSS/a-b/Untimed.md"
        );
    }

    #[test]
    fn index_path_sits_next_to_feed_folder() {
        assert_eq!(index_note_path("RSS", Some("News: Daily")), "RSS/News - Daily.md");
        assert_eq!(feed_folder_path("RSS", Some("News: Daily")), "RSS/News - Daily");
    }

    #[test]
    fn iso_timestamp_uses_milliseconds_and_zulu() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(iso_timestamp(timestamp), "2024-01-02T03:04:05.000Z");
    }
}
