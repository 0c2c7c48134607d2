use serde::{Deserialize, Serialize};

/// Front matter of a feed index note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexFrontmatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(
        rename = "lastChecked",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_checked: Option<String>,
}

/// Splits a document into its YAML header and body.
///
/// Returns `None` when the document does not open with a `---` line or the
/// header is never closed.
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let content = content.trim_start();
    let after_open = content.strip_prefix("---")?;
    let after_open = after_open
        .strip_prefix("\r\n")
        .or_else(|| after_open.strip_prefix('\n'))?;

    if let Some(body) = after_open.strip_prefix("---") {
        return Some(("", body.trim_start_matches(['\r', '\n'])));
    }
    let end = after_open.find("\n---")?;
    let yaml = &after_open[..end];
    let body = after_open[end + 4..].trim_start_matches(['\r', '\n']);
    Some((yaml, body))
}

pub fn parse_index_frontmatter(yaml: &str) -> Result<IndexFrontmatter, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(IndexFrontmatter::default());
    }
    serde_yaml::from_str(yaml)
}

pub fn render_index_frontmatter(frontmatter: &IndexFrontmatter) -> Result<String, serde_yaml::Error> {
    let yaml = serde_yaml::to_string(frontmatter)?;
    let yaml = yaml.strip_prefix("---\n").unwrap_or(&yaml);
    Ok(format!("---\n{}---\n", ensure_trailing_newline(yaml)))
}

fn ensure_trailing_newline(text: &str) -> String {
    if text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{text}\n")
    }
}
