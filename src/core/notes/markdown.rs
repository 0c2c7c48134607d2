/// Wide enough that html2text never wraps prose paragraphs.
const RENDER_WIDTH: usize = 4096;

pub fn html_to_markdown(html: &str) -> Result<String, html2text::Error> {
    let rendered = html2text::config::plain().string_from_read(html.as_bytes(), RENDER_WIDTH)?;
    Ok(rendered.trim_end().to_string())
}

/// Collapses converted markdown into a single double-quote-safe line.
pub fn inline_markdown(html: &str) -> Result<String, html2text::Error> {
    Ok(html_to_markdown(html)?.replace('\n', "<br>").replace('"', "'"))
}
