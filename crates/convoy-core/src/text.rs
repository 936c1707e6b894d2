//! Text cleanup for event descriptions.
//!
//! Calendar descriptions frequently arrive as HTML fragments from
//! invitation mails. These helpers strip markup, decode the common
//! entities, and pull out meeting URLs so formatters can render short,
//! speakable text.

use std::sync::LazyLock;

use regex::Regex;

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static ZOOM_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https://[^\s]+zoom[^\s]+").expect("valid regex"));

/// Strips HTML tags, decodes common entities, and collapses whitespace.
///
/// Returns an empty string when the input is markup-only.
pub fn clean_description(raw: &str) -> String {
    let stripped = HTML_TAG.replace_all(raw, "");
    let decoded = decode_entities(&stripped);
    WHITESPACE.replace_all(&decoded, " ").trim().to_string()
}

/// Extracts the first Zoom meeting URL from a description, if any.
pub fn extract_zoom_link(text: &str) -> Option<&str> {
    ZOOM_URL.find(text).map(|m| m.as_str())
}

/// Truncates `text` to at most `max` characters, appending an ellipsis
/// when anything was cut. Cuts on a character boundary.
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max).collect();
    format!("{truncated}...")
}

/// Decodes the named entities that show up in calendar descriptions.
///
/// `&amp;` is decoded last so that double-escaped input stays escaped
/// once, matching what a full HTML unescape would produce.
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
