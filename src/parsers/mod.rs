pub mod badges;
pub mod dom;

pub use badges::*;
pub use dom::*;

use html_escape::decode_html_entities;
use scraper::ElementRef;

/// Clean and normalize text by removing extra whitespace and decoding HTML entities
pub fn clean_text(text: &str) -> String {
    let decoded = decode_html_entities(text);
    decoded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Visible text of an element, whitespace-collapsed. Text nodes are joined
/// with a space so adjacent inline tags don't fuse words together.
pub fn element_text(el: ElementRef) -> String {
    clean_text(&el.text().collect::<Vec<_>>().join(" "))
}

/// Split a `"Key: Value"` list item on the first colon only. The key is
/// lowercased with spaces and hyphens turned into underscores so it stays
/// stable as a JSON map key.
pub fn split_key_value(text: &str) -> Option<(String, String)> {
    let (key, value) = text.split_once(':')?;
    let key = key
        .trim()
        .to_lowercase()
        .replace(' ', "_")
        .replace('-', "_");
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim().to_string()))
}
