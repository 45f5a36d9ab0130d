//! Free-text extraction from named page zones.

use regex::Regex;

use crate::pdf::{DocumentSource, Result, Zone};

/// Text of the delivery-place zone, with the boilerplate header phrase
/// removed. Internal line breaks are preserved for per-line splitting.
pub fn delivery_zone_text(
    doc: &dyn DocumentSource,
    page: usize,
    zone: &Zone,
    boilerplate: &str,
) -> Result<String> {
    let raw = doc.zone_text(page, zone)?;
    Ok(strip_boilerplate(&raw, boilerplate))
}

/// Remove `phrase` case-insensitively, tolerating line breaks between its
/// words, then trim the ends.
fn strip_boilerplate(text: &str, phrase: &str) -> String {
    let words: Vec<String> = phrase.split_whitespace().map(|w| regex::escape(w)).collect();
    if words.is_empty() {
        return text.trim().to_string();
    }
    match Regex::new(&format!("(?i){}", words.join(r"[\s\r\n]+"))) {
        Ok(pattern) => pattern.replace_all(text, "").trim().to_string(),
        Err(_) => text.trim().to_string(),
    }
}
