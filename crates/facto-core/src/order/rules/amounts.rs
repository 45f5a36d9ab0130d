//! Total-amount detection and French number cleanup.

use tracing::debug;

use super::patterns::{TOTAL_KEYWORD, TOTAL_PATTERNS};

/// Find the document's total on a line containing "total".
///
/// Lines are scanned in order; on each line with the keyword the amount
/// shapes are tried from most to least specific and the first match wins.
/// Nothing is aggregated across lines.
pub fn find_total(text: &str) -> Option<String> {
    for line in text.lines() {
        if !TOTAL_KEYWORD.is_match(line) {
            continue;
        }
        for pattern in TOTAL_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(line) {
                let total = caps[1].to_string();
                debug!(%total, pattern = pattern.as_str(), "total amount found");
                return Some(total);
            }
        }
    }
    None
}

/// Normalize a French-formatted number for callers: thousands dots are
/// removed, the decimal comma kept, trailing decimal zeros stripped and a
/// bare trailing comma dropped. Idempotent.
///
/// `"1.234,50"` becomes `"1234,5"`, `"12,00"` becomes `"12"`.
pub fn clean_number(value: &str) -> String {
    let without_dots = value.replace('.', "");
    match without_dots.split_once(',') {
        Some((integer, decimals)) => {
            let decimals = decimals.trim_end_matches('0');
            if decimals.is_empty() {
                integer.to_string()
            } else {
                format!("{integer},{decimals}")
            }
        }
        None => without_dots,
    }
}
