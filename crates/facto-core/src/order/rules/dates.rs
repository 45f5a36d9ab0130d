//! Date detection and validation.

use tracing::debug;

use super::patterns::{DATE_DOTTED, DATE_LOOSE, DATE_SLASHED, LIVRAISON};

/// Byte window searched around a keyword for a loosely-shaped date.
pub const DATE_WINDOW: usize = 200;

/// Whether (day, month, year) names a real Gregorian calendar date.
///
/// Years are accepted between 1900 and 3000.
pub fn validate_date(day: u32, month: u32, year: u32) -> bool {
    if !(1..=31).contains(&day) || !(1..=12).contains(&month) || !(1900..=3000).contains(&year) {
        return false;
    }
    if matches!(month, 4 | 6 | 9 | 11) && day > 30 {
        return false;
    }
    if month == 2 {
        let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
        return day <= if leap { 29 } else { 28 };
    }
    true
}

/// Find a valid `dd.mm.yyyy` or `dd/mm/yyyy` date in `text`.
///
/// Dotted dates are preferred: slashed dates are only considered when no
/// dotted candidate validates. With `near` given, the match whose start
/// offset is closest to it wins; otherwise the first valid match does.
pub fn find_date(text: &str, near: Option<usize>) -> Option<String> {
    let mut candidates: Vec<(String, usize)> = Vec::new();

    for caps in DATE_DOTTED.captures_iter(text) {
        if validate_captures(&caps) {
            let m = caps.get(0).unwrap();
            candidates.push((m.as_str().to_string(), m.start()));
        }
    }
    if candidates.is_empty() {
        for caps in DATE_SLASHED.captures_iter(text) {
            if validate_captures(&caps) {
                let m = caps.get(0).unwrap();
                candidates.push((m.as_str().to_string(), m.start()));
            }
        }
    }

    match near {
        Some(pos) => candidates
            .into_iter()
            .min_by_key(|(_, start)| start.abs_diff(pos))
            .map(|(date, _)| date),
        None => candidates.into_iter().next().map(|(date, _)| date),
    }
}

fn validate_captures(caps: &regex::Captures<'_>) -> bool {
    let day: u32 = caps[1].parse().unwrap_or(0);
    let month: u32 = caps[2].parse().unwrap_or(0);
    let year: u32 = caps[3].parse().unwrap_or(0);
    validate_date(day, month, year)
}

/// Find the loosely-shaped date closest to `center` within `window` bytes
/// on each side. No calendar validation; separators may be `.`, `-` or `/`
/// and the year may have 2 to 4 digits.
pub fn find_date_in_window(text: &str, center: usize, window: usize) -> Option<String> {
    let mut start = center.saturating_sub(window).min(text.len());
    let mut end = center.saturating_add(window).min(text.len());
    while start < text.len() && !text.is_char_boundary(start) {
        start += 1;
    }
    while end > start && !text.is_char_boundary(end) {
        end -= 1;
    }

    DATE_LOOSE
        .find_iter(&text[start..end])
        .min_by_key(|m| (m.start() + start).abs_diff(center))
        .map(|m| m.as_str().to_string())
}

/// Valid date closest to the first occurrence of "livraison", if any.
pub fn find_global_delivery_date(text: &str) -> Option<String> {
    let anchor = LIVRAISON.find(text)?;
    let date = find_date(text, Some(anchor.start()));
    match &date {
        Some(date) => debug!(%date, "delivery date found near 'livraison'"),
        None => debug!("no valid date near 'livraison'"),
    }
    date
}
