//! Place-name resolution against the geocoding lookup.
//!
//! Candidate spans come from two places: the left-column lines right below
//! the "OBJET" keyword on page 1, and the tails of known trigger phrases
//! anywhere in the document. Candidates go through token-shape filters and
//! the configured exclusion list before a single lookup decides them.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::rules::patterns::PLACE_TRIGGER_PHRASES;
use crate::geo::GeocodeLookup;
use crate::models::config::{GeocodingConfig, ZoneConfig};
use crate::pdf::{DocumentSource, Word};

/// Left-column lines inspected below "OBJET" during city resolution.
const CITY_OBJET_LINES: usize = 2;

/// Punctuation trimmed from candidate word groups.
const CANDIDATE_TRIM: &[char] = &['.', ',', ';', ':', '-'];

/// Resolves a city/place name for one document.
pub struct PlaceResolver<'a> {
    lookup: &'a dyn GeocodeLookup,
    excluded_terms: &'a [String],
    left_column_ratio: f64,
}

impl<'a> PlaceResolver<'a> {
    pub fn new(
        lookup: &'a dyn GeocodeLookup,
        geocoding: &'a GeocodingConfig,
        zones: &'a ZoneConfig,
    ) -> Self {
        Self {
            lookup,
            excluded_terms: &geocoding.excluded_terms,
            left_column_ratio: zones.left_column_ratio,
        }
    }

    /// Validate one candidate span. Shape filters and the exclusion list
    /// run first; only surviving candidates reach the lookup. A lookup
    /// failure rejects the candidate.
    pub fn resolve_candidate(&self, candidate: &str) -> Option<String> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            return None;
        }
        let lower = trimmed.to_lowercase();

        if lower.split_whitespace().next() == Some("de") {
            return None;
        }
        if trimmed.chars().all(|c| c.is_ascii_digit() || c.is_whitespace()) {
            return None;
        }
        if lower.contains("rte") || lower.contains("kv") {
            return None;
        }
        if trimmed.chars().count() < 3 {
            return None;
        }
        if self.excluded_terms.iter().any(|term| term == &lower) {
            debug!(candidate = trimmed, "candidate on the exclusion list");
            return None;
        }

        match self.lookup.lookup(trimmed) {
            Ok(Some(_)) => Some(trimmed.to_string()),
            Ok(None) => None,
            Err(err) => {
                warn!(candidate = trimmed, error = %err, "lookup failed, candidate rejected");
                None
            }
        }
    }

    /// Try contiguous word groups of 3, then 2, then 1 tokens, scanning
    /// each window length from the end of the text backwards.
    pub fn find_place_in_text(&self, text: &str) -> Option<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return None;
        }

        for length in (1..=3).rev() {
            if words.len() < length {
                continue;
            }
            for end in (length - 1..words.len()).rev() {
                let group = words[end + 1 - length..=end].join(" ");
                let group = group.trim_matches(CANDIDATE_TRIM).trim();
                if let Some(place) = self.resolve_candidate(group) {
                    return Some(place);
                }
            }
        }
        None
    }

    /// Stricter acceptance used when a candidate must actually be a
    /// settlement, administrative area, waterway or road.
    pub fn classify_place(&self, name: &str) -> bool {
        if name.to_lowercase().contains("kv") {
            return false;
        }
        match self.lookup.lookup(name) {
            Ok(Some(place)) => {
                matches!(
                    (place.class.as_str(), place.kind.as_str()),
                    ("place", "city" | "town" | "village") | ("boundary", "administrative")
                ) || matches!(place.class.as_str(), "waterway" | "highway")
            }
            Ok(None) => false,
            Err(err) => {
                warn!(candidate = name, error = %err, "lookup failed during classification");
                false
            }
        }
    }

    /// Two-stage city search: the left-column lines below "OBJET" on page 1
    /// first, then the trigger-phrase tails anywhere in the document.
    pub fn find_city(&self, doc: &dyn DocumentSource, full_text: &str) -> Option<String> {
        for line in left_column_lines(doc, 0, self.left_column_ratio, CITY_OBJET_LINES) {
            if let Some(city) = self.find_place_in_text(&line) {
                info!(%city, "city resolved from the OBJET block");
                return Some(city);
            }
        }

        for pattern in PLACE_TRIGGER_PHRASES.iter() {
            for caps in pattern.captures_iter(full_text) {
                let tail = caps[1].trim().to_string();
                if let Some(city) = self.resolve_candidate(&tail) {
                    info!(%city, "city resolved from a trigger phrase");
                    return Some(city);
                }
                let words: Vec<&str> = tail.split_whitespace().collect();
                if words.len() >= 2 {
                    if let Some(city) = self.resolve_candidate(&words[..2].join(" ")) {
                        info!(%city, "city resolved from a trigger phrase");
                        return Some(city);
                    }
                }
            }
        }
        None
    }
}

/// Up to `line_count` lines of left-column text below the first word
/// starting with "objet" on `page`. Words right of `ratio` times the page
/// width are ignored; the rest are grouped into lines by vertical position
/// and ordered top-to-bottom, left-to-right.
pub fn left_column_lines(
    doc: &dyn DocumentSource,
    page: usize,
    ratio: f64,
    line_count: usize,
) -> Vec<String> {
    let words = match doc.page_words(page) {
        Ok(words) => words,
        Err(err) => {
            warn!(page, error = %err, "word extraction failed");
            return Vec::new();
        }
    };
    let Some(anchor) = words
        .iter()
        .find(|w| w.text.trim().to_lowercase().starts_with("objet"))
    else {
        return Vec::new();
    };
    let anchor_top = anchor.top;

    let boundary = match doc.page_width(page) {
        Ok(width) => width * ratio,
        Err(err) => {
            warn!(page, error = %err, "page width unavailable");
            return Vec::new();
        }
    };

    // group by vertical position rounded to a tenth of a point
    let mut lines: BTreeMap<i64, Vec<&Word>> = BTreeMap::new();
    for word in words
        .iter()
        .filter(|w| w.top > anchor_top && w.x1 < boundary)
    {
        lines
            .entry((word.top * 10.0).round() as i64)
            .or_default()
            .push(word);
    }

    lines
        .into_values()
        .take(line_count)
        .map(|mut line_words| {
            line_words.sort_by(|a, b| {
                a.x0.partial_cmp(&b.x0).unwrap_or(std::cmp::Ordering::Equal)
            });
            line_words
                .iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
