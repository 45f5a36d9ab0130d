//! PDF document access.
//!
//! The parser only needs per-page text, positioned word tokens and
//! rectangular crops; everything behind [`DocumentSource`] is replaceable,
//! and tests run against an in-memory fake.

mod extractor;

pub use extractor::PdfDocument;

use serde::{Deserialize, Serialize};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// A positioned word token on a page. Coordinates are in points with the
/// origin at the top-left corner of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    pub x0: f64,
    pub x1: f64,
    pub top: f64,
    pub bottom: f64,
}

/// A rectangular region of a page, in points from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl Zone {
    /// Whether the word's center point falls inside this zone.
    pub fn contains_center(&self, word: &Word) -> bool {
        let cx = (word.x0 + word.x1) / 2.0;
        let cy = (word.top + word.bottom) / 2.0;
        cx >= self.x0 && cx <= self.x1 && cy >= self.top && cy <= self.bottom
    }
}

/// Read access to one purchase-order document. Pages are 0-indexed.
pub trait DocumentSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Layout-ordered plain text of one page.
    fn page_text(&self, page: usize) -> Result<String>;

    /// Page width in points.
    fn page_width(&self, page: usize) -> Result<f64>;

    /// Positioned word tokens of one page.
    fn page_words(&self, page: usize) -> Result<Vec<Word>>;

    /// Text confined to a rectangular region of a page, line breaks
    /// preserved.
    fn zone_text(&self, page: usize, zone: &Zone) -> Result<String> {
        let words = self.page_words(page)?;
        let selected: Vec<&Word> = words.iter().filter(|w| zone.contains_center(w)).collect();
        Ok(assemble_lines(selected))
    }
}

/// Vertical distance within which two words count as the same line.
const LINE_TOLERANCE: f64 = 3.0;

/// Order words top-to-bottom then left-to-right and join them into
/// newline-separated lines.
pub(crate) fn assemble_lines(mut words: Vec<&Word>) -> String {
    use std::cmp::Ordering;

    words.sort_by(|a, b| {
        a.top
            .partial_cmp(&b.top)
            .unwrap_or(Ordering::Equal)
            .then(a.x0.partial_cmp(&b.x0).unwrap_or(Ordering::Equal))
    });

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_top = f64::NEG_INFINITY;

    for word in words {
        if !current.is_empty() && (word.top - current_top).abs() < LINE_TOLERANCE {
            current.push(' ');
            current.push_str(&word.text);
        } else {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current = word.text.clone();
            current_top = word.top;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines.join("\n")
}
