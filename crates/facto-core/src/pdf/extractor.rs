//! PDF text access using lopdf, with pdf-extract as plain-text fallback.
//!
//! Positioned words come from interpreting each page's content stream:
//! the text-state operators are tracked (BT/ET, Tf, Td/TD/Tm/T*) and every
//! show-text run (Tj/TJ/') is decoded through the font's encoding, then
//! split into word tokens with estimated advance widths.

use std::path::Path;

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use tracing::{debug, trace, warn};

use super::{assemble_lines, DocumentSource, Result, Word};
use crate::error::PdfError;

/// Fallback page size when no MediaBox is present (A4 portrait, the
/// supported template's format).
const DEFAULT_PAGE_SIZE: (f64, f64) = (595.0, 842.0);

/// Crude per-character advance as a fraction of the font size; real glyph
/// metrics are not needed for column heuristics.
const CHAR_ADVANCE_RATIO: f64 = 0.5;

/// A loaded purchase-order PDF.
pub struct PdfDocument {
    document: Document,
    pages: Vec<ObjectId>,
    raw_data: Vec<u8>,
}

impl PdfDocument {
    /// Load a PDF from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| PdfError::Parse(e.to_string()))?;
        Self::load_mem(&data)
    }

    /// Load a PDF from bytes.
    pub fn load_mem(data: &[u8]) -> Result<Self> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty-password encryption
        let raw_data = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("decrypted PDF with empty password");
            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        if pages.is_empty() {
            return Err(PdfError::NoPages);
        }
        debug!("loaded PDF with {} pages", pages.len());

        Ok(Self {
            document: doc,
            pages,
            raw_data,
        })
    }

    fn page_id(&self, page: usize) -> Result<ObjectId> {
        self.pages
            .get(page)
            .copied()
            .ok_or(PdfError::InvalidPage(page))
    }

    /// Page size from the MediaBox, walking up the page tree for inherited
    /// entries.
    fn page_size(&self, page_id: ObjectId) -> (f64, f64) {
        let mut node_id = Some(page_id);
        while let Some(id) = node_id {
            let Ok(Object::Dictionary(dict)) = self.document.get_object(id) else {
                break;
            };
            if let Ok(media_box) = dict.get(b"MediaBox") {
                if let Ok((_, Object::Array(values))) = self.document.dereference(media_box) {
                    let n: Vec<f64> = values.iter().filter_map(get_number).collect();
                    if n.len() == 4 {
                        return (n[2] - n[0], n[3] - n[1]);
                    }
                }
            }
            node_id = match dict.get(b"Parent") {
                Ok(Object::Reference(parent_id)) => Some(*parent_id),
                _ => None,
            };
        }
        DEFAULT_PAGE_SIZE
    }

    /// Interpret one page's content stream into positioned word tokens.
    fn interpret_page(&self, page_id: ObjectId, page_height: f64) -> Result<Vec<Word>> {
        let doc = &self.document;
        let fonts = doc.get_page_fonts(page_id).unwrap_or_default();
        let content_data = doc
            .get_page_content(page_id)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
        let content =
            Content::decode(&content_data).map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        let mut words = Vec::new();
        let mut current_font = String::new();
        let mut font_size: f64 = 12.0;
        let mut text_matrix = [1.0f64, 0.0, 0.0, 1.0, 0.0, 0.0];
        let mut line_matrix = [1.0f64, 0.0, 0.0, 1.0, 0.0, 0.0];
        let mut in_text_block = false;

        for op in &content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    text_matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
                    line_matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
                }
                "ET" => {
                    in_text_block = false;
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Ok(name) = op.operands[0].as_name() {
                            current_font = String::from_utf8_lossy(name).to_string();
                        }
                        if let Some(size) = get_number(&op.operands[1]) {
                            font_size = size;
                        }
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                        line_matrix[4] += tx;
                        line_matrix[5] += ty;
                        text_matrix = line_matrix;
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        for (i, operand) in op.operands.iter().take(6).enumerate() {
                            text_matrix[i] = get_number(operand)
                                .unwrap_or(if i == 0 || i == 3 { 1.0 } else { 0.0 });
                        }
                        line_matrix = text_matrix;
                    }
                }
                "T*" => {
                    line_matrix[5] -= font_size * 1.2;
                    text_matrix = line_matrix;
                }
                "Tj" => {
                    if in_text_block && !op.operands.is_empty() {
                        if let Some(text) =
                            decode_text_operand(&op.operands[0], doc, &fonts, &current_font)
                        {
                            push_run(
                                &mut words,
                                &text,
                                text_matrix[4],
                                text_matrix[5],
                                font_size,
                                page_height,
                            );
                        }
                    }
                }
                "TJ" => {
                    if in_text_block && !op.operands.is_empty() {
                        if let Ok(array) = op.operands[0].as_array() {
                            let mut combined = String::new();
                            for element in array {
                                if let Some(text) =
                                    decode_text_operand(element, doc, &fonts, &current_font)
                                {
                                    combined.push_str(&text);
                                }
                            }
                            push_run(
                                &mut words,
                                &combined,
                                text_matrix[4],
                                text_matrix[5],
                                font_size,
                                page_height,
                            );
                        }
                    }
                }
                "'" => {
                    line_matrix[5] -= font_size * 1.2;
                    text_matrix = line_matrix;
                    if !op.operands.is_empty() {
                        if let Some(text) =
                            decode_text_operand(&op.operands[0], doc, &fonts, &current_font)
                        {
                            push_run(
                                &mut words,
                                &text,
                                text_matrix[4],
                                text_matrix[5],
                                font_size,
                                page_height,
                            );
                        }
                    }
                }
                _ => {}
            }
        }

        trace!("interpreted {} word tokens", words.len());
        Ok(words)
    }

    /// Per-page slice of pdf-extract's full-document text, used when the
    /// content interpreter yields nothing for a page.
    fn fallback_page_text(&self, page: usize) -> Result<String> {
        let full = pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
        let lines: Vec<&str> = full.lines().collect();
        let page_count = self.pages.len();
        let per_page = lines.len() / page_count;

        let start = page * per_page;
        let end = (page + 1) * per_page;
        Ok(lines[start.min(lines.len())..end.min(lines.len())].join("\n"))
    }
}

impl DocumentSource for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, page: usize) -> Result<String> {
        let words = self.page_words(page)?;
        if words.is_empty() {
            warn!(page, "no positioned text on page, using fallback extraction");
            return self.fallback_page_text(page);
        }
        Ok(assemble_lines(words.iter().collect()))
    }

    fn page_width(&self, page: usize) -> Result<f64> {
        let page_id = self.page_id(page)?;
        Ok(self.page_size(page_id).0)
    }

    fn page_words(&self, page: usize) -> Result<Vec<Word>> {
        let page_id = self.page_id(page)?;
        let (_, height) = self.page_size(page_id);
        self.interpret_page(page_id, height)
    }
}

fn get_number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

/// Decode a show-text operand through the current font's encoding.
fn decode_text_operand(
    obj: &Object,
    doc: &Document,
    fonts: &std::collections::BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    current_font: &str,
) -> Option<String> {
    if let Object::String(bytes, _) = obj {
        if let Some(font_dict) = fonts.get(current_font.as_bytes()) {
            if let Ok(encoding) = font_dict.get_font_encoding(doc) {
                if let Ok(text) = Document::decode_text(&encoding, bytes) {
                    return Some(text);
                }
            }
        }

        // UTF-16BE with BOM, then Latin-1
        if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
            let utf16: Vec<u16> = bytes[2..]
                .chunks_exact(2)
                .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
                .collect();
            return Some(String::from_utf16_lossy(&utf16));
        }
        Some(bytes.iter().map(|&b| b as char).collect())
    } else {
        None
    }
}

/// Split one show-text run into word tokens, advancing a cursor by an
/// estimated per-character width.
fn push_run(words: &mut Vec<Word>, text: &str, x: f64, y: f64, font_size: f64, page_height: f64) {
    if text.trim().is_empty() {
        return;
    }

    let advance = font_size * CHAR_ADVANCE_RATIO;
    let top = page_height - y - font_size;
    let bottom = page_height - y;

    let mut cursor = x;
    let mut start = x;
    let mut current = String::new();

    for ch in text.chars() {
        if ch.is_whitespace() {
            if !current.is_empty() {
                words.push(Word {
                    text: std::mem::take(&mut current),
                    x0: start,
                    x1: cursor,
                    top,
                    bottom,
                });
            }
            cursor += advance;
            start = cursor;
        } else {
            if current.is_empty() {
                start = cursor;
            }
            current.push(ch);
            cursor += advance;
        }
    }
    if !current.is_empty() {
        words.push(Word {
            text: current,
            x0: start,
            x1: cursor,
            top,
            bottom,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_run_splits_words() {
        let mut words = Vec::new();
        push_run(&mut words, "Poste de Marseille", 100.0, 700.0, 10.0, 842.0);

        assert_eq!(words.len(), 3);
        assert_eq!(words[0].text, "Poste");
        assert_eq!(words[2].text, "Marseille");
        assert_eq!(words[0].x0, 100.0);
        // "Poste" is five characters at half the font size each
        assert_eq!(words[0].x1, 125.0);
        // later words start further right
        assert!(words[1].x0 > words[0].x1);
        assert_eq!(words[0].top, 842.0 - 700.0 - 10.0);
    }

    #[test]
    fn test_push_run_skips_blank_runs() {
        let mut words = Vec::new();
        push_run(&mut words, "   ", 0.0, 0.0, 10.0, 842.0);
        assert!(words.is_empty());
    }

    #[test]
    fn test_load_mem_rejects_garbage() {
        assert!(PdfDocument::load_mem(b"not a pdf").is_err());
    }
}
