//! Error types for the facto-core library.

use thiserror::Error;

/// Main error type for the facto library.
#[derive(Error, Debug)]
pub enum FactoError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Geocoding lookup error.
    #[error("geocoding error: {0}")]
    Geocode(#[from] GeocodeError),

    /// Spreadsheet export error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from the PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page index requested.
    #[error("invalid page index: {0}")]
    InvalidPage(usize),
}

/// Errors related to field extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// An item position is not an integer, so position-keyed
    /// reconciliation cannot order it.
    #[error("item position is not numeric: {0:?}")]
    InvalidPosition(String),
}

/// Errors from the geocoding lookup client.
#[derive(Error, Debug)]
pub enum GeocodeError {
    /// The HTTP request failed or returned a non-success status.
    #[error("lookup request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Errors from spreadsheet export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Workbook construction or save failed.
    #[error("workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    /// I/O error while preparing the output file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the facto library.
pub type Result<T> = std::result::Result<T, FactoError>;
