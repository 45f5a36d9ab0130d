//! Core library for purchase-order PDF extraction.
//!
//! This crate provides:
//! - PDF text and positioned-word access (lopdf content interpretation,
//!   pdf-extract fallback)
//! - Heuristic field extraction for the supported purchase-order layout:
//!   dates, totals, order numbers, line items, place names, zone text
//! - Geocoding-backed place validation behind a pluggable lookup
//! - Multi-sheet spreadsheet export

pub mod error;
pub mod export;
pub mod geo;
pub mod models;
pub mod order;
pub mod pdf;

pub use error::{FactoError, Result};
pub use export::export_xlsx;
pub use geo::{GeocodeLookup, GeocodePlace, NominatimClient};
pub use models::config::{FactoConfig, HeaderStrategy};
pub use models::order::{HeaderFields, LineItem, OrderData};
pub use order::OrderParser;
pub use pdf::{DocumentSource, PdfDocument, Word, Zone};
