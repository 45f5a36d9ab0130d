//! Result export.

mod xlsx;

pub use xlsx::export_xlsx;
