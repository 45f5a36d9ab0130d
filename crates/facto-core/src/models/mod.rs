//! Data models: extraction results and configuration.

pub mod config;
pub mod order;

pub use config::{FactoConfig, HeaderStrategy};
pub use order::{HeaderFields, LineItem, OrderData};
