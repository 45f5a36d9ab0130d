//! Rule-based field extractors for the supported purchase-order layout.

pub mod amounts;
pub mod dates;
pub mod items;
pub mod order_number;
pub mod patterns;

pub use amounts::{clean_number, find_total};
pub use dates::{find_date, find_date_in_window, find_global_delivery_date, validate_date};
pub use items::segment_page;
pub use order_number::find_order_number;
