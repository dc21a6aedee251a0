//! Data models for receipt records and pipeline configuration.

pub mod config;
pub mod record;

pub use config::RouteSheetConfig;
pub use record::{DISTRICTS, District, FeeCategory, Prices, Program, ReceiptRecord};
