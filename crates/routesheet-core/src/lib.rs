//! Core library for scouting charter-renewal route sheets.
//!
//! This crate provides:
//! - PDF rasterization (poppler or embedded scan images)
//! - OCR through the tesseract command-line engine
//! - Rule-based extraction of receipt lines into a renewal record
//! - JSON persistence of records and projection onto the xlsx route sheet

pub mod error;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod receipt;
pub mod sheet;
pub mod store;

pub use error::{Result, RouteSheetError};
pub use models::config::RouteSheetConfig;
pub use models::record::{DISTRICTS, District, FeeCategory, Prices, Program, ReceiptRecord};
pub use ocr::{OcrBackend, OcrResult};
pub use pdf::PdfRasterizer;
pub use pipeline::{InputKind, ReceiptPipeline};
pub use receipt::{RecordAccumulator, accumulate};
pub use sheet::{RouteSheet, SheetWriter, project};
