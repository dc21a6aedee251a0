//! Error types for the routesheet-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the routesheet library.
///
/// Every variant is fatal to the receipt being processed; callers may retry
/// the whole operation but nothing is resumed part way.
#[derive(Error, Debug)]
pub enum RouteSheetError {
    /// PDF rasterization error.
    #[error("conversion error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Receipt line classification or accumulation error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Stored record error.
    #[error("record error: {0}")]
    Record(#[from] RecordError),

    /// Route sheet template or workbook error.
    #[error("route sheet error: {0}")]
    Sheet(#[from] SheetError),

    /// Image decoding or encoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// The input file type is not a PDF, image, or text dump.
    #[error("unsupported input format: {0}")]
    UnsupportedInput(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while turning a PDF into a raster image.
#[derive(Error, Debug)]
pub enum PdfError {
    /// The PDF file could not be read.
    #[error("failed to read PDF: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The first page carries no decodable image.
    #[error("no image found on page {0}")]
    NoImage(u32),

    /// The external rasterizer could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external rasterizer exited unsuccessfully.
    #[error("{program} exited with {status}: {stderr}")]
    Rasterizer {
        program: String,
        status: String,
        stderr: String,
    },

    /// The rendered page could not be read back.
    #[error("failed to load rendered page: {0}")]
    Render(String),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The OCR engine could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The OCR engine exited unsuccessfully.
    #[error("{program} exited with {status}: {stderr}")]
    Engine {
        program: String,
        status: String,
        stderr: String,
    },

    /// The OCR engine produced text that is not valid UTF-8.
    #[error("OCR output is not valid UTF-8")]
    Encoding,

    /// Image preprocessing failed.
    #[error("preprocessing failed: {0}")]
    Preprocessing(String),
}

/// Errors related to receipt line classification and accumulation.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A quantity digit run does not fit the count type.
    #[error("quantity {value:?} out of range in line {line:?}")]
    QuantityOutOfRange { line: String, value: String },

    /// Adding a quantity to a fee counter overflowed.
    #[error("{category} total overflowed while adding {quantity}")]
    CounterOverflow { category: String, quantity: u64 },
}

/// Errors related to the persisted JSON record.
#[derive(Error, Debug)]
pub enum RecordError {
    /// The record file could not be read or written.
    #[error("failed to access record {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The record is not valid JSON or misses required keys.
    #[error("invalid record JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A date field is not a well-formed ISO date.
    #[error("invalid date format in {field}: {value:?} (expected YYYY-MM-DD)")]
    DateFormat { field: &'static str, value: String },

    /// A fee category name is not one of the known categories.
    #[error("unknown fee category: {0}")]
    UnknownCategory(String),

    /// The district name/number pair is not in the district table.
    #[error("unknown district {name:?} (number {number:?})")]
    UnknownDistrict { name: String, number: Option<u32> },
}

/// Errors related to writing the route sheet workbook.
#[derive(Error, Debug)]
pub enum SheetError {
    /// The template workbook does not exist.
    #[error("template file not found at {0}")]
    TemplateNotFound(PathBuf),

    /// The template workbook could not be opened.
    #[error("failed to read template {path}: {reason}")]
    TemplateRead { path: PathBuf, reason: String },

    /// A cell address in the projection is not valid A1 notation.
    #[error("invalid cell address: {0}")]
    InvalidCell(String),

    /// The output workbook could not be written.
    #[error("failed to save route sheet {path}: {reason}")]
    Save { path: PathBuf, reason: String },

    /// The output directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for the routesheet library.
pub type Result<T> = std::result::Result<T, RouteSheetError>;
