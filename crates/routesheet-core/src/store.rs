//! JSON persistence for receipt records.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::RecordError;
use crate::models::record::{ReceiptRecord, RecordFile};

/// File name of the raw OCR dump written next to the record.
pub const RAW_TEXT_FILE: &str = "raw_ocr_output.txt";

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> RecordError + '_ {
    move |source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn ensure_parent(path: &Path) -> Result<(), RecordError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(io_error(parent))
        }
        _ => Ok(()),
    }
}

/// Write a record as pretty-printed JSON, creating parent directories.
pub fn save_record(record: &ReceiptRecord, path: &Path) -> Result<(), RecordError> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(record)?;
    fs::write(path, json).map_err(io_error(path))?;
    info!("Record saved to {}", path.display());
    Ok(())
}

/// Read a record back, validating its dates and district.
pub fn load_record(path: &Path) -> Result<ReceiptRecord, RecordError> {
    let content = fs::read_to_string(path).map_err(io_error(path))?;
    parse_record(&content)
}

/// Parse a record from JSON text.
///
/// Goes through the on-disk shape first so that date and district problems
/// surface as their own error variants rather than as generic JSON errors.
pub fn parse_record(json: &str) -> Result<ReceiptRecord, RecordError> {
    let file: RecordFile = serde_json::from_str(json)?;
    ReceiptRecord::try_from(file)
}

/// Write the raw OCR text into `dir`, returning the file path.
pub fn save_raw_text(text: &str, dir: &Path) -> Result<std::path::PathBuf, RecordError> {
    fs::create_dir_all(dir).map_err(io_error(dir))?;
    let path = dir.join(RAW_TEXT_FILE);
    fs::write(&path, text).map_err(io_error(&path))?;
    Ok(path)
}
