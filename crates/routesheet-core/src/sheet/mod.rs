//! Route sheet output: a pure projection of the record onto template cells
//! and a writer that stamps those cells into a copy of the template workbook.

pub mod projector;
pub mod writer;

pub use projector::{project, unit_type_for};
pub use writer::XlsxTemplateWriter;

use std::fmt;
use std::path::PathBuf;

use crate::error::SheetError;

/// Value written into a single worksheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// One cell assignment, addressed in A1 notation.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetCell {
    pub address: String,
    pub value: CellValue,
}

impl SheetCell {
    pub fn text(address: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            value: CellValue::Text(value.into()),
        }
    }

    pub fn number(address: impl Into<String>, value: impl Into<f64>) -> Self {
        Self {
            address: address.into(),
            value: CellValue::Number(value.into()),
        }
    }
}

/// A projected route sheet: ordered cell writes plus the output file name.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSheet {
    pub cells: Vec<SheetCell>,
    pub file_name: String,
}

impl RouteSheet {
    /// Value assigned to `address`, if any.
    pub fn value(&self, address: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|c| c.address == address)
            .map(|c| &c.value)
    }
}

/// Trait for route sheet sinks.
pub trait SheetWriter {
    /// Persist the sheet and return the path of the written workbook.
    fn write(&self, sheet: &RouteSheet) -> Result<PathBuf, SheetError>;
}
