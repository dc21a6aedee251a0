//! xlsx writer that fills a copy of the route sheet template.

use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info};

use super::{CellValue, RouteSheet, SheetWriter};
use crate::error::SheetError;
use crate::models::config::OutputConfig;

lazy_static! {
    static ref CELL_ADDRESS: Regex = Regex::new(r"^[A-Z]{1,3}[1-9][0-9]*$").unwrap();
}

/// Loads the template workbook, writes the projected cells into its active
/// worksheet and saves the result under `output_dir`.
///
/// The template itself is never modified.
#[derive(Debug, Clone)]
pub struct XlsxTemplateWriter {
    template: PathBuf,
    output_dir: PathBuf,
}

impl XlsxTemplateWriter {
    pub fn new(template: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.template_path, &config.output_dir)
    }

    pub fn template(&self) -> &Path {
        &self.template
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl SheetWriter for XlsxTemplateWriter {
    fn write(&self, sheet: &RouteSheet) -> Result<PathBuf, SheetError> {
        if !self.template.is_file() {
            return Err(SheetError::TemplateNotFound(self.template.clone()));
        }
        if let Some(bad) = sheet
            .cells
            .iter()
            .find(|c| !CELL_ADDRESS.is_match(&c.address))
        {
            return Err(SheetError::InvalidCell(bad.address.clone()));
        }

        let mut book =
            umya_spreadsheet::reader::xlsx::read(&self.template).map_err(|e| {
                SheetError::TemplateRead {
                    path: self.template.clone(),
                    reason: e.to_string(),
                }
            })?;
        info!("Loaded template from {}", self.template.display());

        let worksheet = book.get_active_sheet_mut();
        for cell in &sheet.cells {
            debug!("Set {} to {}", cell.address, cell.value);
            let target = worksheet.get_cell_mut(cell.address.as_str());
            match &cell.value {
                CellValue::Text(text) => {
                    target.set_value(text.clone());
                }
                CellValue::Number(number) => {
                    target.set_value_number(*number);
                }
            }
        }

        std::fs::create_dir_all(&self.output_dir).map_err(|source| SheetError::OutputDir {
            path: self.output_dir.clone(),
            source,
        })?;

        let path = self.output_dir.join(&sheet.file_name);
        umya_spreadsheet::writer::xlsx::write(&book, &path).map_err(|e| SheetError::Save {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        info!("Route sheet saved to {}", path.display());
        Ok(path)
    }
}
