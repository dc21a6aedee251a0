//! End-to-end receipt processing.
//!
//! A [`ReceiptPipeline`] owns every engine path and output location it needs,
//! handed in once through [`RouteSheetConfig`]. Each call handles one receipt
//! start to finish; nothing is shared between receipts.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{Local, NaiveDate};
use image::ImageFormat;
use tracing::{debug, info};

use crate::error::{Result, RouteSheetError};
use crate::models::config::RouteSheetConfig;
use crate::models::record::ReceiptRecord;
use crate::ocr::{ImagePreprocessor, OcrBackend, OcrResult, PageSegMode, TesseractRecognizer};
use crate::pdf::{PdfRasterizer, rasterizer_from_config};
use crate::receipt::{accumulate, first_of_month};
use crate::sheet::{SheetWriter, XlsxTemplateWriter, project};
use crate::store;

/// Kind of receipt input, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// PDF; only the first page is read.
    Pdf,
    /// A raster scan.
    Image,
    /// Text that has already been through OCR.
    Text,
}

impl InputKind {
    /// Any extension the image decoder recognizes counts as a scan.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "pdf" => Ok(InputKind::Pdf),
            "txt" => Ok(InputKind::Text),
            _ if ImageFormat::from_path(path).is_ok() => Ok(InputKind::Image),
            _ => Err(RouteSheetError::UnsupportedInput(path.display().to_string())),
        }
    }
}

/// Receipt → record → route sheet.
pub struct ReceiptPipeline<O = TesseractRecognizer, R = Box<dyn PdfRasterizer>> {
    config: RouteSheetConfig,
    ocr: O,
    rasterizer: R,
    preprocessor: ImagePreprocessor,
    today: Option<NaiveDate>,
}

impl ReceiptPipeline {
    /// Build a pipeline with the engines named in `config`.
    pub fn from_config(config: RouteSheetConfig) -> Self {
        let ocr = TesseractRecognizer::from_config(&config.ocr);
        let rasterizer = rasterizer_from_config(&config.pdf);
        Self::with_backends(config, ocr, rasterizer)
    }
}

impl<O: OcrBackend, R: PdfRasterizer> ReceiptPipeline<O, R> {
    pub fn with_backends(config: RouteSheetConfig, ocr: O, rasterizer: R) -> Self {
        let preprocessor = ImagePreprocessor::from_config(&config.preprocessing);
        Self {
            config,
            ocr,
            rasterizer,
            preprocessor,
            today: None,
        }
    }

    /// Pin the processing date instead of reading the local clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn config(&self) -> &RouteSheetConfig {
        &self.config
    }

    /// Effective date stamped on records produced now.
    pub fn effective_date(&self) -> NaiveDate {
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        first_of_month(today)
    }

    /// Turn an input file into recognized text.
    pub fn recognize(&self, input: &Path) -> Result<OcrResult> {
        let kind = InputKind::from_path(input)?;
        info!("Reading {:?} input {}", kind, input.display());

        let image = match kind {
            InputKind::Text => {
                let text = std::fs::read_to_string(input)?;
                return Ok(OcrResult::from_text(text));
            }
            InputKind::Pdf => self.rasterizer.first_page(input)?,
            InputKind::Image => image::open(input)?,
        };

        let prepared = self.preprocessor.process(&image);
        let mode = PageSegMode(self.config.ocr.page_segmentation_mode);
        let result = self.ocr.recognize(&prepared, mode)?;
        info!(
            "OCR finished in {}ms ({} lines)",
            result.processing_time_ms,
            result.lines().count()
        );
        Ok(result)
    }

    /// Recognize and extract a record without writing anything.
    pub fn extract(&self, input: &Path) -> Result<ReceiptRecord> {
        let ocr = self.recognize(input)?;
        let record = accumulate(ocr.lines(), &self.config.receipt, self.effective_date())?;
        Ok(record)
    }

    /// Extract a record and persist it as JSON at `record_path`.
    ///
    /// The raw OCR text goes to the data directory first when enabled, so it
    /// is available even if extraction fails. No JSON is written on failure.
    pub fn process(&self, input: &Path, record_path: &Path) -> Result<ReceiptRecord> {
        let start = Instant::now();
        let ocr = self.recognize(input)?;

        if self.config.output.save_raw_text && InputKind::from_path(input)? != InputKind::Text {
            let raw_path = store::save_raw_text(&ocr.text, &self.config.output.data_dir)?;
            debug!("Raw OCR text saved to {}", raw_path.display());
        }

        let record = accumulate(ocr.lines(), &self.config.receipt, self.effective_date())?;
        store::save_record(&record, record_path)?;

        info!(
            "Processed {} in {:?}",
            input.display(),
            start.elapsed()
        );
        Ok(record)
    }

    /// Project a record onto the configured template.
    pub fn project(&self, record: &ReceiptRecord) -> Result<PathBuf> {
        self.project_with(record, &XlsxTemplateWriter::from_config(&self.config.output))
    }

    /// Project a record through a specific sheet writer.
    pub fn project_with(&self, record: &ReceiptRecord, writer: &dyn SheetWriter) -> Result<PathBuf> {
        let sheet = project(record);
        debug!("Projected {} cells for {}", sheet.cells.len(), sheet.file_name);
        Ok(writer.write(&sheet)?)
    }

    /// Load a stored record and project it.
    pub fn project_file(&self, record_path: &Path) -> Result<(ReceiptRecord, PathBuf)> {
        let record = store::load_record(record_path)?;
        let path = self.project(&record)?;
        Ok((record, path))
    }
}
