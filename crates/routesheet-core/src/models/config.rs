//! Configuration structures for the route sheet pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the routesheet pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteSheetConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// PDF rasterization configuration.
    pub pdf: PdfConfig,

    /// Image preprocessing configuration.
    pub preprocessing: PreprocessingConfig,

    /// Constant receipt fields.
    pub receipt: ReceiptConfig,

    /// Where records and route sheets are written.
    pub output: OutputConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Path to the tesseract executable.
    pub tesseract_path: PathBuf,

    /// Recognition language tag.
    pub language: String,

    /// Page segmentation mode (4 = single column of variable-size text).
    pub page_segmentation_mode: u8,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_path: PathBuf::from("tesseract"),
            language: "eng".to_string(),
            page_segmentation_mode: 4,
        }
    }
}

/// Which rasterizer turns a PDF receipt into an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PdfBackend {
    /// Render with poppler's `pdftoppm`.
    #[default]
    Poppler,
    /// Pull the scanned image embedded in the first page.
    Embedded,
}

/// PDF rasterization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Rasterizer backend.
    pub backend: PdfBackend,

    /// Path to the pdftoppm executable.
    pub pdftoppm_path: PathBuf,

    /// DPI for rendering the first page.
    pub render_dpi: u32,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            backend: PdfBackend::Poppler,
            pdftoppm_path: PathBuf::from("pdftoppm"),
            render_dpi: 400,
        }
    }
}

/// Image preprocessing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Integer upscale factor applied before OCR.
    pub scale: u32,

    /// Contrast enhancement factor (1.0 = unchanged).
    pub contrast: f32,

    /// Apply a sharpening pass.
    pub sharpen: bool,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            scale: 2,
            contrast: 3.0,
            sharpen: true,
        }
    }
}

/// Constant fields stamped on every record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptConfig {
    /// Council number.
    pub council_number: String,

    /// Charter term.
    pub term: String,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            council_number: "456".to_string(),
            term: "12 months".to_string(),
        }
    }
}

/// Output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for the JSON record and raw OCR dump.
    pub data_dir: PathBuf,

    /// File name of the JSON record inside `data_dir`.
    pub record_file: String,

    /// Also write the raw OCR text next to the record.
    pub save_raw_text: bool,

    /// Route sheet template workbook.
    pub template_path: PathBuf,

    /// Directory for generated route sheets.
    pub output_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            record_file: "receipt_data.json".to_string(),
            save_raw_text: true,
            template_path: PathBuf::from("assets/RouteSheetTemplateV2.xlsx"),
            output_dir: PathBuf::from("assets/generated"),
        }
    }
}

impl RouteSheetConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Full path of the JSON record.
    pub fn record_path(&self) -> PathBuf {
        self.output.data_dir.join(&self.output.record_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: RouteSheetConfig =
            serde_json::from_str(r#"{"pdf": {"backend": "embedded"}, "receipt": {"council_number": "789"}}"#)
                .unwrap();
        assert_eq!(config.pdf.backend, PdfBackend::Embedded);
        assert_eq!(config.pdf.render_dpi, 400);
        assert_eq!(config.receipt.council_number, "789");
        assert_eq!(config.receipt.term, "12 months");
        assert_eq!(config.ocr.page_segmentation_mode, 4);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = RouteSheetConfig::default();
        config.output.output_dir = PathBuf::from("sheets");
        config.save(&path).unwrap();

        let loaded = RouteSheetConfig::from_file(&path).unwrap();
        assert_eq!(loaded.output.output_dir, PathBuf::from("sheets"));
        assert_eq!(loaded.record_path(), PathBuf::from("data").join("receipt_data.json"));
    }

    #[test]
    fn test_malformed_file_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = RouteSheetConfig::from_file(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
