//! Tesseract command-line backend.

use std::path::PathBuf;
use std::process::Command;
use std::time::Instant;

use image::{DynamicImage, ImageFormat};
use tracing::debug;

use super::{OcrBackend, OcrResult, PageSegMode};
use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// Runs the `tesseract` program on a temporary PNG and reads text from stdout.
pub struct TesseractRecognizer {
    program: PathBuf,
    language: String,
}

impl TesseractRecognizer {
    pub fn new(program: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            language: language.into(),
        }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(&config.tesseract_path, &config.language)
    }

    fn command(&self, input: &std::path::Path, mode: PageSegMode) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(input)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .arg("--psm")
            .arg(mode.0.to_string());
        cmd
    }
}

impl OcrBackend for TesseractRecognizer {
    fn recognize(&self, image: &DynamicImage, mode: PageSegMode) -> Result<OcrResult, OcrError> {
        let start = Instant::now();
        let program = self.program.display().to_string();

        let input = tempfile::Builder::new()
            .prefix("routesheet-ocr-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::Preprocessing(format!("failed to create temp image: {}", e)))?;
        image
            .save_with_format(input.path(), ImageFormat::Png)
            .map_err(|e| OcrError::Preprocessing(format!("failed to write temp image: {}", e)))?;

        debug!(
            "Running {} on {} (lang {}, psm {})",
            program,
            input.path().display(),
            self.language,
            mode.0
        );

        let output = self
            .command(input.path(), mode)
            .output()
            .map_err(|source| OcrError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(OcrError::Engine {
                program,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8(output.stdout).map_err(|_| OcrError::Encoding)?;

        Ok(OcrResult {
            text,
            processing_time_ms: start.elapsed().as_millis() as u64,
            image_size: (image.width(), image.height()),
        })
    }
}
