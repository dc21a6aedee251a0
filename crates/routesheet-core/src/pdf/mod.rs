//! PDF boundary: turning the first page of a receipt PDF into an image.

mod embedded;
mod poppler;

pub use embedded::EmbeddedImageRasterizer;
pub use poppler::PopplerRasterizer;

use std::path::Path;

use image::DynamicImage;

use crate::error::PdfError;
use crate::models::config::{PdfBackend, PdfConfig};

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF rasterization implementations.
pub trait PdfRasterizer {
    /// Render the first page of the PDF at `path`.
    fn first_page(&self, path: &Path) -> Result<DynamicImage>;
}

/// Build the rasterizer selected in the configuration.
pub fn rasterizer_from_config(config: &PdfConfig) -> Box<dyn PdfRasterizer> {
    match config.backend {
        PdfBackend::Poppler => Box::new(PopplerRasterizer::from_config(config)),
        PdfBackend::Embedded => Box::new(EmbeddedImageRasterizer::new()),
    }
}

impl<R: PdfRasterizer + ?Sized> PdfRasterizer for Box<R> {
    fn first_page(&self, path: &Path) -> Result<DynamicImage> {
        (**self).first_page(path)
    }
}
