//! Image preprocessing for OCR.

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma};
use tracing::debug;

use crate::models::config::PreprocessingConfig;

/// 3x3 sharpening kernel (center 32, neighbours -2, divided by 16).
const SHARPEN_KERNEL: [f32; 9] = [
    -0.125, -0.125, -0.125, //
    -0.125, 2.0, -0.125, //
    -0.125, -0.125, -0.125,
];

/// Fixed filter chain: grayscale, upscale, contrast, sharpen.
pub struct ImagePreprocessor {
    /// Integer upscale factor.
    scale: u32,
    /// Contrast enhancement factor.
    contrast: f32,
    /// Whether to sharpen.
    sharpen: bool,
}

impl ImagePreprocessor {
    /// Create a new preprocessor with default settings.
    pub fn new() -> Self {
        Self::from_config(&PreprocessingConfig::default())
    }

    pub fn from_config(config: &PreprocessingConfig) -> Self {
        Self {
            scale: config.scale.max(1),
            contrast: config.contrast,
            sharpen: config.sharpen,
        }
    }

    /// Set the upscale factor.
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale.max(1);
        self
    }

    /// Prepare a receipt image for recognition.
    pub fn process(&self, image: &DynamicImage) -> DynamicImage {
        debug!(
            "Preprocessing {}x{} image (scale {}, contrast {}, sharpen {})",
            image.width(),
            image.height(),
            self.scale,
            self.contrast,
            self.sharpen
        );

        let gray = DynamicImage::ImageLuma8(image.to_luma8());

        let upscaled = if self.scale > 1 {
            gray.resize_exact(
                gray.width() * self.scale,
                gray.height() * self.scale,
                FilterType::Lanczos3,
            )
        } else {
            gray
        };

        let contrasted = DynamicImage::ImageLuma8(enhance_contrast(&upscaled.to_luma8(), self.contrast));

        if self.sharpen {
            DynamicImage::ImageLuma8(contrasted.filter3x3(&SHARPEN_KERNEL).to_luma8())
        } else {
            contrasted
        }
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Push every pixel away from the image's mean gray by `factor`.
fn enhance_contrast(image: &GrayImage, factor: f32) -> GrayImage {
    let count = u64::from(image.width()) * u64::from(image.height());
    if count == 0 {
        return image.clone();
    }

    let sum: u64 = image.pixels().map(|p| u64::from(p[0])).sum();
    let mean = (sum as f32 / count as f32 + 0.5).floor();

    let mut result = image.clone();
    for pixel in result.pixels_mut() {
        let value = mean + factor * (f32::from(pixel[0]) - mean);
        *pixel = Luma([value.round().clamp(0.0, 255.0) as u8]);
    }
    result
}
