//! Rasterization through poppler's `pdftoppm`.

use std::path::{Path, PathBuf};
use std::process::Command;

use image::DynamicImage;
use tracing::debug;

use super::{PdfRasterizer, Result};
use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// Renders page 1 to a PNG in a temporary directory and loads it.
pub struct PopplerRasterizer {
    program: PathBuf,
    dpi: u32,
}

impl PopplerRasterizer {
    pub fn new(program: impl Into<PathBuf>, dpi: u32) -> Self {
        Self {
            program: program.into(),
            dpi,
        }
    }

    pub fn from_config(config: &PdfConfig) -> Self {
        Self::new(&config.pdftoppm_path, config.render_dpi)
    }

    fn command(&self, input: &Path, output_prefix: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-q")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-f")
            .arg("1")
            .arg("-l")
            .arg("1")
            .arg("-singlefile")
            .arg("-png")
            .arg(input)
            .arg(output_prefix);
        cmd
    }
}

impl PdfRasterizer for PopplerRasterizer {
    fn first_page(&self, path: &Path) -> Result<DynamicImage> {
        let program = self.program.display().to_string();
        let workdir = tempfile::tempdir().map_err(|e| PdfError::Render(e.to_string()))?;
        let prefix = workdir.path().join("page");

        debug!("Rendering {} at {} dpi with {}", path.display(), self.dpi, program);

        let output = self
            .command(path, &prefix)
            .output()
            .map_err(|source| PdfError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(PdfError::Rasterizer {
                program,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let rendered = prefix.with_extension("png");
        image::open(&rendered).map_err(|e| PdfError::Render(format!("{}: {}", rendered.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_renders_first_page_only() {
        let r = PopplerRasterizer::from_config(&PdfConfig::default());
        let cmd = r.command(Path::new("receipt.pdf"), Path::new("/tmp/x/page"));
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec!["-q", "-r", "400", "-f", "1", "-l", "1", "-singlefile", "-png", "receipt.pdf", "/tmp/x/page"]
        );
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let r = PopplerRasterizer::new("/nonexistent/pdftoppm-binary", 400);
        let err = r.first_page(Path::new("receipt.pdf")).unwrap_err();
        assert!(matches!(err, PdfError::Spawn { .. }));
    }
}
