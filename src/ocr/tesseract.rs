//! Tesseract OCR backend implementation.
//!
//! Uses Tesseract OCR via command-line for text recognition.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use super::backend::{OcrBackend, OcrError, OcrResult};
use super::tools::{check_binary, handle_cmd_output, ToolFailure};

/// Tesseract OCR backend.
#[derive(Debug, Clone, Default)]
pub struct TesseractBackend {
    /// Directory holding `.traineddata` files, passed as `--tessdata-dir`.
    tessdata_dir: Option<PathBuf>,
}

impl TesseractBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use traineddata files from a specific directory.
    pub fn with_tessdata_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.tessdata_dir = dir;
        self
    }

    fn command(&self, image_path: &Path, language: &str) -> Command {
        let mut cmd = Command::new("tesseract");
        cmd.arg(image_path).arg("stdout").args(["-l", language]);
        if let Some(dir) = &self.tessdata_dir {
            cmd.arg("--tessdata-dir").arg(dir);
        }
        cmd
    }

    /// Run Tesseract on an image file.
    fn run_tesseract(&self, image_path: &Path, language: &str) -> Result<String, OcrError> {
        let output = self.command(image_path, language).output();

        handle_cmd_output(output, "tesseract failed").map_err(|e| match e {
            ToolFailure::NotFound => OcrError::BackendNotAvailable(
                "tesseract not found (install tesseract-ocr)".to_string(),
            ),
            ToolFailure::Failed(msg) => OcrError::OcrFailed(msg),
            ToolFailure::Io(e) => OcrError::Io(e),
        })
    }
}

impl OcrBackend for TesseractBackend {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        check_binary("tesseract")
    }

    fn availability_hint(&self) -> String {
        if !check_binary("tesseract") {
            "Tesseract not installed. Install with: apt install tesseract-ocr tesseract-ocr-srp"
                .to_string()
        } else {
            "Tesseract is available".to_string()
        }
    }

    fn ocr_image(&self, image_path: &Path, language: &str) -> Result<OcrResult, OcrError> {
        let start = Instant::now();
        let text = self.run_tesseract(image_path, language)?;

        Ok(OcrResult {
            text,
            backend: self.name(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_arguments() {
        let backend = TesseractBackend::new().with_tessdata_dir(Some(PathBuf::from("/tess")));
        let cmd = backend.command(Path::new("/tmp/page-01.png"), "srp");
        let args: Vec<_> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        assert_eq!(
            args,
            vec!["/tmp/page-01.png", "stdout", "-l", "srp", "--tessdata-dir", "/tess"]
        );
    }

    #[test]
    fn test_command_without_tessdata_dir() {
        let cmd = TesseractBackend::new().command(Path::new("p.png"), "srp+srp_latn");
        assert_eq!(cmd.get_args().count(), 4);
    }
}
