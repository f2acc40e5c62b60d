//! OCR backend abstraction.
//!
//! The extractor only needs "image in, text out"; backends decide how the
//! recognition actually happens.

use std::path::Path;
use thiserror::Error;

/// Errors from OCR backends.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Backend not available: {0}")]
    BackendNotAvailable(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of OCR processing.
#[derive(Debug, Clone)]
pub struct OcrResult {
    /// Recognized text content.
    pub text: String,
    /// Name of the backend that produced this result.
    pub backend: &'static str,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for OCR backends.
pub trait OcrBackend: Send + Sync {
    /// Short backend name for logs and status output.
    fn name(&self) -> &'static str;

    /// Check if this backend can run (binaries installed, models present).
    fn is_available(&self) -> bool;

    /// Describe what is needed to make this backend available.
    fn availability_hint(&self) -> String;

    /// Run OCR on a raster image using the given recognizer language code.
    fn ocr_image(&self, image_path: &Path, language: &str) -> Result<OcrResult, OcrError>;
}
