//! Page-by-page text extraction with OCR fallback.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::backend::{OcrBackend, OcrError};
use super::pdf::{PdfBackend, PdfDocument, PopplerBackend};
use super::tesseract::TesseractBackend;

/// Errors that can occur during text extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("cannot open {}: {reason}", path.display())]
    CannotOpen { path: PathBuf, reason: String },

    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extraction task failed: {0}")]
    Task(String),
}

impl ExtractionError {
    pub fn cannot_open(path: &Path, reason: impl Into<String>) -> Self {
        Self::CannotOpen {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Extraction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Tesseract language code(s), e.g. "srp" or "srp+srp_latn".
    #[serde(default = "default_language")]
    pub language: String,
    /// Resolution used when rasterizing pages for OCR.
    #[serde(default = "default_render_dpi")]
    pub render_dpi: u32,
    /// Directory with Tesseract traineddata files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tessdata_dir: Option<PathBuf>,
    /// Source files whose name starts with this prefix are deleted after extraction.
    #[serde(default = "default_temp_prefix")]
    pub temp_prefix: String,
}

fn default_language() -> String {
    "srp".to_string()
}

fn default_render_dpi() -> u32 {
    72
}

fn default_temp_prefix() -> String {
    "temp_".to_string()
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            render_dpi: default_render_dpi(),
            tessdata_dir: None,
            temp_prefix: default_temp_prefix(),
        }
    }
}

/// Text extractor: direct PDF text first, OCR for pages that have none.
pub struct TextExtractor {
    pdf: Arc<dyn PdfBackend>,
    ocr: Arc<dyn OcrBackend>,
    config: ExtractorConfig,
}

impl TextExtractor {
    /// Create an extractor backed by poppler-utils and Tesseract.
    pub fn new(config: ExtractorConfig) -> Self {
        let ocr = TesseractBackend::new().with_tessdata_dir(config.tessdata_dir.clone());
        Self::with_backends(Arc::new(PopplerBackend::new()), Arc::new(ocr), config)
    }

    pub fn with_backends(
        pdf: Arc<dyn PdfBackend>,
        ocr: Arc<dyn OcrBackend>,
        config: ExtractorConfig,
    ) -> Self {
        Self { pdf, ocr, config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn ocr_backend(&self) -> &dyn OcrBackend {
        self.ocr.as_ref()
    }

    /// Extract the text of every page, in page order, one line break after each page.
    ///
    /// Temp-prefixed source files are removed afterwards, whether or not
    /// extraction succeeded.
    pub fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let result = self.extract_document(path);
        self.cleanup_source(path);
        result
    }

    /// Run [`extract`](Self::extract) on the blocking thread pool.
    pub async fn extract_async(self: &Arc<Self>, path: PathBuf) -> Result<String, ExtractionError> {
        let extractor = Arc::clone(self);
        tokio::task::spawn_blocking(move || extractor.extract(&path))
            .await
            .map_err(|e| ExtractionError::Task(e.to_string()))?
    }

    fn extract_document(&self, path: &Path) -> Result<String, ExtractionError> {
        let document = self.pdf.open(path)?;
        let page_count = document.page_count();

        let mut text_output = String::new();
        let mut ocr_pages = 0u32;

        for page in 1..=page_count {
            let direct = match document.page_text(page) {
                Ok(text) => text,
                Err(e @ ExtractionError::ToolNotFound(_)) => return Err(e),
                Err(e) => {
                    debug!("Direct text extraction failed on page {}: {}", page, e);
                    String::new()
                }
            };

            if !direct.trim().is_empty() {
                debug!("Page {}: using direct text ({} chars)", page, direct.len());
                text_output.push_str(&direct);
            } else {
                match self.ocr_page(document.as_ref(), page) {
                    Ok(ocr_text) => {
                        debug!("Page {}: using OCR text ({} chars)", page, ocr_text.len());
                        ocr_pages += 1;
                        text_output.push_str(&ocr_text);
                    }
                    Err(e) => {
                        warn!("OCR failed on page {}, using basic extraction: {}", page, e);
                        text_output.push_str(&direct);
                    }
                }
            }
            text_output.push('\n');
        }

        drop(document);

        let text = text_output.trim().to_string();
        info!(
            "Extracted {} chars from {} pages ({} via OCR) of {}",
            text.chars().count(),
            page_count,
            ocr_pages,
            path.display()
        );
        Ok(text)
    }

    fn ocr_page(&self, document: &dyn PdfDocument, page: u32) -> Result<String, OcrError> {
        let image = document.render_page(page, self.config.render_dpi)?;
        let result = self.ocr.ocr_image(&image, &self.config.language)?;
        debug!(
            "{} recognized page {} in {}ms",
            result.backend, page, result.processing_time_ms
        );
        Ok(result.text)
    }

    /// Best-effort removal of temp-prefixed uploads.
    fn cleanup_source(&self, path: &Path) {
        if self.config.temp_prefix.is_empty() {
            return;
        }
        let is_temp = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with(&self.config.temp_prefix))
            .unwrap_or(false);

        if is_temp && path.exists() {
            match std::fs::remove_file(path) {
                Ok(()) => debug!("Removed temporary source {}", path.display()),
                Err(e) => warn!("Error during cleanup of {}: {}", path.display(), e),
            }
        }
    }
}
