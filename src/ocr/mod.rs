//! OCR and text extraction module.
//!
//! Extracts text from PDFs using:
//! - pdftotext (Poppler) for embedded page text
//! - pdftoppm + Tesseract OCR for pages that have no embedded text
//!
//! Both sides sit behind traits (`PdfBackend`, `OcrBackend`) so the
//! extraction routine can run against other engines or test doubles.

mod backend;
mod extractor;
mod pdf;
mod tesseract;
mod tools;

pub use backend::{OcrBackend, OcrError, OcrResult};
pub use extractor::{ExtractionError, ExtractorConfig, TextExtractor};
pub use pdf::{PdfBackend, PdfDocument, PopplerBackend};
pub use tesseract::TesseractBackend;
pub use tools::{check_binary, check_tools};
