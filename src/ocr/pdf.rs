//! PDF access for the extractor.
//!
//! `PopplerBackend` drives the Poppler command-line tools (`pdfinfo`,
//! `pdftotext`, `pdftoppm`). Rendered page images live in a scratch directory
//! owned by the opened document and disappear when it is dropped.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use super::backend::OcrError;
use super::extractor::ExtractionError;
use super::tools::{handle_cmd_output, ToolFailure};

/// Opens PDF files.
pub trait PdfBackend: Send + Sync {
    /// Open and validate a PDF.
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, ExtractionError>;
}

/// An opened PDF. Pages are 1-based.
pub trait PdfDocument {
    fn page_count(&self) -> u32;

    /// Direct (embedded) text of a page.
    fn page_text(&self, page: u32) -> Result<String, ExtractionError>;

    /// Rasterize a page at `dpi` and return the image path.
    fn render_page(&self, page: u32, dpi: u32) -> Result<PathBuf, OcrError>;
}

/// PDF backend based on poppler-utils.
#[derive(Debug, Clone, Copy, Default)]
pub struct PopplerBackend;

impl PopplerBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for PopplerBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, ExtractionError> {
        if !path.is_file() {
            return Err(ExtractionError::cannot_open(path, "file not found"));
        }

        let output = Command::new("pdfinfo").arg(path).output();
        let info = handle_cmd_output(output, "pdfinfo failed").map_err(|e| match e {
            ToolFailure::NotFound => {
                ExtractionError::ToolNotFound("pdfinfo (install poppler-utils)".to_string())
            }
            ToolFailure::Failed(msg) => ExtractionError::cannot_open(path, msg),
            ToolFailure::Io(e) => ExtractionError::Io(e),
        })?;

        let page_count = parse_page_count(&info)
            .ok_or_else(|| ExtractionError::cannot_open(path, "no page count reported"))?;

        Ok(Box::new(PopplerDocument {
            path: path.to_path_buf(),
            page_count,
            scratch: TempDir::new()?,
        }))
    }
}

/// Read the `Pages:` line from `pdfinfo` output.
fn parse_page_count(info: &str) -> Option<u32> {
    info.lines()
        .find(|line| line.starts_with("Pages:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|n| n.parse().ok())
}

struct PopplerDocument {
    path: PathBuf,
    page_count: u32,
    scratch: TempDir,
}

impl PopplerDocument {
    /// pdftoppm pads page numbers to the width of the page count (page-01.png, page-001.png).
    fn find_page_image(&self, page: u32) -> Option<PathBuf> {
        for digits in [1, 2, 3, 4, 5] {
            let filename = format!("page-{:0width$}.png", page, width = digits);
            let path = self.scratch.path().join(&filename);
            if path.exists() {
                return Some(path);
            }
        }
        None
    }
}

impl PopplerDocument {
    /// `pdftotext` for a single page, without the trailing form feed.
    fn text_command(&self, page: u32) -> Command {
        let page_str = page.to_string();
        let mut cmd = Command::new("pdftotext");
        cmd.args(["-layout", "-nopgbrk", "-enc", "UTF-8", "-f", &page_str, "-l", &page_str])
            .arg(&self.path)
            .arg("-");
        cmd
    }
}

/// Drop a trailing page-break form feed (and the line break after it).
fn strip_page_break(mut text: String) -> String {
    let kept = text.trim_end_matches(['\x0c', '\n']).len();
    if text[kept..].contains('\x0c') {
        text.truncate(kept);
        if kept > 0 {
            text.push('\n');
        }
    }
    text
}

impl PdfDocument for PopplerDocument {
    fn page_count(&self) -> u32 {
        self.page_count
    }

    fn page_text(&self, page: u32) -> Result<String, ExtractionError> {
        let output = self.text_command(page).output();

        let text = handle_cmd_output(output, &format!("pdftotext failed on page {}", page))
            .map_err(|e| match e {
                ToolFailure::NotFound => {
                    ExtractionError::ToolNotFound("pdftotext (install poppler-utils)".to_string())
                }
                ToolFailure::Failed(msg) => ExtractionError::cannot_open(&self.path, msg),
                ToolFailure::Io(e) => ExtractionError::Io(e),
            })?;
        Ok(strip_page_break(text))
    }

    fn render_page(&self, page: u32, dpi: u32) -> Result<PathBuf, OcrError> {
        let page_str = page.to_string();
        let dpi_str = dpi.to_string();
        let output = Command::new("pdftoppm")
            .args(["-png", "-r", &dpi_str, "-f", &page_str, "-l", &page_str])
            .arg(&self.path)
            .arg(self.scratch.path().join("page"))
            .output();

        handle_cmd_output(output, &format!("pdftoppm failed on page {}", page)).map_err(
            |e| match e {
                ToolFailure::NotFound => OcrError::BackendNotAvailable(
                    "pdftoppm not found (install poppler-utils)".to_string(),
                ),
                ToolFailure::Failed(msg) => OcrError::OcrFailed(msg),
                ToolFailure::Io(e) => OcrError::Io(e),
            },
        )?;

        self.find_page_image(page)
            .ok_or_else(|| OcrError::OcrFailed(format!("No image generated for page {}", page)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_count() {
        let info = "Title:          Ugovor\nProducer:       LibreOffice\nPages:          12\nEncrypted:      no\n";
        assert_eq!(parse_page_count(info), Some(12));
        assert_eq!(parse_page_count("Title: x\n"), None);
        assert_eq!(parse_page_count("Pages: many\n"), None);
    }

    #[test]
    fn test_open_missing_file() {
        let err = PopplerBackend::new()
            .open(Path::new("/nonexistent/path/to/file.pdf"))
            .err()
            .unwrap();
        assert!(matches!(err, ExtractionError::CannotOpen { .. }));
        assert!(err.to_string().starts_with("cannot open"));
    }

    #[test]
    fn test_text_command_suppresses_page_breaks() {
        let doc = PopplerDocument {
            path: PathBuf::from("/tmp/ugovor.pdf"),
            page_count: 3,
            scratch: TempDir::new().unwrap(),
        };
        let args: Vec<_> = doc
            .text_command(2)
            .get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        assert_eq!(
            args,
            vec!["-layout", "-nopgbrk", "-enc", "UTF-8", "-f", "2", "-l", "2", "/tmp/ugovor.pdf", "-"]
        );
    }

    #[test]
    fn test_strip_page_break() {
        assert_eq!(strip_page_break("Strana\n\x0c".to_string()), "Strana\n");
        assert_eq!(strip_page_break("Strana\n\x0c\n".to_string()), "Strana\n");
        assert_eq!(strip_page_break("Strana\n".to_string()), "Strana\n");
        assert_eq!(strip_page_break("\x0c".to_string()), "");
        assert_eq!(strip_page_break("a\x0cb\n".to_string()), "a\x0cb\n");
    }

    #[test]
    fn test_find_page_image_padding() {
        let doc = PopplerDocument {
            path: PathBuf::from("x.pdf"),
            page_count: 12,
            scratch: TempDir::new().unwrap(),
        };
        std::fs::write(doc.scratch.path().join("page-07.png"), b"").unwrap();
        assert_eq!(
            doc.find_page_image(7),
            Some(doc.scratch.path().join("page-07.png"))
        );
        assert_eq!(doc.find_page_image(8), None);
    }
}
