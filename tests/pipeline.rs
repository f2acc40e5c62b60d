//! Pipeline Tests
//!
//! Drives the public API end to end (PDF -> extracted text -> session ->
//! dispatch -> artifact) with scripted PDF, OCR and completion backends.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use lexdraft::agents::{default_template, render};
use lexdraft::artifact::write_artifact;
use lexdraft::llm::{CompletionBackend, LlmError};
use lexdraft::ocr::{
    ExtractorConfig, OcrBackend, OcrError, OcrResult, PdfBackend, PdfDocument,
};
use lexdraft::{
    AgentResult, DispatchConfig, Dispatcher, DocumentSession, ExtractionError, RequestKind,
    TextExtractor,
};

/// PDFs keyed by file name; each entry lists the embedded text per page.
struct FakePdfs {
    documents: HashMap<String, Vec<&'static str>>,
}

struct FakeDocument {
    pages: Vec<&'static str>,
}

impl PdfBackend for FakePdfs {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, ExtractionError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        match self.documents.get(&name) {
            Some(pages) => Ok(Box::new(FakeDocument {
                pages: pages.clone(),
            })),
            None => Err(ExtractionError::cannot_open(path, "unreadable")),
        }
    }
}

impl PdfDocument for FakeDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_text(&self, page: u32) -> Result<String, ExtractionError> {
        Ok(self.pages[page as usize - 1].to_string())
    }

    fn render_page(&self, page: u32, _dpi: u32) -> Result<PathBuf, OcrError> {
        Ok(PathBuf::from(format!("scan-{}.png", page)))
    }
}

/// Recognizes every image as "skenirano <image>".
struct FakeOcr;

impl OcrBackend for FakeOcr {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn availability_hint(&self) -> String {
        String::new()
    }

    fn ocr_image(&self, image_path: &Path, _language: &str) -> Result<OcrResult, OcrError> {
        Ok(OcrResult {
            text: format!("skenirano {}", image_path.display()),
            backend: "fake",
            processing_time_ms: 1,
        })
    }
}

/// Echoes a call counter and records each user prompt.
#[derive(Default)]
struct EchoCompletion {
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl CompletionBackend for EchoCompletion {
    async fn complete(&self, _system: &str, user: &str) -> Result<String, LlmError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.prompts.lock().unwrap().push(user.to_string());
        Ok(format!("deo-{}", n))
    }
}

fn extractor(documents: &[(&str, Vec<&'static str>)]) -> Arc<TextExtractor> {
    let pdfs = FakePdfs {
        documents: documents
            .iter()
            .map(|(name, pages)| (name.to_string(), pages.clone()))
            .collect(),
    };
    Arc::new(TextExtractor::with_backends(
        Arc::new(pdfs),
        Arc::new(FakeOcr),
        ExtractorConfig::default(),
    ))
}

#[tokio::test]
async fn test_scanned_document_through_summary() {
    let extractor = extractor(&[("presuda.pdf", vec!["Prva strana.", "", "Treća strana."])]);
    let text = extractor
        .extract_async(PathBuf::from("presuda.pdf"))
        .await
        .unwrap();
    assert_eq!(text, "Prva strana.\nskenirano scan-2.png\nTreća strana.");

    let mut session = DocumentSession::new();
    session.insert("presuda.pdf", text.clone());

    let backend = Arc::new(EchoCompletion::default());
    let dispatcher = Dispatcher::new(backend.clone(), DispatchConfig::default());
    let result = dispatcher
        .run(session.current_text().unwrap(), RequestKind::Summary, None)
        .await;

    assert_eq!(result, AgentResult::Success("deo-1".to_string()));
    assert_eq!(
        *backend.prompts.lock().unwrap(),
        vec![render(
            default_template(RequestKind::Summary),
            &[("document", text.as_str())]
        )]
    );
}

#[tokio::test]
async fn test_long_document_is_chunked_and_saved() {
    let backend = Arc::new(EchoCompletion::default());
    let dispatcher = Dispatcher::new(backend.clone(), DispatchConfig::default());
    let document = "AAAAA".repeat(2000);

    let result = dispatcher
        .run_request(&document, "summary", None)
        .await
        .unwrap();
    let text = result.into_result().unwrap();
    assert_eq!(text, "deo-1 deo-2");
    assert_eq!(backend.calls.load(Ordering::SeqCst), 2);

    let dir = tempfile::tempdir().unwrap();
    let path = write_artifact(dir.path(), RequestKind::Summary, "presuda.pdf", &text).unwrap();
    let saved = std::fs::read_to_string(path).unwrap();
    assert!(saved.starts_with("Summary - presuda\n\n"));
    assert!(saved.contains("deo-1 deo-2"));
}

#[tokio::test]
async fn test_chat_across_documents() {
    let extractor = extractor(&[
        ("ugovor.pdf", vec!["Zakupac plaća 500 EUR mesečno."]),
        ("tuzba.pdf", vec!["Tužilac traži naknadu štete."]),
    ]);
    let mut session = DocumentSession::new();
    for name in ["ugovor.pdf", "tuzba.pdf"] {
        let text = extractor.extract_async(PathBuf::from(name)).await.unwrap();
        session.insert(name, text);
    }
    session.select("tuzba.pdf").unwrap();

    let backend = Arc::new(EchoCompletion::default());
    let dispatcher = Dispatcher::new(backend.clone(), DispatchConfig::default());
    let result = dispatcher
        .run(
            session.current_text().unwrap(),
            RequestKind::Chat,
            Some("Šta traži tužilac?"),
        )
        .await;

    assert!(result.is_success());
    let prompts = backend.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Tužilac traži naknadu štete."));
    assert!(!prompts[0].contains("Zakupac"));
}

#[tokio::test]
async fn test_unreadable_pdf_surfaces_error() {
    let extractor = extractor(&[]);
    let err = extractor
        .extract_async(PathBuf::from("ostecen.pdf"))
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractionError::CannotOpen { .. }));
    assert_eq!(err.to_string(), "cannot open ostecen.pdf: unreadable");
}

#[tokio::test]
async fn test_unknown_kind_never_calls_backend() {
    let backend = Arc::new(EchoCompletion::default());
    let dispatcher = Dispatcher::new(backend.clone(), DispatchConfig::default());
    let err = dispatcher
        .run_request("tekst", "summarise", None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid request type: summarise");
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}
