//! Shared helper functions for CLI commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use tempfile::TempDir;

use lexdraft::llm::LlmClient;
use lexdraft::{Config, Dispatcher, TextExtractor};

pub fn build_extractor(config: &Config) -> Arc<TextExtractor> {
    Arc::new(TextExtractor::new(config.ocr.clone()))
}

pub fn build_dispatcher(config: &Config) -> anyhow::Result<Dispatcher> {
    let client = LlmClient::new(config.llm.clone())?;
    Ok(Dispatcher::new(Arc::new(client), config.dispatch.clone()))
}

/// Session identifier for a document: its file name.
pub fn document_id(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read a document's text: OCR/extract a PDF, or read it as-is with `as_text`.
pub async fn load_text(
    extractor: &Arc<TextExtractor>,
    path: &Path,
    as_text: bool,
) -> anyhow::Result<String> {
    if as_text {
        return Ok(tokio::fs::read_to_string(path).await?);
    }
    // Only the staged copy carries the temp prefix the extractor deletes.
    let (_staging, staged) = stage_upload(path, &extractor.config().temp_prefix).await?;

    let pb = spinner(format!("Extracting text from {}", document_id(path)))?;
    let result = extractor.extract_async(staged).await;
    pb.finish_and_clear();
    Ok(result?)
}

/// Copy `path` into a fresh scratch directory as `{prefix}{file name}`.
async fn stage_upload(path: &Path, prefix: &str) -> anyhow::Result<(TempDir, PathBuf)> {
    let staging = TempDir::new()?;
    let staged = staging
        .path()
        .join(format!("{}{}", prefix, document_id(path)));
    tokio::fs::copy(path, &staged)
        .await
        .with_context(|| format!("cannot open {}", path.display()))?;
    Ok((staging, staged))
}

pub fn spinner(message: impl Into<String>) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_is_file_name() {
        assert_eq!(document_id(Path::new("/tmp/predmet/tuzba.pdf")), "tuzba.pdf");
        assert_eq!(document_id(Path::new("ugovor.pdf")), "ugovor.pdf");
    }

    #[tokio::test]
    async fn test_load_text_reads_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presuda.txt");
        std::fs::write(&path, "Tekst presude.").unwrap();

        let extractor = build_extractor(&Config::default());
        assert_eq!(load_text(&extractor, &path, true).await.unwrap(), "Tekst presude.");
    }

    #[tokio::test]
    async fn test_user_temp_named_input_survives_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("temp_ugovor.pdf");
        std::fs::write(&path, b"not really a pdf").unwrap();

        let extractor = build_extractor(&Config::default());
        assert!(load_text(&extractor, &path, false).await.is_err());
        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap(), b"not really a pdf");
    }

    #[tokio::test]
    async fn test_stage_upload_copies_with_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zalba.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let (staging, staged) = stage_upload(&path, "temp_").await.unwrap();
        assert_eq!(staged, staging.path().join("temp_zalba.pdf"));
        assert_eq!(std::fs::read(&staged).unwrap(), b"%PDF-1.4");

        drop(staging);
        assert!(!staged.exists());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_stage_upload_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = stage_upload(&dir.path().join("nema.pdf"), "temp_")
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("cannot open"));
    }
}
