//! Downloadable result artifacts.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::agents::RequestKind;

/// Document name up to the first dot ("ugovor.v2.pdf" -> "ugovor").
pub fn document_stem(doc_name: &str) -> &str {
    let base = Path::new(doc_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(doc_name);
    base.split('.').next().unwrap_or(base)
}

/// `"{kind}_{stem}_{YYYYmmdd_HHMMSS}.{ext}"`
pub fn download_filename(kind: RequestKind, doc_name: &str, ext: &str, now: NaiveDateTime) -> String {
    format!(
        "{}_{}_{}.{}",
        kind.as_str(),
        document_stem(doc_name),
        now.format("%Y%m%d_%H%M%S"),
        ext
    )
}

/// `"{Display Name} - {stem}"`
pub fn artifact_title(kind: RequestKind, doc_name: &str) -> String {
    format!("{} - {}", kind.display_name(), document_stem(doc_name))
}

/// Write a titled plain-text artifact into `dir` and return its path.
pub fn write_artifact(
    dir: &Path,
    kind: RequestKind,
    doc_name: &str,
    text: &str,
) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(download_filename(
        kind,
        doc_name,
        "txt",
        Local::now().naive_local(),
    ));
    let contents = format!("{}\n\n{}\n", artifact_title(kind, doc_name), text);
    std::fs::write(&path, contents)?;
    tracing::info!("Wrote {} to {}", kind.display_name(), path.display());
    Ok(path)
}
