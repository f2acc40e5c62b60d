//! Fixed-size document chunking.

/// Default maximum chunk length in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 5000;

/// Split `document` into consecutive pieces of at most `max_chars` characters.
///
/// Cuts fall purely on character count, so words and citations may be split.
/// An empty document yields no chunks; `max_chars == 0` disables splitting.
pub fn chunk_document(document: &str, max_chars: usize) -> Vec<&str> {
    if document.is_empty() {
        return Vec::new();
    }
    if max_chars == 0 {
        return vec![document];
    }

    let mut chunks = Vec::with_capacity(document.len() / max_chars + 1);
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in document.char_indices() {
        if count == max_chars {
            chunks.push(&document[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    chunks.push(&document[start..]);
    chunks
}
