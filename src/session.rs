//! In-memory state for one interactive session.
//!
//! Holds extracted text per document identifier and the chat transcript.
//! A single owner mutates it; there is no locking.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No document named '{0}' has been loaded")]
    UnknownDocument(String),

    #[error("No document is selected")]
    NoCurrentDocument,
}

/// Who wrote a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Default)]
pub struct DocumentSession {
    documents: HashMap<String, String>,
    current: Option<String>,
    messages: Vec<ChatMessage>,
}

impl DocumentSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store extracted text for a document. Re-inserting replaces the old text.
    /// The first document stored becomes the current one.
    pub fn insert(&mut self, id: impl Into<String>, text: String) {
        let id = id.into();
        if self.current.is_none() {
            self.current = Some(id.clone());
        }
        self.documents.insert(id, text);
    }

    pub fn remove(&mut self, id: &str) -> Option<String> {
        let removed = self.documents.remove(id);
        if self.current.as_deref() == Some(id) {
            self.current = None;
        }
        removed
    }

    pub fn select(&mut self, id: &str) -> Result<(), SessionError> {
        if !self.documents.contains_key(id) {
            return Err(SessionError::UnknownDocument(id.to_string()));
        }
        self.current = Some(id.to_string());
        Ok(())
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current_text(&self) -> Result<&str, SessionError> {
        let id = self.current.as_deref().ok_or(SessionError::NoCurrentDocument)?;
        self.documents
            .get(id)
            .map(String::as_str)
            .ok_or_else(|| SessionError::UnknownDocument(id.to_string()))
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.documents.get(id).map(String::as_str)
    }

    /// Loaded document identifiers, sorted.
    pub fn document_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.documents.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn push_message(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role,
            content: content.into(),
        });
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Forget the transcript, keep the documents.
    pub fn clear_chat(&mut self) {
        self.messages.clear();
    }

    /// Start over: no documents, no transcript.
    pub fn reset(&mut self) {
        self.documents.clear();
        self.current = None;
        self.messages.clear();
    }
}
