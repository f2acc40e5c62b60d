//! lexdraft - legal document drafting assistant.
//!
//! Extracts text from PDFs (embedded text first, OCR for scanned pages) and
//! runs the text through a language model to draft summaries, appeals,
//! reviews, lawsuits, lawsuit responses and contract analyses, or to answer
//! questions about a document.

pub mod agents;
pub mod artifact;
pub mod config;
pub mod llm;
pub mod ocr;
pub mod session;

pub use agents::{AgentResult, DispatchConfig, Dispatcher, InvalidRequestError, RequestKind};
pub use config::{Config, ConfigError};
pub use ocr::{ExtractionError, TextExtractor};
pub use session::{DocumentSession, SessionError};
