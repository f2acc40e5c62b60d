//! LLM integration: the completion seam and its HTTP implementation.

mod backend;
mod client;

pub use backend::{CompletionBackend, LlmError};
pub use client::{LlmClient, LlmConfig, LlmProvider};
