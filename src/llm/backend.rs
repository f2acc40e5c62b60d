//! The text-completion seam used by the dispatcher.

use async_trait::async_trait;

/// A service that turns a system instruction and a user instruction into generated text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError>;
}

/// Errors that can occur during LLM operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Failed to connect to LLM service
    Connection(String),
    /// API returned a non-success status
    Api { status: u16, message: String },
    /// Failed to parse response
    Parse(String),
    /// Provider requires an API key and none is configured
    MissingApiKey,
    /// LLM is disabled
    Disabled,
}

impl LlmError {
    /// Transient failures worth another attempt (connection drops, 429, 5xx).
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Connection(_) => true,
            LlmError::Api { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmError::Connection(msg) => write!(f, "Connection error: {}", msg),
            LlmError::Api { status, message } => write!(f, "API error (HTTP {}): {}", status, message),
            LlmError::Parse(msg) => write!(f, "Parse error: {}", msg),
            LlmError::MissingApiKey => write!(
                f,
                "API key not configured (set OPENAI_API_KEY or LLM_API_KEY)"
            ),
            LlmError::Disabled => write!(f, "LLM is disabled"),
        }
    }
}

impl std::error::Error for LlmError {}
