//! HTTP client for text-completion services.
//!
//! Speaks the OpenAI chat-completions API (OpenAI, Groq, Together.ai and other
//! compatible services) and the Ollama generate API.

mod config;
mod retry;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use config::{LlmConfig, LlmProvider};
use retry::{backoff_delay, parse_retry_after};

use super::backend::{CompletionBackend, LlmError};

/// LLM client for document processing.
pub struct LlmClient {
    config: LlmConfig,
    client: Client,
}

/// OpenAI chat-completions request format.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Ollama API request format.
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama API response format.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

/// A failed attempt, with the server's requested wait if it sent one.
struct RequestFailure {
    error: LlmError,
    retry_after: Option<Duration>,
}

impl From<LlmError> for RequestFailure {
    fn from(error: LlmError) -> Self {
        Self {
            error,
            retry_after: None,
        }
    }
}

impl LlmClient {
    /// Create a new LLM client with the given configuration.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Connection(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Get the config.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Check if the LLM service answers at all.
    pub async fn is_available(&self) -> bool {
        if !self.config.enabled {
            return false;
        }
        let request = match self.config.provider {
            LlmProvider::Ollama => self.client.get(self.url("/api/tags")),
            LlmProvider::OpenAI => {
                let Some(key) = self.config.api_key.as_deref() else {
                    return false;
                };
                self.client.get(self.url("/v1/models")).bearer_auth(key)
            }
        };
        match request.send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    async fn send(&self, system: &str, user: &str) -> Result<String, RequestFailure> {
        match self.config.provider {
            LlmProvider::OpenAI => self.call_openai(system, user).await,
            LlmProvider::Ollama => self.call_ollama(system, user).await,
        }
    }

    /// Call an OpenAI-compatible chat-completions endpoint.
    async fn call_openai(&self, system: &str, user: &str) -> Result<String, RequestFailure> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(LlmError::MissingApiKey)?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let resp = self
            .client
            .post(self.url("/v1/chat/completions"))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        let body = read_success_body(resp).await?;
        Ok(parse_chat_response(&body)?)
    }

    /// Call Ollama's generate API.
    async fn call_ollama(&self, system: &str, user: &str) -> Result<String, RequestFailure> {
        let request = OllamaRequest {
            model: &self.config.model,
            system,
            prompt: user,
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
        };

        let resp = self
            .client
            .post(self.url("/api/generate"))
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        let body = read_success_body(resp).await?;
        Ok(parse_ollama_response(&body)?)
    }
}

#[async_trait]
impl CompletionBackend for LlmClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        if !self.config.enabled {
            return Err(LlmError::Disabled);
        }

        let mut attempt = 0;
        loop {
            debug!(
                "Completion request to {} ({} prompt chars, attempt {})",
                self.config.model,
                user.chars().count(),
                attempt + 1
            );
            match self.send(system, user).await {
                Ok(text) => return Ok(text),
                Err(failure) if failure.error.is_retryable() && attempt < self.config.max_retries => {
                    let wait = retry_wait(&failure, attempt, self.config.retry_base_delay_ms);
                    warn!(
                        "Completion failed (attempt {}): {}, retrying in {:?}",
                        attempt + 1,
                        failure.error,
                        wait
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(failure) => return Err(failure.error),
            }
        }
    }
}

/// Server-requested wait if there is one, else exponential backoff.
fn retry_wait(failure: &RequestFailure, attempt: u32, base_ms: u64) -> Duration {
    failure
        .retry_after
        .unwrap_or_else(|| backoff_delay(attempt, base_ms))
}

/// Return the response body on 2xx, otherwise an `Api` failure.
async fn read_success_body(resp: Response) -> Result<String, RequestFailure> {
    let status = resp.status();
    if !status.is_success() {
        let retry_after = parse_retry_after(
            resp.headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok()),
        );
        let body = resp.text().await.unwrap_or_default();
        return Err(RequestFailure {
            error: LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            },
            retry_after,
        });
    }
    resp.text()
        .await
        .map_err(|e| LlmError::Connection(e.to_string()).into())
}

/// Pull the first choice's content out of a chat-completions response.
fn parse_chat_response(body: &str) -> Result<String, LlmError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| LlmError::Parse(e.to_string()))?;
    response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content.unwrap_or_default())
        .ok_or_else(|| LlmError::Parse("Response contained no choices".to_string()))
}

fn parse_ollama_response(body: &str) -> Result<String, LlmError> {
    serde_json::from_str::<OllamaResponse>(body)
        .map(|r| r.response)
        .map_err(|e| LlmError::Parse(e.to_string()))
}

/// Prefer the structured `error.message`, fall back to the raw body.
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => {
            let trimmed = body.trim();
            if trimmed.chars().count() > 500 {
                format!("{}...", trimmed.chars().take(500).collect::<String>())
            } else {
                trimmed.to_string()
            }
        }
    }
}
