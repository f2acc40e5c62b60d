//! Legal drafting agents.
//!
//! The [`Dispatcher`] turns extracted document text into a drafted result:
//! it picks the prompt template for the requested [`RequestKind`], splits the
//! text into fixed-size chunks, sends each chunk through the template to the
//! completion backend in order, and joins the answers with a single space.
//! Chat is the exception: one call over the whole document.

mod chunk;
mod kind;
mod prompts;

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::llm::{CompletionBackend, LlmError};

pub use chunk::{chunk_document, DEFAULT_CHUNK_SIZE};
pub use kind::{InvalidRequestError, RequestKind};
pub use prompts::{default_template, has_placeholder, render, system_prompt};

/// Outcome of one dispatch: the joined text or a displayable error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentResult {
    #[serde(rename = "result")]
    Success(String),
    #[serde(rename = "error")]
    Failure(String),
}

impl AgentResult {
    pub fn is_success(&self) -> bool {
        matches!(self, AgentResult::Success(_))
    }

    pub fn into_result(self) -> Result<String, String> {
        match self {
            AgentResult::Success(text) => Ok(text),
            AgentResult::Failure(err) => Err(err),
        }
    }
}

/// Dispatcher settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Maximum characters per chunk (0 = send the whole document at once).
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Per-kind template overrides, keyed by kind name.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub prompts: HashMap<String, String>,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            prompts: HashMap::new(),
        }
    }
}

impl DispatchConfig {
    /// Check prompt overrides: known kind names, at most one override per
    /// kind, required placeholders present.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen: HashMap<RequestKind, &str> = HashMap::new();
        for (name, template) in &self.prompts {
            let kind: RequestKind = name.parse().map_err(|e: InvalidRequestError| {
                format!("prompt override for unknown kind: {}", e.0)
            })?;
            if let Some(other) = seen.insert(kind, name.as_str()) {
                let (first, second) = if other < name.as_str() {
                    (other, name.as_str())
                } else {
                    (name.as_str(), other)
                };
                return Err(format!(
                    "prompt overrides '{}' and '{}' both name {}",
                    first, second, kind
                ));
            }
            if !has_placeholder(template, "document") {
                return Err(format!(
                    "prompt override for {} has no {{document}} placeholder",
                    kind
                ));
            }
        }
        Ok(())
    }

    /// The user template for a kind: override if configured, else built-in.
    pub fn template_for(&self, kind: RequestKind) -> &str {
        self.prompts
            .iter()
            .find(|(name, _)| name.parse::<RequestKind>().ok() == Some(kind))
            .map(|(_, template)| template.as_str())
            .unwrap_or_else(|| default_template(kind))
    }
}

/// Stateless request dispatcher over a completion backend.
pub struct Dispatcher {
    backend: Arc<dyn CompletionBackend>,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn CompletionBackend>, config: DispatchConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Dispatch by kind name. Unknown names fail before any completion call.
    pub async fn run_request(
        &self,
        document_text: &str,
        kind: &str,
        question: Option<&str>,
    ) -> Result<AgentResult, InvalidRequestError> {
        let kind: RequestKind = kind.parse()?;
        Ok(self.run(document_text, kind, question).await)
    }

    /// Run one request. Any completion failure discards partial output.
    pub async fn run(
        &self,
        document_text: &str,
        kind: RequestKind,
        question: Option<&str>,
    ) -> AgentResult {
        let outcome = if kind.is_chat() {
            self.answer(document_text, question.unwrap_or_default()).await
        } else {
            self.draft(document_text, kind).await
        };

        match outcome {
            Ok(text) => AgentResult::Success(text),
            Err(e) => {
                warn!("{} request failed: {}", kind, e);
                AgentResult::Failure(format!("{}: {}", kind.failure_prefix(), e))
            }
        }
    }

    /// Chunk loop shared by every drafting kind.
    async fn draft(&self, document_text: &str, kind: RequestKind) -> Result<String, LlmError> {
        let template = self.config.template_for(kind);
        let system = system_prompt(kind);
        let chunks = chunk_document(document_text, self.config.chunk_size);
        info!("Dispatching {} over {} chunk(s)", kind, chunks.len());

        let mut parts = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            let user = render(template, &[("document", chunk)]);
            debug!(
                "{} chunk {}/{} ({} chars)",
                kind,
                index + 1,
                chunks.len(),
                chunk.chars().count()
            );
            parts.push(self.backend.complete(system, &user).await?);
        }
        Ok(parts.join(" "))
    }

    async fn answer(&self, document_text: &str, question: &str) -> Result<String, LlmError> {
        let user = render(
            self.config.template_for(RequestKind::Chat),
            &[("question", question), ("document", document_text)],
        );
        info!("Answering chat question over {} chars", document_text.chars().count());
        self.backend
            .complete(system_prompt(RequestKind::Chat), &user)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every call; answers "odgovor-N" or fails on a chosen call.
    #[derive(Default)]
    struct CountingBackend {
        calls: Mutex<Vec<(String, String)>>,
        fail_on_call: Option<usize>,
    }

    impl CountingBackend {
        fn failing_on(call: usize) -> Self {
            Self {
                fail_on_call: Some(call),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionBackend for CountingBackend {
        async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
            let n = {
                let mut calls = self.calls.lock().unwrap();
                calls.push((system.to_string(), user.to_string()));
                calls.len()
            };
            if self.fail_on_call == Some(n) {
                return Err(LlmError::Api {
                    status: 429,
                    message: "quota exceeded".to_string(),
                });
            }
            Ok(format!("odgovor-{}", n))
        }
    }

    fn dispatcher(backend: Arc<CountingBackend>) -> Dispatcher {
        Dispatcher::new(backend, DispatchConfig::default())
    }

    #[tokio::test]
    async fn test_summary_two_chunks() {
        let backend = Arc::new(CountingBackend::default());
        let doc = "AAAAA".repeat(2000);

        let result = dispatcher(backend.clone())
            .run(&doc, RequestKind::Summary, None)
            .await;

        assert_eq!(result, AgentResult::Success("odgovor-1 odgovor-2".to_string()));
        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        let chunk = "A".repeat(5000);
        for (system, user) in &calls {
            assert_eq!(system, prompts::LEGAL_SYSTEM_PROMPT);
            assert_eq!(*user, render(prompts::SUMMARY_PROMPT, &[("document", chunk.as_str())]));
        }
    }

    #[tokio::test]
    async fn test_empty_appeal_makes_no_calls() {
        let backend = Arc::new(CountingBackend::default());
        let result = dispatcher(backend.clone())
            .run("", RequestKind::Appeal, None)
            .await;
        assert_eq!(result, AgentResult::Success(String::new()));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_kind_makes_no_calls() {
        let backend = Arc::new(CountingBackend::default());
        let err = dispatcher(backend.clone())
            .run_request("tekst", "translation", None)
            .await
            .unwrap_err();
        assert_eq!(err, InvalidRequestError("translation".to_string()));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_chat_is_single_call_over_whole_document() {
        let backend = Arc::new(CountingBackend::default());
        let doc = "B".repeat(12_345);

        let result = dispatcher(backend.clone())
            .run(&doc, RequestKind::Chat, Some("Koji je rok za žalbu?"))
            .await;

        assert!(result.is_success());
        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, prompts::CHAT_SYSTEM_PROMPT);
        assert!(calls[0].1.contains("User Question: Koji je rok za žalbu?"));
        assert!(calls[0].1.contains(&doc));
    }

    #[tokio::test]
    async fn test_chat_without_question() {
        let backend = Arc::new(CountingBackend::default());
        dispatcher(backend.clone())
            .run("tekst", RequestKind::Chat, None)
            .await;
        assert!(backend.calls()[0].1.contains("User Question: \n"));
    }

    #[tokio::test]
    async fn test_call_count_matches_chunks_for_every_drafting_kind() {
        let doc = "x".repeat(12_001);
        for kind in RequestKind::ALL.into_iter().filter(|k| !k.is_chat()) {
            let backend = Arc::new(CountingBackend::default());
            dispatcher(backend.clone()).run(&doc, kind, None).await;
            assert_eq!(backend.calls().len(), 3, "{}", kind);
        }
    }

    #[tokio::test]
    async fn test_failure_aborts_remaining_chunks() {
        let backend = Arc::new(CountingBackend::failing_on(2));
        let doc = "y".repeat(15_000);

        let result = dispatcher(backend.clone())
            .run(&doc, RequestKind::Lawsuit, None)
            .await;

        assert_eq!(
            result,
            AgentResult::Failure(
                "Error generating lawsuit: API error (HTTP 429): quota exceeded".to_string()
            )
        );
        assert_eq!(backend.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_chunk_order_is_preserved() {
        let backend = Arc::new(CountingBackend::default());
        let config = DispatchConfig {
            chunk_size: 3,
            prompts: HashMap::from([("review".to_string(), "[{document}]".to_string())]),
        };
        let result = Dispatcher::new(backend.clone(), config)
            .run("abcdefgh", RequestKind::Review, None)
            .await;

        let users: Vec<String> = backend.calls().into_iter().map(|(_, u)| u).collect();
        assert_eq!(users, vec!["[abc]", "[def]", "[gh]"]);
        assert_eq!(result.into_result().unwrap(), "odgovor-1 odgovor-2 odgovor-3");
    }

    #[test]
    fn test_prompt_override_validation() {
        let mut config = DispatchConfig::default();
        assert!(config.validate().is_ok());

        config.prompts.insert("summary".into(), "Sažmi: {document}".into());
        assert!(config.validate().is_ok());
        assert_eq!(config.template_for(RequestKind::Summary), "Sažmi: {document}");
        assert_eq!(config.template_for(RequestKind::Appeal), prompts::APPEAL_PROMPT);

        config.prompts.insert("appeal".into(), "no placeholder".into());
        assert!(config.validate().unwrap_err().contains("appeal"));

        config.prompts.remove("appeal");
        config.prompts.insert("poem".into(), "{document}".into());
        assert!(config.validate().unwrap_err().contains("unknown kind"));
    }

    #[test]
    fn test_overrides_naming_the_same_kind_are_rejected() {
        let config = DispatchConfig {
            chunk_size: DEFAULT_CHUNK_SIZE,
            prompts: HashMap::from([
                ("summary".to_string(), "A {document}".to_string()),
                ("Summary".to_string(), "B {document}".to_string()),
            ]),
        };
        assert_eq!(
            config.validate().unwrap_err(),
            "prompt overrides 'Summary' and 'summary' both name summary"
        );

        let config = DispatchConfig {
            chunk_size: DEFAULT_CHUNK_SIZE,
            prompts: HashMap::from([
                ("lawsuit_response".to_string(), "{document}".to_string()),
                ("lawsuit-response".to_string(), "{document}".to_string()),
            ]),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_agent_result_json_shape() {
        let ok = serde_json::to_string(&AgentResult::Success("x".into())).unwrap();
        let err = serde_json::to_string(&AgentResult::Failure("y".into())).unwrap();
        assert_eq!(ok, r#"{"result":"x"}"#);
        assert_eq!(err, r#"{"error":"y"}"#);
    }
}
