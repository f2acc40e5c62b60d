//! LLM client configuration.

use serde::{Deserialize, Serialize};

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI-compatible API (OpenAI, Groq, Together.ai, etc.)
    #[default]
    OpenAI,
    /// Ollama API (local)
    Ollama,
}

impl LlmProvider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Some(Self::Ollama),
            "openai" | "groq" | "together" => Some(Self::OpenAI),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Ollama => "ollama",
        }
    }
}

/// Configuration for LLM client.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Whether completion calls are allowed at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// LLM provider (openai or ollama)
    #[serde(default)]
    pub provider: LlmProvider,
    /// API endpoint without the path (provider-specific defaults apply)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API key for OpenAI-compatible providers
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Model name
    #[serde(default = "default_model")]
    pub model: String,
    /// Maximum tokens in response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Temperature for generation (0.0 - 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Extra attempts on connection errors, 429 and 5xx (0 = fail on first error)
    #[serde(default)]
    pub max_retries: u32,
    /// Base delay for exponential backoff between retries
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_endpoint() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_retry_base_delay_ms() -> u64 {
    1000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: LlmProvider::default(),
            endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            max_retries: 0,
            retry_base_delay_ms: default_retry_base_delay_ms(),
        }
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("enabled", &self.enabled)
            .field("provider", &self.provider)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_base_delay_ms", &self.retry_base_delay_ms)
            .finish()
    }
}

impl LlmConfig {
    /// Apply overrides from a variable lookup (the process environment in
    /// production, a fixed map in tests).
    ///
    /// Supported variables:
    /// - `LLM_ENABLED`: "true" or "false"
    /// - `LLM_PROVIDER`: "openai" (default), "ollama", "groq", or "together"
    /// - `LLM_ENDPOINT`: API endpoint (defaults based on provider)
    /// - `LLM_API_KEY`: API key, falls back to `OPENAI_API_KEY` / `GROQ_API_KEY`
    /// - `LLM_MODEL`: Model name
    /// - `LLM_MAX_TOKENS`: Maximum tokens in response
    /// - `LLM_TEMPERATURE`: Generation temperature
    /// - `LLM_MAX_RETRIES`: Retry attempts at the HTTP boundary
    pub fn with_overrides_from(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(val) = var("LLM_ENABLED") {
            self.enabled = val.eq_ignore_ascii_case("true") || val == "1";
        }

        let explicit_provider = var("LLM_PROVIDER").map(|p| p.to_lowercase());
        if let Some(provider) = explicit_provider.as_deref().and_then(LlmProvider::from_str) {
            self.provider = provider;
        }

        let explicit_endpoint = var("LLM_ENDPOINT");
        if let Some(endpoint) = &explicit_endpoint {
            self.endpoint = endpoint.clone();
        } else if let Some(provider) = explicit_provider.as_deref() {
            match provider {
                "groq" => self.endpoint = "https://api.groq.com/openai".to_string(),
                "together" => self.endpoint = "https://api.together.xyz".to_string(),
                "openai" => self.endpoint = default_endpoint(),
                "ollama" => self.endpoint = "http://localhost:11434".to_string(),
                _ => {}
            }
        }

        // Explicit API key always wins
        if let Some(key) = var("LLM_API_KEY") {
            self.api_key = Some(key);
        } else if self.api_key.is_none() {
            self.api_key = match explicit_provider.as_deref() {
                Some("groq") => var("GROQ_API_KEY"),
                _ => var("OPENAI_API_KEY"),
            };
        }

        if let Some(val) = var("LLM_MODEL") {
            self.model = val;
        }
        if let Some(n) = var("LLM_MAX_TOKENS").and_then(|v| v.parse().ok()) {
            self.max_tokens = n;
        }
        if let Some(t) = var("LLM_TEMPERATURE").and_then(|v| v.parse().ok()) {
            self.temperature = t;
        }
        if let Some(n) = var("LLM_MAX_RETRIES").and_then(|v| v.parse().ok()) {
            self.max_retries = n;
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Whether the configured provider can be called as-is.
    pub fn has_credentials(&self) -> bool {
        match self.provider {
            LlmProvider::OpenAI => self.api_key.as_deref().is_some_and(|k| !k.is_empty()),
            LlmProvider::Ollama => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = LlmConfig::default();
        assert!(config.enabled);
        assert_eq!(config.provider, LlmProvider::OpenAI);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.max_retries, 0);
        assert!(!config.has_credentials());
    }

    #[test]
    fn test_openai_key_fallback() {
        let config = LlmConfig::default().with_overrides_from(lookup(&[("OPENAI_API_KEY", "sk-x")]));
        assert_eq!(config.api_key.as_deref(), Some("sk-x"));
        assert!(config.has_credentials());
    }

    #[test]
    fn test_explicit_key_wins() {
        let config = LlmConfig::default().with_overrides_from(lookup(&[
            ("OPENAI_API_KEY", "sk-x"),
            ("LLM_API_KEY", "sk-explicit"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("sk-explicit"));
    }

    #[test]
    fn test_groq_provider_defaults() {
        let config = LlmConfig::default().with_overrides_from(lookup(&[
            ("LLM_PROVIDER", "groq"),
            ("GROQ_API_KEY", "gsk"),
            ("LLM_MODEL", "llama-3.1-70b-versatile"),
        ]));
        assert_eq!(config.provider, LlmProvider::OpenAI);
        assert_eq!(config.endpoint, "https://api.groq.com/openai");
        assert_eq!(config.api_key.as_deref(), Some("gsk"));
        assert_eq!(config.model, "llama-3.1-70b-versatile");
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let config = LlmConfig::default().with_overrides_from(lookup(&[("LLM_PROVIDER", "ollama")]));
        assert_eq!(config.endpoint, "http://localhost:11434");
        assert!(config.has_credentials());
    }

    #[test]
    fn test_numeric_overrides_ignore_garbage() {
        let config = LlmConfig::default().with_overrides_from(lookup(&[
            ("LLM_MAX_TOKENS", "lots"),
            ("LLM_TEMPERATURE", "0.2"),
            ("LLM_MAX_RETRIES", "3"),
        ]));
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = LlmConfig::default().with_api_key("sk-secret");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
