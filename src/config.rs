//! Configuration management for lexdraft using the prefer crate.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::agents::DispatchConfig;
use crate::llm::LlmConfig;
use crate::ocr::ExtractorConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config {}: {message}", path.display())]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Where downloadable artifacts go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ocr: ExtractorConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// File this configuration was read from, if any.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration: explicit path, else prefer discovery, else defaults.
    /// Environment overrides are applied last, then the result is validated.
    pub async fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => Self::load_from_path(path).await?,
            None => match Self::discover().await {
                Some(path) => Self::load_from_path(&path).await?,
                None => Self::default(),
            },
        };

        let config = config.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Find a `lexdraft` config file in the standard locations.
    async fn discover() -> Option<PathBuf> {
        match prefer::load("lexdraft").await {
            Ok(found) => found.source_path().map(|p| p.to_path_buf()),
            Err(e) => {
                debug!("No config file discovered: {}", e);
                None
            }
        }
    }

    /// Load configuration from a specific file path.
    /// The format is chosen by extension: TOML, YAML, otherwise JSON.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let mut config = Self::parse(path, &contents)?;
        config.source_path = Some(path.to_path_buf());
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let parse_error = |format: &'static str, message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            format,
            message,
        };

        match ext {
            "toml" => toml::from_str(contents).map_err(|e| parse_error("TOML", e.to_string())),
            "yaml" | "yml" => {
                serde_yaml::from_str(contents).map_err(|e| parse_error("YAML", e.to_string()))
            }
            _ => serde_json::from_str(contents).map_err(|e| parse_error("JSON", e.to_string())),
        }
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// - `LEXDRAFT_OCR_LANG`: Tesseract language code(s)
    /// - `LEXDRAFT_TESSDATA_DIR`: traineddata directory
    /// - `LEXDRAFT_CHUNK_SIZE`: characters per chunk
    /// - `LEXDRAFT_OUTPUT_DIR`: artifact directory
    /// - `LLM_*`: see [`LlmConfig::with_overrides_from`]
    pub fn with_overrides_from(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(lang) = var("LEXDRAFT_OCR_LANG").filter(|v| !v.is_empty()) {
            self.ocr.language = lang;
        }
        if let Some(dir) = var("LEXDRAFT_TESSDATA_DIR").filter(|v| !v.is_empty()) {
            self.ocr.tessdata_dir = Some(PathBuf::from(dir));
        }
        if let Some(size) = var("LEXDRAFT_CHUNK_SIZE").and_then(|v| v.parse().ok()) {
            self.dispatch.chunk_size = size;
        }
        if let Some(dir) = var("LEXDRAFT_OUTPUT_DIR").filter(|v| !v.is_empty()) {
            self.output.dir = PathBuf::from(dir);
        }

        self.llm = self.llm.with_overrides_from(&var);
        self.expand_paths()
    }

    fn expand_paths(mut self) -> Self {
        self.output.dir = expand_tilde(&self.output.dir);
        self.ocr.tessdata_dir = self.ocr.tessdata_dir.as_deref().map(expand_tilde);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ocr.language.trim().is_empty() {
            return Err(ConfigError::Invalid("ocr.language must not be empty".into()));
        }
        if self.ocr.render_dpi == 0 {
            return Err(ConfigError::Invalid("ocr.render_dpi must be positive".into()));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Invalid(format!(
                "llm.temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }
        self.dispatch.validate().map_err(ConfigError::Invalid)
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).as_ref()),
        None => path.to_path_buf(),
    }
}
