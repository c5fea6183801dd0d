//! Configuration loading, validation, and management for ReadAgent.
//!
//! Loads configuration from `~/.readagent/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The root configuration structure.
///
/// Maps directly to `~/.readagent/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default oracle backend
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Sampling temperature; 0.0 keeps page selection reproducible
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Max tokens per oracle response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Pagination heuristics
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Gisting settings
    #[serde(default)]
    pub gisting: GistingConfig,

    /// Retry/backoff policy applied around every backend
    #[serde(default)]
    pub retry: RetryConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.0
}
fn default_max_tokens() -> u32 {
    1024
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("pagination", &self.pagination)
            .field("gisting", &self.gisting)
            .field("retry", &self.retry)
            .field("providers", &self.providers)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

/// Window sizing for the paginator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Stop growing a window once it holds this many words
    #[serde(default = "default_word_limit")]
    pub word_limit: usize,

    /// Start labelling candidate break points after this many words
    #[serde(default = "default_start_threshold")]
    pub start_threshold: usize,

    /// A final window shorter than this becomes a page without asking the oracle
    #[serde(default = "default_short_window_words")]
    pub short_window_words: usize,

    /// Take the whole window when the oracle names no valid break point
    #[serde(default = "default_true")]
    pub allow_fallback_to_last: bool,
}

fn default_word_limit() -> usize {
    600
}
fn default_start_threshold() -> usize {
    280
}
fn default_short_window_words() -> usize {
    350
}
fn default_true() -> bool {
    true
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            word_limit: default_word_limit(),
            start_threshold: default_start_threshold(),
            short_window_words: default_short_window_words(),
            allow_fallback_to_last: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GistingConfig {
    /// Maximum number of pages gisted at the same time
    #[serde(default = "default_gist_concurrency")]
    pub concurrency: usize,
}

fn default_gist_concurrency() -> usize {
    4
}

impl Default for GistingConfig {
    fn default() -> Self {
        Self {
            concurrency: default_gist_concurrency(),
        }
    }
}

/// Retry with exponential backoff for transient backend failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per oracle call, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Per-attempt timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_max_attempts() -> u32 {
    5
}
fn default_initial_delay_ms() -> u64 {
    2000
}
fn default_multiplier() -> f64 {
    2.0
}
fn default_max_delay_ms() -> u64 {
    30_000
}
fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            multiplier: default_multiplier(),
            max_delay_ms: default_max_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl RetryConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.readagent/config.toml).
    ///
    /// Also checks environment variables for API keys:
    /// - `READAGENT_API_KEY` (highest priority)
    /// - `OPENAI_API_KEY`
    /// - `ANTHROPIC_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("READAGENT_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok())
                .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok());
        }

        if let Ok(provider) = std::env::var("READAGENT_PROVIDER") {
            config.default_provider = provider;
        }

        if let Ok(model) = std::env::var("READAGENT_MODEL") {
            config.default_model = model;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".readagent")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.pagination.word_limit == 0 {
            return Err(ConfigError::ValidationError(
                "pagination.word_limit must be > 0".into(),
            ));
        }

        if self.gisting.concurrency == 0 {
            return Err(ConfigError::ValidationError(
                "gisting.concurrency must be >= 1".into(),
            ));
        }

        if self.retry.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "retry.max_attempts must be >= 1".into(),
            ));
        }

        if self.retry.multiplier < 1.0 {
            return Err(ConfigError::ValidationError(
                "retry.multiplier must be >= 1.0".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
            || self
                .providers
                .get(&self.default_provider)
                .is_some_and(|p| p.api_key.is_some())
    }

    /// The model to use for a provider: per-provider override, then the default.
    pub fn model_for(&self, provider: &str) -> String {
        self.providers
            .get(provider)
            .and_then(|p| p.default_model.clone())
            .unwrap_or_else(|| self.default_model.clone())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            pagination: PaginationConfig::default(),
            gisting: GistingConfig::default(),
            retry: RetryConfig::default(),
            providers: HashMap::new(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
