//! Oracle router: builds the configured backends and picks one by name.
//!
//! Every backend registered through [`build_from_config`] is wrapped in a
//! [`RetryingOracle`], so callers always receive the retrying variant.

use crate::anthropic::AnthropicOracle;
use crate::openai_compat::OpenAiCompatOracle;
use crate::retry::{RetryPolicy, RetryingOracle};
use readagent_config::AppConfig;
use readagent_core::error::OracleError;
use readagent_core::oracle::Oracle;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Backends the router knows how to build without an explicit `api_url`.
pub const KNOWN_PROVIDERS: &[&str] = &[
    "openai",
    "anthropic",
    "openrouter",
    "gemini",
    "ollama",
    "deepseek",
    "groq",
    "together",
    "vllm",
];

/// Routes oracle calls to the correct backend.
pub struct OracleRouter {
    oracles: HashMap<String, Arc<dyn Oracle>>,
    default_oracle: String,
}

impl OracleRouter {
    /// Create a new router with a default backend name.
    pub fn new(default_oracle: impl Into<String>) -> Self {
        Self {
            oracles: HashMap::new(),
            default_oracle: default_oracle.into(),
        }
    }

    /// Register an oracle under a name.
    pub fn register(&mut self, name: impl Into<String>, oracle: Arc<dyn Oracle>) {
        self.oracles.insert(name.into(), oracle);
    }

    /// Get the default oracle.
    pub fn default(&self) -> Option<Arc<dyn Oracle>> {
        self.oracles.get(&self.default_oracle).cloned()
    }

    pub fn default_name(&self) -> &str {
        &self.default_oracle
    }

    /// Get a specific oracle by name or alias.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Oracle>> {
        self.oracles.get(canonical_name(name)).cloned()
    }

    /// Pick an oracle: the named one if given, the default otherwise.
    pub fn select(&self, name: Option<&str>) -> Result<Arc<dyn Oracle>, OracleError> {
        let wanted = name.unwrap_or(&self.default_oracle);
        self.get(wanted).ok_or_else(|| {
            OracleError::NotConfigured(format!(
                "No oracle named '{wanted}' (available: {})",
                self.list().join(", ")
            ))
        })
    }

    /// List all registered oracle names, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.oracles.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// Build oracles from configuration.
///
/// Every `[providers.*]` table becomes a backend, and the default provider is
/// always present even when it has no table of its own.
pub fn build_from_config(config: &AppConfig) -> OracleRouter {
    let default_name = canonical_name(&config.default_provider).to_string();
    let mut router = OracleRouter::new(&default_name);
    let policy = RetryPolicy::from_config(&config.retry);

    let mut names: Vec<String> = config
        .providers
        .keys()
        .map(|n| canonical_name(n).to_string())
        .collect();
    if !names.contains(&default_name) {
        names.push(default_name);
    }

    for name in names {
        let oracle = build_oracle(config, &name);
        debug!(oracle = %name, "Registered oracle backend");
        router.register(
            name,
            Arc::new(RetryingOracle::new(oracle, policy.clone())),
        );
    }

    router
}

/// Build a single, non-retrying backend for a provider name.
pub fn build_oracle(config: &AppConfig, name: &str) -> Arc<dyn Oracle> {
    let provider_config = config
        .providers
        .get(name)
        .or_else(|| config.providers.iter().find(|(k, _)| canonical_name(k) == name).map(|(_, v)| v));

    let api_key = provider_config
        .and_then(|p| p.api_key.clone())
        .or_else(|| config.api_key.clone())
        .unwrap_or_default();
    let api_url = provider_config.and_then(|p| p.api_url.clone());
    let model = config.model_for(name);

    if name == "anthropic" {
        let mut oracle = AnthropicOracle::new(api_key, model)
            .with_temperature(config.default_temperature)
            .with_max_tokens(config.default_max_tokens);
        if let Some(url) = api_url {
            oracle = oracle.with_base_url(url);
        }
        return Arc::new(oracle);
    }

    let base_url = api_url.unwrap_or_else(|| default_base_url(name));
    let api_key = if api_key.is_empty() && name == "ollama" {
        "ollama".to_string()
    } else {
        api_key
    };

    Arc::new(
        OpenAiCompatOracle::new(name, base_url, api_key, model)
            .with_temperature(config.default_temperature)
            .with_max_tokens(config.default_max_tokens),
    )
}

/// Map short aliases to the backend they stand for.
pub fn canonical_name(name: &str) -> &str {
    match name {
        "gpt" => "openai",
        "claude" | "haiku" => "anthropic",
        "gemini-flash" => "gemini",
        other => other,
    }
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "gemini" => "https://generativelanguage.googleapis.com/v1beta/openai".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "deepseek" => "https://api.deepseek.com/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use readagent_config::ProviderConfig;

    #[test]
    fn router_register_and_lookup() {
        let mut router = OracleRouter::new("openrouter");
        let oracle = Arc::new(OpenAiCompatOracle::openrouter("sk-test", "m"));
        router.register("openrouter", oracle);

        assert!(router.get("openrouter").is_some());
        assert!(router.get("nonexistent").is_none());
        assert!(router.default().is_some());
        assert_eq!(router.default_name(), "openrouter");
    }

    #[test]
    fn aliases_resolve() {
        assert_eq!(canonical_name("gpt"), "openai");
        assert_eq!(canonical_name("haiku"), "anthropic");
        assert_eq!(canonical_name("groq"), "groq");

        let mut router = OracleRouter::new("openai");
        router.register("openai", Arc::new(OpenAiCompatOracle::openai("k", "m")));
        assert_eq!(router.get("gpt").unwrap().name(), "openai");
    }

    #[test]
    fn select_unknown_reports_available() {
        let mut router = OracleRouter::new("openai");
        router.register("openai", Arc::new(OpenAiCompatOracle::openai("k", "m")));

        assert!(router.select(None).is_ok());
        match router.select(Some("mystery")) {
            Err(OracleError::NotConfigured(msg)) => {
                assert!(msg.contains("mystery"));
                assert!(msg.contains("openai"));
            }
            Err(other) => panic!("Expected NotConfigured, got: {other:?}"),
            Ok(_) => panic!("Expected an error"),
        }
    }

    #[test]
    fn default_base_urls() {
        assert!(default_base_url("openrouter").contains("openrouter.ai"));
        assert!(default_base_url("openai").contains("api.openai.com"));
        assert!(default_base_url("gemini").contains("googleapis.com"));
        assert!(default_base_url("ollama").contains("localhost:11434"));
    }

    #[test]
    fn build_from_default_config() {
        let config = AppConfig::default();
        let router = build_from_config(&config);
        let oracle = router.default().unwrap();
        assert_eq!(oracle.name(), "openai");
        assert_eq!(router.list(), vec!["openai"]);
    }

    #[test]
    fn build_registers_configured_providers() {
        let mut config = AppConfig {
            default_provider: "haiku".into(),
            ..AppConfig::default()
        };
        config.providers.insert(
            "ollama".into(),
            ProviderConfig {
                api_key: None,
                api_url: Some("http://gpu-box:11434/v1".into()),
                default_model: Some("llama3".into()),
            },
        );

        let router = build_from_config(&config);
        assert_eq!(router.list(), vec!["anthropic", "ollama"]);
        assert_eq!(router.default().unwrap().name(), "anthropic");
        assert_eq!(router.get("ollama").unwrap().name(), "ollama");
    }
}
