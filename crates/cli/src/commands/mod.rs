//! Subcommand implementations.

pub mod ask;
pub mod config_cmd;
pub mod import;
pub mod providers;
pub mod read;
pub mod show;

use readagent_config::AppConfig;
use readagent_core::oracle::Oracle;
use readagent_providers::router::{build_from_config, canonical_name};
use std::sync::Arc;
use tracing::debug;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Backends that run locally and need no API key.
const KEYLESS_PROVIDERS: &[&str] = &["ollama", "vllm"];

/// Load the configuration, turning failures into a readable message.
pub fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}

/// Build the retrying oracle for `provider`, or for the configured default.
pub fn select_oracle(
    config: &AppConfig,
    provider: Option<&str>,
) -> Result<Arc<dyn Oracle>, Box<dyn std::error::Error>> {
    let mut config = config.clone();
    if let Some(name) = provider {
        config.default_provider = canonical_name(name).to_string();
    }

    let name = canonical_name(&config.default_provider).to_string();
    let has_key = config.api_key.is_some()
        || config
            .providers
            .get(&name)
            .is_some_and(|p| p.api_key.is_some());

    // Check for API key early and give a clear error
    if !has_key && !KEYLESS_PROVIDERS.contains(&name.as_str()) {
        eprintln!();
        eprintln!("  ERROR: No API key configured for '{name}'!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    READAGENT_API_KEY   (generic)");
        eprintln!("    OPENAI_API_KEY      (for OpenAI)");
        eprintln!("    ANTHROPIC_API_KEY   (for Anthropic)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let router = build_from_config(&config);
    let oracle = router.select(None)?;
    debug!(oracle = %oracle.name(), model = %config.model_for(&name), "Oracle selected");
    Ok(oracle)
}
