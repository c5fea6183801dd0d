//! `readagent config`: configuration management commands.

use readagent_config::AppConfig;
use readagent_providers::router::{KNOWN_PROVIDERS, canonical_name};

use super::CmdResult;

pub fn validate() -> CmdResult {
    println!("Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   OK  Config parsed successfully");

            let warnings = warnings(&config);
            if warnings.is_empty() {
                println!("   OK  All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   WARN  {w}");
                }
            }

            println!();
            println!("   Provider:    {}", config.default_provider);
            println!("   Model:       {}", config.model_for(&config.default_provider));
            println!(
                "   Pagination:  word_limit={}, start_threshold={}, fallback={}",
                config.pagination.word_limit,
                config.pagination.start_threshold,
                config.pagination.allow_fallback_to_last
            );
            println!("   Gisting:     concurrency={}", config.gisting.concurrency);
            println!(
                "   Retry:       {} attempts, {}ms initial delay, {}s timeout",
                config.retry.max_attempts,
                config.retry.initial_delay_ms,
                config.retry.request_timeout_secs
            );
        }
        Err(e) => {
            println!("   ERROR  Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

/// Problems that do not stop the configuration from loading.
fn warnings(config: &AppConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if !config.has_api_key() {
        warnings.push(
            "No API key set (set READAGENT_API_KEY, OPENAI_API_KEY, or ANTHROPIC_API_KEY)".to_string(),
        );
    }

    let provider = canonical_name(&config.default_provider);
    let has_url = config
        .providers
        .get(&config.default_provider)
        .is_some_and(|p| p.api_url.is_some());
    if !KNOWN_PROVIDERS.contains(&provider) && !has_url {
        warnings.push(format!(
            "Provider '{}' is not built in and has no api_url",
            config.default_provider
        ));
    }

    if config.pagination.start_threshold >= config.pagination.word_limit {
        warnings.push("pagination.start_threshold >= word_limit: windows get a single label".into());
    }

    warnings
}

pub fn show() -> CmdResult {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if config.api_key.is_some() {
        config.api_key = Some("[REDACTED]".into());
    }
    for provider in config.providers.values_mut() {
        if provider.api_key.is_some() {
            provider.api_key = Some("[REDACTED]".into());
        }
    }
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub fn path() -> CmdResult {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}
