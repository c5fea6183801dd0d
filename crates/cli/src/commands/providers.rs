//! `readagent providers`: list supported oracle backends.

use readagent_providers::build_from_config;

use super::{CmdResult, load_config};

pub fn run() -> CmdResult {
    println!("Supported Oracle Backends");
    println!("=========================");
    println!();
    println!("  Built-in backends:");
    println!("  ┌────────────┬──────────────────────────────────────────────────┬──────────────┐");
    println!("  │ Provider   │ Base URL                                         │ Auth         │");
    println!("  ├────────────┼──────────────────────────────────────────────────┼──────────────┤");
    println!("  │ openai     │ api.openai.com/v1                                │ API key      │");
    println!("  │ anthropic  │ api.anthropic.com (Messages API)                 │ API key      │");
    println!("  │ gemini     │ generativelanguage.googleapis.com/v1beta/openai  │ API key      │");
    println!("  │ openrouter │ openrouter.ai/api/v1                             │ API key      │");
    println!("  │ ollama     │ localhost:11434/v1                               │ None (local) │");
    println!("  │ deepseek   │ api.deepseek.com/v1                              │ API key      │");
    println!("  │ groq       │ api.groq.com/openai/v1                           │ API key      │");
    println!("  │ together   │ api.together.xyz/v1                              │ API key      │");
    println!("  │ vllm       │ localhost:8000/v1                                │ None (local) │");
    println!("  └────────────┴──────────────────────────────────────────────────┴──────────────┘");
    println!();
    println!("  Aliases: gpt -> openai, claude/haiku -> anthropic");
    println!();
    println!("  Custom endpoints:");
    println!("    Any OpenAI-compatible API works out of the box:");
    println!("    default_provider = \"mine\"");
    println!("    [providers.mine]");
    println!("    api_url = \"https://your-custom-endpoint.com/v1\"");
    println!("    api_key = \"your-key\"");
    println!();
    println!("  Environment variables:");
    println!("    READAGENT_API_KEY, OPENAI_API_KEY, ANTHROPIC_API_KEY");
    println!("    READAGENT_PROVIDER, READAGENT_MODEL");

    if let Ok(config) = load_config() {
        let router = build_from_config(&config);
        println!();
        println!("  Configured: {} (default: {})", router.list().join(", "), router.default_name());
    }

    Ok(())
}
