//! `readagent read`: build a memory from a document's paragraphs.

use readagent_agent::ReadingAgent;
use readagent_memory::{MemoryStore, load_paragraphs_file};
use std::path::Path;

use super::{CmdResult, load_config, select_oracle};

pub async fn run(input: &Path, out: &Path, provider: Option<&str>) -> CmdResult {
    let config = load_config()?;
    let oracle = select_oracle(&config, provider)?;

    let paragraphs = load_paragraphs_file(input)?;
    if paragraphs.is_empty() {
        return Err(format!("No paragraphs found in {}", input.display()).into());
    }

    let agent = ReadingAgent::from_config(oracle, &config);
    eprintln!(
        "  Reading {} paragraphs with {}...",
        paragraphs.len(),
        agent.oracle_name()
    );
    let reading = agent.read_with_report(&paragraphs).await?;

    // Nothing is written unless both stages succeeded.
    let store = MemoryStore::new(out);
    store.save_paragraphs(&paragraphs)?;
    store.save_memory(&reading.memory)?;

    println!();
    println!("  Memory written to {}", store.dir().display());
    println!("  Pages:        {}", reading.memory.len());
    println!(
        "  Compression:  {:.2}% ({}/{} words)",
        reading.compression.rate(),
        reading.compression.gist_words,
        reading.compression.page_words
    );
    println!(
        "  Oracle usage: {} calls, {} tokens",
        reading.usage.calls, reading.usage.tokens
    );
    println!();
    println!("  Ask about it with: readagent ask --memory {}", store.dir().display());

    Ok(())
}
