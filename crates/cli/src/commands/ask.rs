//! `readagent ask`: answer questions against a stored memory.

use readagent_agent::ReadingAgent;
use readagent_core::memory::Memory;
use readagent_memory::MemoryStore;
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{CmdResult, load_config, select_oracle};

pub async fn run(memory_dir: &Path, message: Option<String>, provider: Option<&str>) -> CmdResult {
    let config = load_config()?;
    let store = MemoryStore::new(memory_dir);
    if !store.has_memory() {
        return Err(format!(
            "No memory in {} (run `readagent read` first)",
            memory_dir.display()
        )
        .into());
    }
    let memory = store.load_memory()?;
    let oracle = select_oracle(&config, provider)?;
    let agent = ReadingAgent::from_config(oracle, &config);

    if let Some(question) = message {
        // Single question mode
        eprint!("  Thinking...");
        let answer = agent.ask(&memory, &question).await?;
        eprint!("\r              \r");
        println!("{}", answer.text);
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  ReadAgent: Interactive Mode");
    println!();
    println!("  Memory:    {} ({} pages)", memory_dir.display(), memory.len());
    println!("  Oracle:    {}", agent.oracle_name());
    println!();
    println!("  Type your question and press Enter.");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if matches!(question, "exit" | "quit") {
            break;
        }

        answer_interactively(&agent, &memory, question).await;
    }

    println!();
    println!("  Goodbye!");
    Ok(())
}

async fn answer_interactively(agent: &ReadingAgent, memory: &Memory, question: &str) {
    eprint!("  ...");
    match agent.ask(memory, question).await {
        Ok(answer) => {
            eprint!("\r     \r");
            println!();
            if !answer.lookup.is_empty() {
                println!("  (re-read pages {:?})", answer.lookup.page_ids);
            }
            for line in answer.text.lines() {
                println!("  ReadAgent > {line}");
            }
            println!();
        }
        Err(e) => {
            eprint!("\r     \r");
            eprintln!("  [Error] {e}");
            println!();
        }
    }
}
