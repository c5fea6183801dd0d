//! `readagent show`: print part of a memory as interchange text.

use clap::ValueEnum;
use readagent_core::error::MemoryError;
use readagent_memory::{MemoryStore, join_paragraphs, render_gists, render_pages};
use std::path::Path;

use super::CmdResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShowTarget {
    Gists,
    Pages,
    Paragraphs,
}

pub fn run(memory_dir: &Path, what: ShowTarget) -> CmdResult {
    let store = MemoryStore::new(memory_dir);
    println!("{}", render(&store, what)?);
    Ok(())
}

/// Render one part of a stored memory.
pub fn render(store: &MemoryStore, what: ShowTarget) -> Result<String, MemoryError> {
    Ok(match what {
        ShowTarget::Gists => render_gists(&store.load_gists()?),
        ShowTarget::Pages => render_pages(&store.load_pages()?),
        ShowTarget::Paragraphs => join_paragraphs(&store.load_paragraphs()?),
    })
}
