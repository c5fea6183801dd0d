//! `readagent import`: write edited interchange text back into a memory.

use readagent_core::error::MemoryError;
use readagent_memory::{MemoryStore, parse_gists, parse_pages, split_paragraphs};
use std::path::Path;

use super::CmdResult;

pub fn run(
    memory_dir: &Path,
    gists: Option<&Path>,
    pages: Option<&Path>,
    paragraphs: Option<&Path>,
) -> CmdResult {
    if gists.is_none() && pages.is_none() && paragraphs.is_none() {
        return Err("Nothing to import: pass --gists, --pages, or --paragraphs".into());
    }

    let store = MemoryStore::new(memory_dir);
    let imported = import(
        &store,
        gists.map(read_text).transpose()?.as_deref(),
        pages.map(read_text).transpose()?.as_deref(),
        paragraphs.map(read_text).transpose()?.as_deref(),
    )?;

    println!("  Imported into {}:", store.dir().display());
    for line in imported {
        println!("    {line}");
    }
    Ok(())
}

fn read_text(path: &Path) -> Result<String, MemoryError> {
    std::fs::read_to_string(path)
        .map_err(|e| MemoryError::Storage(format!("Failed to read {}: {e}", path.display())))
}

/// Parse every given text before writing any of them.
///
/// When the gists and pages that end up on disk disagree in length, nothing
/// is written.
pub fn import(
    store: &MemoryStore,
    gists: Option<&str>,
    pages: Option<&str>,
    paragraphs: Option<&str>,
) -> Result<Vec<String>, MemoryError> {
    let gists = gists.map(parse_gists).transpose()?;
    let pages = pages.map(parse_pages).transpose()?;
    let paragraphs = paragraphs.map(split_paragraphs);

    let gist_count = match &gists {
        Some(g) => Some(g.len()),
        None if store.has_memory() => Some(store.load_gists()?.len()),
        None => None,
    };
    let page_count = match &pages {
        Some(p) => Some(p.len()),
        None if store.has_memory() => Some(store.load_pages()?.len()),
        None => None,
    };
    if let (Some(gists), Some(pages)) = (gist_count, page_count) {
        if gists != pages {
            return Err(MemoryError::Mismatch { pages, gists });
        }
    }

    let mut imported = Vec::new();
    if let Some(gists) = gists {
        store.save_gists(&gists)?;
        imported.push(format!("{} gists", gists.len()));
    }
    if let Some(pages) = pages {
        store.save_pages(&pages)?;
        imported.push(format!("{} pages", pages.len()));
    }
    if let Some(paragraphs) = paragraphs {
        store.save_paragraphs(&paragraphs)?;
        imported.push(format!("{} paragraphs", paragraphs.len()));
    }
    Ok(imported)
}
