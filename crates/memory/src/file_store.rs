//! File-based memory store: one directory per document.
//!
//! ```text
//! <dir>/paragraphs.json   {"paragraphs": ["...", ...]}
//! <dir>/pages.json        {"pages": [["...", ...], ...]}
//! <dir>/gists.json        {"gists": ["...", ...]}
//! ```
//!
//! The files are plain JSON so they can be inspected and edited by hand,
//! then loaded back. Loading a memory checks that pages and gists line up.

use readagent_core::error::MemoryError;
use readagent_core::memory::{Memory, Page};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::codec::split_paragraphs;

pub const PARAGRAPHS_FILE: &str = "paragraphs.json";
pub const PAGES_FILE: &str = "pages.json";
pub const GISTS_FILE: &str = "gists.json";

#[derive(Debug, Serialize, Deserialize)]
struct ParagraphsFile {
    paragraphs: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PagesFile {
    pages: Vec<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GistsFile {
    gists: Vec<String>,
}

/// A directory holding the paragraphs, pages, and gists of one document.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    dir: PathBuf,
}

impl MemoryStore {
    /// Open a store rooted at `dir`. Nothing is touched until the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether both halves of a memory exist on disk.
    pub fn has_memory(&self) -> bool {
        self.dir.join(PAGES_FILE).exists() && self.dir.join(GISTS_FILE).exists()
    }

    pub fn save_paragraphs(&self, paragraphs: &[String]) -> Result<(), MemoryError> {
        self.write_json(
            PARAGRAPHS_FILE,
            &ParagraphsFile {
                paragraphs: paragraphs.to_vec(),
            },
        )
    }

    pub fn load_paragraphs(&self) -> Result<Vec<String>, MemoryError> {
        Ok(self.read_json::<ParagraphsFile>(PARAGRAPHS_FILE)?.paragraphs)
    }

    pub fn save_pages(&self, pages: &[Vec<String>]) -> Result<(), MemoryError> {
        self.write_json(
            PAGES_FILE,
            &PagesFile {
                pages: pages.to_vec(),
            },
        )
    }

    pub fn load_pages(&self) -> Result<Vec<Vec<String>>, MemoryError> {
        Ok(self.read_json::<PagesFile>(PAGES_FILE)?.pages)
    }

    pub fn save_gists(&self, gists: &[String]) -> Result<(), MemoryError> {
        self.write_json(
            GISTS_FILE,
            &GistsFile {
                gists: gists.to_vec(),
            },
        )
    }

    pub fn load_gists(&self) -> Result<Vec<String>, MemoryError> {
        Ok(self.read_json::<GistsFile>(GISTS_FILE)?.gists)
    }

    /// Persist pages and gists.
    pub fn save_memory(&self, memory: &Memory) -> Result<(), MemoryError> {
        self.save_pages(&Page::paragraph_lists(memory.pages()))?;
        self.save_gists(memory.gists())?;
        debug!(dir = %self.dir.display(), pages = memory.len(), "Memory saved");
        Ok(())
    }

    /// Load pages and gists, rejecting a pair whose lengths differ.
    pub fn load_memory(&self) -> Result<Memory, MemoryError> {
        let pages = Page::sequence(self.load_pages()?);
        let gists = self.load_gists()?;
        Memory::new(pages, gists)
    }

    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<(), MemoryError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            MemoryError::Storage(format!("Failed to create {}: {e}", self.dir.display()))
        })?;

        let path = self.dir.join(file);
        let content = serde_json::to_string_pretty(value)
            .map_err(|e| MemoryError::Storage(format!("Failed to serialize {file}: {e}")))?;
        std::fs::write(&path, content)
            .map_err(|e| MemoryError::Storage(format!("Failed to write {}: {e}", path.display())))
    }

    fn read_json<T: DeserializeOwned>(&self, file: &str) -> Result<T, MemoryError> {
        read_json_file(&self.dir.join(file))
    }
}

/// Load paragraphs from a file: `{"paragraphs": [...]}` JSON when the
/// extension is `.json`, otherwise plain text split on blank lines.
pub fn load_paragraphs_file(path: &Path) -> Result<Vec<String>, MemoryError> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        return Ok(read_json_file::<ParagraphsFile>(path)?.paragraphs);
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| MemoryError::Storage(format!("Failed to read {}: {e}", path.display())))?;
    let paragraphs: Vec<String> = split_paragraphs(raw.trim_end_matches('\n'))
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect();
    debug!(path = %path.display(), count = paragraphs.len(), "Paragraphs loaded from text");
    Ok(paragraphs)
}

fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, MemoryError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| MemoryError::Storage(format!("Failed to read {}: {e}", path.display())))?;
    serde_json::from_str(&content)
        .map_err(|e| MemoryError::Storage(format!("Failed to parse {}: {e}", path.display())))
}
