//! Memory domain types: pages, their gists, and the memory pairing them.
//!
//! A document is an ordered sequence of paragraphs. Pagination groups them
//! into contiguous, non-overlapping pages that cover the document exactly
//! once; gisting attaches one short summary to each page. The pair is the
//! unit persisted and handed to lookup.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::error::MemoryError;
use crate::text::count_words;

/// A contiguous run of paragraphs `[start, start + paragraphs.len())`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Index of the first paragraph in the source document
    pub start: usize,

    /// The paragraphs of this page, in document order
    pub paragraphs: Vec<String>,
}

impl Page {
    pub fn new(start: usize, paragraphs: Vec<String>) -> Self {
        Self { start, paragraphs }
    }

    /// Exclusive end index in the source document.
    pub fn end(&self) -> usize {
        self.start + self.paragraphs.len()
    }

    /// The paragraph index range this page covers.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Full page text: paragraphs joined by newlines.
    pub fn text(&self) -> String {
        self.paragraphs.join("\n")
    }

    pub fn word_count(&self) -> usize {
        self.paragraphs.iter().map(|p| count_words(p)).sum()
    }

    /// Rebuild pages from bare paragraph lists, assigning consecutive ranges.
    pub fn sequence(pages: Vec<Vec<String>>) -> Vec<Page> {
        let mut start = 0;
        pages
            .into_iter()
            .map(|paragraphs| {
                let page = Page::new(start, paragraphs);
                start = page.end();
                page
            })
            .collect()
    }

    /// Strip ranges, leaving the bare paragraph lists.
    pub fn paragraph_lists(pages: &[Page]) -> Vec<Vec<String>> {
        pages.iter().map(|p| p.paragraphs.clone()).collect()
    }
}

/// The episodic memory of one document: pages and their gists, index-aligned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    pages: Vec<Page>,
    gists: Vec<String>,
}

impl Memory {
    /// Pair pages with gists. Both sequences must have the same length.
    pub fn new(pages: Vec<Page>, gists: Vec<String>) -> Result<Self, MemoryError> {
        if pages.len() != gists.len() {
            return Err(MemoryError::Mismatch {
                pages: pages.len(),
                gists: gists.len(),
            });
        }
        Ok(Self { pages, gists })
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn gists(&self) -> &[String] {
        &self.gists
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
