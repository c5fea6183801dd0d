//! Gisting: compress every page into a short summary.
//!
//! Pages are independent, so up to `concurrency` oracle calls run at once.
//! Results are buffered in page order: gist `k` always belongs to page `k`.

use futures::stream::{self, StreamExt, TryStreamExt};
use readagent_core::error::Result;
use readagent_core::memory::Page;
use readagent_core::oracle::{Completion, Oracle, TokenUsage};
use readagent_core::text::{collapse_blank_lines, count_words};
use std::sync::Arc;
use tracing::{debug, info};

use crate::prompts;

/// Word counts before and after gisting. Informational only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressionStats {
    pub page_words: usize,
    pub gist_words: usize,
}

impl CompressionStats {
    /// Percentage of words removed, `100 - gist/page * 100`.
    pub fn rate(&self) -> f64 {
        if self.page_words == 0 {
            return 0.0;
        }
        100.0 - (self.gist_words as f64 / self.page_words as f64) * 100.0
    }
}

/// Gists produced for a page sequence, index-aligned with the pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Gisting {
    pub gists: Vec<String>,
    pub usage: TokenUsage,
    pub compression: CompressionStats,
}

pub struct Gister {
    oracle: Arc<dyn Oracle>,
    concurrency: usize,
}

impl Gister {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self {
            oracle,
            concurrency: 1,
        }
    }

    /// Allow up to `concurrency` pages in flight (at least one).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Gist every page. The first oracle failure aborts the whole run.
    pub async fn gist(&self, pages: &[Page]) -> Result<Gisting> {
        let page_words: usize = pages.iter().map(Page::word_count).sum();
        info!(pages = pages.len(), words = page_words, "Gisting document");

        let oracle = &self.oracle;
        let completions: Vec<Completion> = stream::iter(pages)
            .map(|page| {
                let prompt = prompts::gist_prompt(&page.text());
                async move { oracle.query_model(&prompt).await }
            })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let mut usage = TokenUsage::default();
        let mut gists = Vec::with_capacity(completions.len());
        for (index, completion) in completions.iter().enumerate() {
            usage.record(completion);
            let gist = collapse_blank_lines(completion.text.trim());
            debug!(page = index, gist = %gist, "Page gisted");
            gists.push(gist);
        }

        let compression = CompressionStats {
            page_words,
            gist_words: gists.iter().map(|g| count_words(g)).sum(),
        };
        info!(
            rate = %format!("{:.2}%", compression.rate()),
            gist_words = compression.gist_words,
            page_words = compression.page_words,
            calls = usage.calls,
            tokens = usage.tokens,
            "Gisting complete"
        );

        Ok(Gisting {
            gists,
            usage,
            compression,
        })
    }
}
