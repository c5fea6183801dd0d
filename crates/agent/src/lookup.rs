//! Lookup: answer a question from gists, re-reading selected pages first.
//!
//! 1. The oracle sees all gists and the question and names the pages it
//!    wants to read again, as a bracketed list such as `[7, 12]`.
//! 2. Those pages replace their gists in a per-question copy of the memory.
//! 3. The oracle answers from that expanded context.
//!
//! A lookup answer without a usable list is not an error: the question is
//! answered from the gists alone.

use readagent_core::error::{MemoryError, Result};
use readagent_core::memory::Page;
use readagent_core::oracle::{Oracle, TokenUsage};
use std::sync::Arc;
use tracing::{debug, info};

use crate::prompts;

/// The pages an oracle asked to re-read, after validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupDecision {
    /// Accepted page indices in the order given; duplicates are kept
    pub page_ids: Vec<usize>,

    /// Tokens from the list that were not valid page indices
    pub dropped: Vec<String>,
}

impl LookupDecision {
    pub fn is_empty(&self) -> bool {
        self.page_ids.is_empty()
    }
}

/// The final answer to one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub lookup: LookupDecision,
    pub usage: TokenUsage,
}

/// Parse the page list out of a lookup response.
///
/// Only the text between the first `[` and the first `]` is read, and only
/// when the `[` comes first. Each comma-separated token must be an unsigned
/// integer below `num_pages`; any other token is dropped.
pub fn parse_lookup(response: &str, num_pages: usize) -> LookupDecision {
    let mut decision = LookupDecision::default();

    let start = response.find('[').unwrap_or(response.len());
    let end = response.find(']').unwrap_or(0);
    if start >= end {
        return decision;
    }

    for token in response[start + 1..end].split(',').map(str::trim) {
        let is_number = !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit());
        match token.parse::<usize>() {
            Ok(page_id) if is_number && page_id < num_pages => decision.page_ids.push(page_id),
            _ if token.is_empty() => {}
            _ => {
                info!(token, num_pages, "Skipping invalid page number");
                decision.dropped.push(token.to_string());
            }
        }
    }

    decision
}

/// Copy the gists, replacing each selected entry with its full page text.
///
/// Never touches the memory itself. With no selection the copy equals the
/// gists.
pub fn expand_context(gists: &[String], pages: &[Page], decision: &LookupDecision) -> Vec<String> {
    let mut expanded = gists.to_vec();
    for &page_id in &decision.page_ids {
        if let (Some(slot), Some(page)) = (expanded.get_mut(page_id), pages.get(page_id)) {
            *slot = page.text();
        }
    }
    expanded
}

/// Answers questions against a memory with at most one round of lookup.
pub struct Retriever {
    oracle: Arc<dyn Oracle>,
}

impl Retriever {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    /// Two oracle calls: one lookup, one answer. Oracle failures propagate.
    pub async fn answer(&self, gists: &[String], pages: &[Page], question: &str) -> Result<Answer> {
        if gists.len() != pages.len() {
            return Err(MemoryError::Mismatch {
                pages: pages.len(),
                gists: gists.len(),
            }
            .into());
        }

        let mut usage = TokenUsage::default();

        let lookup_prompt = prompts::lookup_prompt(&gists.join("\n"), question);
        let completion = self.oracle.query_model(&lookup_prompt).await?;
        usage.record(&completion);
        let lookup = parse_lookup(completion.text.trim(), pages.len());
        info!(pages = ?lookup.page_ids, dropped = lookup.dropped.len(), "Model chose pages to look up");

        let context = expand_context(gists, pages, &lookup).join("\n");
        debug!(context_len = context.len(), "Expanded context built");

        let answer_prompt = prompts::answer_prompt(&context, question);
        let completion = self.oracle.query_model(&answer_prompt).await?;
        usage.record(&completion);

        info!(calls = usage.calls, tokens = usage.tokens, "Lookup complete");
        Ok(Answer {
            text: completion.text.trim().to_string(),
            lookup,
            usage,
        })
    }
}
