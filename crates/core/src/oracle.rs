//! Oracle trait: the abstraction over text-generation backends.
//!
//! An oracle takes a single prompt and returns the generated text together
//! with the number of tokens the call consumed. The memory algorithm never
//! knows which backend sits behind it.
//!
//! Implementations: OpenAI-compatible, Anthropic, retry wrappers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::OracleError;

/// The result of a single oracle call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    /// Tokens billed for this call (prompt + completion)
    pub tokens_used: u64,

    /// The raw generated text
    pub text: String,
}

impl Completion {
    pub fn new(tokens_used: u64, text: impl Into<String>) -> Self {
        Self {
            tokens_used,
            text: text.into(),
        }
    }
}

/// Token accounting accumulated across the oracle calls of one operation.
///
/// Purely informational; usage is reported, never enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub calls: u32,
    pub tokens: u64,
}

impl TokenUsage {
    /// Record one completed call.
    pub fn record(&mut self, completion: &Completion) {
        self.calls += 1;
        self.tokens += completion.tokens_used;
    }

    /// Combine two usage reports.
    pub fn merge(self, other: TokenUsage) -> TokenUsage {
        TokenUsage {
            calls: self.calls + other.calls,
            tokens: self.tokens + other.tokens,
        }
    }
}

/// The core Oracle trait.
///
/// Every backend implements this trait. Pagination, gisting, and lookup call
/// `query_model()` without knowing which service answers. Failures are
/// returned unchanged to the caller; retry policy belongs to the backend.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// A human-readable name for this oracle (e.g., "openai", "anthropic").
    fn name(&self) -> &str;

    /// Send a prompt and get the generated text and token usage back.
    async fn query_model(&self, prompt: &str) -> std::result::Result<Completion, OracleError>;
}
