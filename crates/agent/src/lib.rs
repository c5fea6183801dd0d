//! The reading agent: episodic memory for documents longer than a context
//! window.
//!
//! Three stages, each driven by the same oracle:
//!
//! 1. **Pagination** splits the paragraphs into pages at natural breaks
//! 2. **Gisting** compresses every page into a short gist
//! 3. **Lookup** answers a question from the gists, first swapping the
//!    pages the oracle wants to re-read back in
//!
//! Oracle responses are untrusted. Malformed break points and page lists are
//! recovered from locally; only oracle failures (and pagination with
//! fallback disabled) abort an operation.

pub mod gisting;
pub mod lookup;
pub mod pagination;
pub mod prompts;
pub mod reader;

#[cfg(test)]
mod test_helpers;

pub use gisting::{CompressionStats, Gister, Gisting};
pub use lookup::{Answer, LookupDecision, Retriever, expand_context, parse_lookup};
pub use pagination::{Pagination, Paginator, Window};
pub use reader::{Reading, ReadingAgent};
