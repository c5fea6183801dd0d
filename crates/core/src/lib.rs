//! # ReadAgent Core
//!
//! Domain types, traits, and error definitions for the ReadAgent episodic
//! document memory. This crate performs no I/O: it defines the
//! vocabulary (pages, gists, memories, the oracle capability) that every
//! other crate implements against.
//!
//! ## Design Philosophy
//!
//! The only external capability the memory algorithm needs is a text
//! generation oracle. It is defined as a trait here; concrete backends live
//! in `readagent-providers`. This enables:
//! - Swapping backends via configuration
//! - Easy testing with scripted oracles
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod memory;
pub mod oracle;
pub mod text;

// Re-export key types at crate root for ergonomics
pub use error::{Error, MemoryError, OracleError, PaginationError, Result};
pub use memory::{Memory, Page};
pub use oracle::{Completion, Oracle, TokenUsage};
pub use text::{collapse_blank_lines, count_words};
