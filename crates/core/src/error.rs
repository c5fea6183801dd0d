//! Error types for the ReadAgent domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.
//!
//! Malformed or out-of-range oracle responses are *not* errors: the agent
//! recovers from them locally. Only oracle transport failures, disabled
//! pagination fallback, and broken memory interchange data surface here.

use thiserror::Error;

/// The top-level error type for all ReadAgent operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Oracle errors ---
    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    // --- Pagination errors ---
    #[error("Pagination error: {0}")]
    Pagination(#[from] PaginationError),

    // --- Memory errors ---
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures surfaced by an oracle backend. Always fatal to the current
/// operation from the agent's point of view.
#[derive(Debug, Clone, Error)]
pub enum OracleError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Oracle not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl OracleError {
    /// Whether a retry policy may reasonably try the same call again.
    pub fn is_transient(&self) -> bool {
        match self {
            OracleError::RateLimited { .. } | OracleError::Timeout(_) | OracleError::Network(_) => {
                true
            }
            OracleError::ApiError { status_code, .. } => *status_code >= 500,
            OracleError::AuthenticationFailed(_) | OracleError::NotConfigured(_) => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum PaginationError {
    #[error(
        "No valid break point for paragraphs {start}..{end} and fallback is disabled; response: {response}"
    )]
    InvalidBreakPoint {
        start: usize,
        end: usize,
        response: String,
    },
}

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("Malformed entry {entry}: {reason}")]
    Format { entry: usize, reason: String },

    #[error("Memory has {pages} pages but {gists} gists")]
    Mismatch { pages: usize, gists: usize },

    #[error("Storage error: {0}")]
    Storage(String),
}
