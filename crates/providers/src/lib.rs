//! Oracle backends for ReadAgent.
//!
//! All backends implement the `readagent_core::Oracle` trait.
//! The router selects the correct backend based on configuration and wraps
//! it in the retry policy.

pub mod anthropic;
pub mod openai_compat;
pub mod retry;
pub mod router;

#[cfg(test)]
mod test_support;

pub use anthropic::AnthropicOracle;
pub use openai_compat::OpenAiCompatOracle;
pub use retry::{RetryPolicy, RetryingOracle};
pub use router::{OracleRouter, build_from_config};
