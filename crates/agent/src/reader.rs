//! The reading agent: one oracle driving all three stages.
//!
//! `read` turns paragraphs into a memory (pagination, then gisting) and
//! `ask` answers questions against it. Nothing is committed on failure: an
//! error from any stage discards that stage's partial output.

use readagent_config::{AppConfig, PaginationConfig};
use readagent_core::error::Result;
use readagent_core::memory::Memory;
use readagent_core::oracle::{Oracle, TokenUsage};
use std::sync::Arc;
use tracing::info;

use crate::gisting::{CompressionStats, Gister};
use crate::lookup::{Answer, Retriever};
use crate::pagination::Paginator;

/// A memory together with what it cost to build.
#[derive(Debug, Clone)]
pub struct Reading {
    pub memory: Memory,
    pub usage: TokenUsage,
    pub compression: CompressionStats,
}

pub struct ReadingAgent {
    oracle: Arc<dyn Oracle>,
    pagination: PaginationConfig,
    gist_concurrency: usize,
}

impl ReadingAgent {
    /// Create an agent with default stage settings.
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self {
            oracle,
            pagination: PaginationConfig::default(),
            gist_concurrency: 1,
        }
    }

    /// Create an agent with the stage settings of a loaded configuration.
    pub fn from_config(oracle: Arc<dyn Oracle>, config: &AppConfig) -> Self {
        Self::new(oracle)
            .with_pagination(config.pagination.clone())
            .with_gist_concurrency(config.gisting.concurrency)
    }

    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn with_gist_concurrency(mut self, concurrency: usize) -> Self {
        self.gist_concurrency = concurrency.max(1);
        self
    }

    pub fn oracle_name(&self) -> &str {
        self.oracle.name()
    }

    /// Paginate and gist a document.
    pub async fn read(&self, paragraphs: &[String]) -> Result<Memory> {
        Ok(self.read_with_report(paragraphs).await?.memory)
    }

    /// Like [`read`](Self::read), also reporting usage and compression.
    pub async fn read_with_report(&self, paragraphs: &[String]) -> Result<Reading> {
        info!(oracle = %self.oracle.name(), paragraphs = paragraphs.len(), "Reading document");

        let pagination = Paginator::new(Arc::clone(&self.oracle), self.pagination.clone())
            .paginate(paragraphs)
            .await?;
        let gisting = Gister::new(Arc::clone(&self.oracle))
            .with_concurrency(self.gist_concurrency)
            .gist(&pagination.pages)
            .await?;

        let usage = pagination.usage.merge(gisting.usage);
        let memory = Memory::new(pagination.pages, gisting.gists)?;
        info!(pages = memory.len(), calls = usage.calls, tokens = usage.tokens, "Memory built");

        Ok(Reading {
            memory,
            usage,
            compression: gisting.compression,
        })
    }

    /// Answer a question against a memory.
    pub async fn ask(&self, memory: &Memory, question: &str) -> Result<Answer> {
        Retriever::new(Arc::clone(&self.oracle))
            .answer(memory.gists(), memory.pages(), question)
            .await
    }
}
