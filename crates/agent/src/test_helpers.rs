//! Shared test helpers: oracles with scripted or computed responses.

use async_trait::async_trait;
use readagent_core::error::OracleError;
use readagent_core::oracle::{Completion, Oracle};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Tokens reported for every mock completion.
pub const MOCK_TOKENS: u64 = 15;

/// A mock oracle that returns a sequence of scripted results.
///
/// Each call to `query_model` returns the next result in the queue.
/// Panics if more calls are made than results provided.
pub struct ScriptedOracle {
    responses: Mutex<VecDeque<Result<String, OracleError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    pub fn new(responses: Vec<&str>) -> Self {
        Self::with_results(responses.into_iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn with_results(results: Vec<Result<String, OracleError>>) -> Self {
        Self {
            responses: Mutex::new(results.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every prompt received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn query_model(&self, prompt: &str) -> Result<Completion, OracleError> {
        let mut prompts = self.prompts.lock().unwrap();
        prompts.push(prompt.to_string());

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(result) => result.map(|text| Completion::new(MOCK_TOKENS, text)),
            None => panic!(
                "ScriptedOracle: no more responses (call #{})",
                prompts.len()
            ),
        }
    }
}

/// A mock oracle that computes each response from the prompt.
pub struct FnOracle<F> {
    respond: F,
    prompts: Mutex<Vec<String>>,
}

impl<F> FnOracle<F>
where
    F: Fn(&str) -> String + Send + Sync,
{
    pub fn new(respond: F) -> Self {
        Self {
            respond,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl<F> Oracle for FnOracle<F>
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn name(&self) -> &str {
        "fn_mock"
    }

    async fn query_model(&self, prompt: &str) -> Result<Completion, OracleError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(Completion::new(MOCK_TOKENS, (self.respond)(prompt)))
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// A paragraph of `words` distinct words, tagged so tests can spot it in prompts.
pub fn paragraph(tag: &str, words: usize) -> String {
    (0..words)
        .map(|n| format!("{tag}w{n}"))
        .collect::<Vec<_>>()
        .join(" ")
}
