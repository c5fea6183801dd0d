//! End-to-end integration tests for ReadAgent.
//!
//! These tests run the full pipeline a user drives from the command line:
//! load paragraphs, read them into a memory, persist it, edit it through the
//! interchange text, load it back, and ask questions against it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use readagent_agent::{ReadingAgent, parse_lookup};
use readagent_config::{AppConfig, PaginationConfig};
use readagent_core::error::{Error, OracleError, PaginationError};
use readagent_core::memory::Page;
use readagent_core::oracle::{Completion, Oracle};
use readagent_memory::{
    MemoryStore, load_paragraphs_file, parse_gists, parse_pages, render_gists, render_pages,
};
use readagent_providers::{RetryPolicy, RetryingOracle};

// ── Mock Oracle ──────────────────────────────────────────────────────────

/// A mock oracle that recognizes each prompt kind and answers it.
///
/// Pagination prompts get the scripted break points in order, then a label
/// far outside any window. Gist prompts get a summary naming the page's first
/// word. Lookups get the scripted page list and answers a fixed text.
struct DocumentOracle {
    break_points: Mutex<Vec<String>>,
    lookup: String,
    prompts: Mutex<Vec<String>>,
}

impl DocumentOracle {
    fn new(break_points: Vec<&str>, lookup: &str) -> Self {
        Self {
            break_points: Mutex::new(break_points.into_iter().rev().map(String::from).collect()),
            lookup: lookup.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts_containing(&self, needle: &str) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.contains(needle))
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl Oracle for DocumentOracle {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn query_model(&self, prompt: &str) -> Result<Completion, OracleError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let text = if prompt.contains("natural to break reading") {
            self.break_points
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| "Break point: <9999>".to_string())
        } else if prompt.contains("Please shorten") {
            let passage = prompt.rsplit("Passage:\n").next().unwrap_or_default();
            let first = passage.split_whitespace().next().unwrap_or_default();
            format!("Summary starting at {first}.\n\n\nMore detail.")
        } else if prompt.contains("read again") {
            self.lookup.clone()
        } else {
            "The storm delayed the ferry.".to_string()
        };

        Ok(Completion::new(20, text))
    }
}

/// Fails with a rate limit a fixed number of times before delegating.
struct RateLimitedAtFirst {
    inner: DocumentOracle,
    failures_left: Mutex<u32>,
}

#[async_trait::async_trait]
impl Oracle for RateLimitedAtFirst {
    fn name(&self) -> &str {
        "rate_limited"
    }

    async fn query_model(&self, prompt: &str) -> Result<Completion, OracleError> {
        {
            let mut left = self.failures_left.lock().unwrap();
            if *left > 0 {
                *left -= 1;
                return Err(OracleError::RateLimited { retry_after_secs: 1 });
            }
        }
        self.inner.query_model(prompt).await
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────

/// Fourteen paragraphs of 80 words; every word carries its paragraph tag.
fn document() -> Vec<String> {
    (0..14)
        .map(|n| {
            (0..80)
                .map(|w| format!("para{n}word{w}"))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn assert_partition(pages: &[Page], total: usize) {
    let mut next = 0;
    for page in pages {
        assert_eq!(page.start, next, "pages must be contiguous");
        assert!(!page.paragraphs.is_empty(), "pages must not be empty");
        next = page.end();
    }
    assert_eq!(next, total, "pages must cover the document");
}

// ── Tests ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn read_store_reload_and_ask() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("paper.txt");
    std::fs::write(&input, document().join("\n\n")).unwrap();

    let paragraphs = load_paragraphs_file(&input).unwrap();
    assert_eq!(paragraphs, document());

    let oracle = Arc::new(DocumentOracle::new(
        vec!["Break point: <5>\n Because a new scene starts.", "Break point: <9>"],
        "I want to look up Page [1, 7] to check the ferry.",
    ));
    let agent = ReadingAgent::from_config(oracle.clone(), &AppConfig::default());

    let reading = agent.read_with_report(&paragraphs).await.unwrap();
    let ranges: Vec<_> = reading.memory.pages().iter().map(Page::range).collect();
    // Windows hold 8 paragraphs (640 words); the third run of the loop
    // reaches the end with 5 paragraphs (400 words) and an invalid answer.
    assert_eq!(ranges, vec![0..5, 5..9, 9..14]);
    assert_partition(reading.memory.pages(), paragraphs.len());
    assert_eq!(reading.memory.gists()[1], "Summary starting at para5word0.\nMore detail.");

    let store = MemoryStore::new(dir.path().join("memory"));
    store.save_paragraphs(&paragraphs).unwrap();
    store.save_memory(&reading.memory).unwrap();

    let reloaded = MemoryStore::new(dir.path().join("memory")).load_memory().unwrap();
    assert_eq!(reloaded, reading.memory);

    let answer = agent.ask(&reloaded, "Why was the ferry late?").await.unwrap();
    assert_eq!(answer.text, "The storm delayed the ferry.");
    // Page 7 does not exist in a three-page memory.
    assert_eq!(answer.lookup.page_ids, vec![1]);
    assert_eq!(answer.lookup.dropped, vec!["7"]);

    let answer_prompts = oracle.prompts_containing("answer a question");
    assert_eq!(answer_prompts.len(), 1);
    assert!(answer_prompts[0].contains("para5word0"));
    // Page 0 stays a gist: only its first word appears in the summary.
    assert!(!answer_prompts[0].contains("para0word1"));
}

#[tokio::test]
async fn edited_interchange_text_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let oracle = Arc::new(DocumentOracle::new(vec![], "none"));
    let agent = ReadingAgent::new(oracle);
    let memory = agent.read(&document()).await.unwrap();

    let store = MemoryStore::new(dir.path());
    store.save_memory(&memory).unwrap();

    // The user edits gist 0 in the text form and imports it back.
    let gists_text = render_gists(&store.load_gists().unwrap());
    let edited = gists_text.replacen("Summary starting at para0word0.", "Opening: it's stormy.", 1);
    let gists = parse_gists(&edited).unwrap();
    store.save_gists(&gists).unwrap();

    let pages_text = render_pages(&store.load_pages().unwrap());
    assert_eq!(parse_pages(&pages_text).unwrap(), store.load_pages().unwrap());

    let reloaded = store.load_memory().unwrap();
    assert_eq!(reloaded.gists()[0], "Opening: it's stormy.\nMore detail.");
    assert_eq!(reloaded.pages(), memory.pages());
}

#[tokio::test]
async fn single_paragraph_windows() {
    let oracle = Arc::new(DocumentOracle::new(vec![], "none"));
    let agent = ReadingAgent::new(oracle).with_pagination(PaginationConfig {
        word_limit: 1,
        start_threshold: 1,
        ..PaginationConfig::default()
    });

    let paragraphs: Vec<String> = ["P0", "P1", "P2", "P3"].iter().map(|s| s.to_string()).collect();
    let memory = agent.read(&paragraphs).await.unwrap();
    let pages: Vec<Vec<String>> = memory.pages().iter().map(|p| p.paragraphs.clone()).collect();
    assert_eq!(pages, vec![vec!["P0"], vec!["P1"], vec!["P2"], vec!["P3"]]);
    assert_eq!(memory.gists().len(), 4);
}

#[tokio::test]
async fn disabled_fallback_aborts_without_memory() {
    let oracle = Arc::new(DocumentOracle::new(vec!["I would rather not say."], "none"));
    let agent = ReadingAgent::new(oracle).with_pagination(PaginationConfig {
        allow_fallback_to_last: false,
        ..PaginationConfig::default()
    });

    let err = agent.read(&document()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Pagination(PaginationError::InvalidBreakPoint { start: 0, end: 8, .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn retries_are_invisible_to_the_agent() {
    let flaky = Arc::new(RateLimitedAtFirst {
        inner: DocumentOracle::new(vec![], "Page [0]"),
        failures_left: Mutex::new(2),
    });
    let policy = RetryPolicy {
        max_attempts: 3,
        initial_delay: Duration::from_millis(100),
        multiplier: 2.0,
        max_delay: Duration::from_secs(2),
        timeout: Duration::from_secs(30),
    };
    let oracle = Arc::new(RetryingOracle::new(flaky, policy));
    let agent = ReadingAgent::new(oracle);

    let memory = agent.read(&document()).await.unwrap();
    assert_partition(memory.pages(), 14);

    let answer = agent.ask(&memory, "Q?").await.unwrap();
    assert_eq!(answer.lookup.page_ids, vec![0]);
}

#[test]
fn lookup_parsing_matches_documented_examples() {
    assert_eq!(parse_lookup("I want [7, 12]", 20).page_ids, vec![7, 12]);
    assert_eq!(parse_lookup("I want [7, 99]", 20).page_ids, vec![7]);
    assert!(parse_lookup("I want nothing", 20).page_ids.is_empty());
}
