//! Pagination: split a paragraph sequence into pages at natural breaks.
//!
//! The paginator walks the document with a cursor. At each step it grows a
//! window of paragraphs up to a word limit, labels the candidate break points
//! inside it, and asks the oracle which label reads as a natural pause. The
//! chosen label becomes the end of the next page.
//!
//! Whatever the oracle answers, the emitted pages partition the paragraphs:
//! they are contiguous, ordered, and cover every paragraph exactly once. An
//! unusable answer falls back to taking the whole window, unless fallback is
//! disabled, in which case the run fails without returning any pages.

use readagent_config::PaginationConfig;
use readagent_core::error::{PaginationError, Result};
use readagent_core::memory::Page;
use readagent_core::oracle::{Oracle, TokenUsage};
use readagent_core::text::count_words;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::prompts;

/// Pages produced by one pagination run, with the oracle usage it cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub pages: Vec<Page>,
    pub usage: TokenUsage,
}

/// The greedy window starting at a cursor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// First paragraph of the window (the cursor)
    pub start: usize,

    /// Exclusive end of the window; also the last label offered
    pub end: usize,

    /// Words accumulated while growing the window
    pub words: usize,

    /// Paragraph texts interleaved with `<k>` labels, one entry per line
    pub passage: Vec<String>,
}

impl Window {
    /// Grow a window from `start`.
    ///
    /// Paragraphs are appended while the word count stays below `word_limit`.
    /// Once the count reaches `start_threshold`, each further paragraph is
    /// preceded by its absolute index as a label, and the window always ends
    /// with the label of its exclusive end.
    pub fn build(paragraphs: &[String], start: usize, config: &PaginationConfig) -> Self {
        let mut passage = vec![paragraphs[start].clone()];
        let mut words = count_words(&paragraphs[start]);
        let mut end = start + 1;

        while words < config.word_limit && end < paragraphs.len() {
            words += count_words(&paragraphs[end]);
            if words >= config.start_threshold {
                passage.push(label(end));
            }
            passage.push(paragraphs[end].clone());
            end += 1;
        }
        passage.push(label(end));

        Self {
            start,
            end,
            words,
            passage,
        }
    }

    /// Whether `point` ends a non-empty page inside this window.
    pub fn accepts(&self, point: usize) -> bool {
        self.start < point && point <= self.end
    }
}

fn label(index: usize) -> String {
    format!("<{index}>")
}

/// Splits paragraphs into pages with the help of an oracle.
pub struct Paginator {
    oracle: Arc<dyn Oracle>,
    config: PaginationConfig,
}

impl Paginator {
    pub fn new(oracle: Arc<dyn Oracle>, config: PaginationConfig) -> Self {
        Self { oracle, config }
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Paginate the whole paragraph sequence.
    ///
    /// Oracle calls are strictly sequential: each prompt quotes the page
    /// emitted just before it. Oracle failures abort the run unchanged.
    pub async fn paginate(&self, paragraphs: &[String]) -> Result<Pagination> {
        let mut pages: Vec<Page> = Vec::new();
        let mut usage = TokenUsage::default();
        let mut cursor = 0;

        while cursor < paragraphs.len() {
            let window = Window::build(paragraphs, cursor, &self.config);

            let break_point = if self.is_short_tail(&window, paragraphs.len()) {
                paragraphs.len()
            } else {
                self.choose_break_point(paragraphs, &window, pages.last(), &mut usage)
                    .await?
            };

            let page = Page::new(cursor, paragraphs[cursor..break_point].to_vec());
            debug!(
                page = pages.len(),
                start = cursor,
                end = break_point,
                words = page.word_count(),
                "Page emitted"
            );
            pages.push(page);
            cursor = break_point;
        }

        info!(
            pages = pages.len(),
            paragraphs = paragraphs.len(),
            calls = usage.calls,
            tokens = usage.tokens,
            "Pagination complete"
        );
        Ok(Pagination { pages, usage })
    }

    /// A short window that already reaches the end of the document becomes
    /// the last page without an oracle call.
    fn is_short_tail(&self, window: &Window, total: usize) -> bool {
        window.words < self.config.short_window_words && window.end == total
    }

    async fn choose_break_point(
        &self,
        paragraphs: &[String],
        window: &Window,
        previous: Option<&Page>,
        usage: &mut TokenUsage,
    ) -> Result<usize> {
        let preceding = previous
            .map(|page| format!("...\n{}", page.text()))
            .unwrap_or_default();
        let trailing = paragraphs
            .get(window.end)
            .map(|next| format!("{next}\n..."))
            .unwrap_or_default();

        let prompt = prompts::pagination_prompt(&preceding, &window.passage.join("\n"), &trailing);
        let completion = self.oracle.query_model(&prompt).await?;
        usage.record(&completion);
        let response = completion.text.trim();

        let parsed = prompts::parse_break_point(response);
        match parsed {
            Some(point) if window.accepts(point) => return Ok(point),
            Some(point) => warn!(
                start = window.start,
                end = window.end,
                break_point = point,
                "Break point outside the window"
            ),
            None => warn!(
                start = window.start,
                end = window.end,
                response = %response,
                "No break point in oracle response"
            ),
        }

        if self.config.allow_fallback_to_last {
            debug!(break_point = window.end, "Falling back to the end of the window");
            Ok(window.end)
        } else {
            Err(PaginationError::InvalidBreakPoint {
                start: window.start,
                end: window.end,
                response: response.to_string(),
            }
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{FnOracle, ScriptedOracle, paragraph, strings};
    use readagent_core::error::{Error, OracleError};

    fn config(word_limit: usize, start_threshold: usize) -> PaginationConfig {
        PaginationConfig {
            word_limit,
            start_threshold,
            ..PaginationConfig::default()
        }
    }

    fn assert_partition(pages: &[Page], total: usize) {
        let mut expected_start = 0;
        for page in pages {
            assert!(!page.paragraphs.is_empty(), "empty page at {}", page.start);
            assert_eq!(page.start, expected_start);
            expected_start = page.end();
        }
        assert_eq!(expected_start, total);
    }

    /// Ten paragraphs of 100 words each.
    fn document() -> Vec<String> {
        (0..10).map(|n| paragraph(&format!("p{n}"), 100)).collect()
    }

    #[test]
    fn window_labels_after_threshold() {
        let paragraphs = document();
        let window = Window::build(&paragraphs, 0, &PaginationConfig::default());

        // 100 words per paragraph: the window grows to 600 words.
        assert_eq!(window.end, 6);
        assert_eq!(window.words, 600);
        let labels: Vec<&str> = window
            .passage
            .iter()
            .filter(|line| line.starts_with('<'))
            .map(String::as_str)
            .collect();
        assert_eq!(labels, vec!["<2>", "<3>", "<4>", "<5>", "<6>"]);
        assert_eq!(window.passage.first(), Some(&paragraphs[0]));
        assert_eq!(window.passage.last().map(String::as_str), Some("<6>"));
    }

    #[test]
    fn window_stops_at_end_of_input() {
        let paragraphs = strings(&["one two", "three"]);
        let window = Window::build(&paragraphs, 1, &PaginationConfig::default());
        assert_eq!(window.end, 2);
        assert_eq!(window.words, 1);
        assert_eq!(window.passage, strings(&["three", "<2>"]));
        assert!(window.accepts(2));
        assert!(!window.accepts(1));
        assert!(!window.accepts(3));
    }

    #[tokio::test]
    async fn oracle_chooses_break_points() {
        let oracle = Arc::new(ScriptedOracle::new(vec![
            "Break point: <4>\n Because the scene changes.",
            "Break point: <8>",
        ]));
        let paginator = Paginator::new(oracle.clone(), PaginationConfig::default());

        let result = paginator.paginate(&document()).await.unwrap();
        let ranges: Vec<_> = result.pages.iter().map(Page::range).collect();
        assert_eq!(ranges, vec![0..4, 4..8, 8..10]);
        assert_eq!(result.usage.calls, 2);
        assert_eq!(oracle.call_count(), 2);
        assert_partition(&result.pages, 10);
    }

    #[tokio::test]
    async fn prompts_carry_preceding_and_trailing_context() {
        let paragraphs = document();
        let oracle = Arc::new(ScriptedOracle::new(vec!["Break point: <4>", "Break point: <8>"]));
        let paginator = Paginator::new(oracle.clone(), PaginationConfig::default());
        paginator.paginate(&paragraphs).await.unwrap();

        let prompts = oracle.prompts();
        // First window: no preceding page, trailing paragraph 6.
        assert!(prompts[0].contains(&format!("Passage:\n\n\n{}", paragraphs[0])));
        assert!(prompts[0].contains(&format!("<6>\n{}\n...", paragraphs[6])));
        // Second window quotes the first page after an ellipsis.
        let first_page = paragraphs[0..4].join("\n");
        assert!(prompts[1].contains(&format!("...\n{first_page}\n{}", paragraphs[4])));
    }

    #[tokio::test]
    async fn out_of_range_break_point_falls_back_to_window_end() {
        // <0> would produce an empty page, <50> lies beyond the window.
        let oracle = Arc::new(ScriptedOracle::new(vec!["Break point: <0>", "Break point: <50>"]));
        let paginator = Paginator::new(oracle, PaginationConfig::default());

        let result = paginator.paginate(&document()).await.unwrap();
        let ranges: Vec<_> = result.pages.iter().map(Page::range).collect();
        // Windows: 0..6 (fallback), then 6..10 is 400 words: asks, falls back.
        assert_eq!(ranges, vec![0..6, 6..10]);
    }

    #[tokio::test]
    async fn unparsable_responses_yield_greedy_windows() {
        let paragraphs: Vec<String> = (0..25).map(|n| paragraph(&format!("q{n}"), 70)).collect();
        let oracle = Arc::new(FnOracle::new(|_: &str| "I cannot decide.".to_string()));
        let paginator = Paginator::new(oracle, PaginationConfig::default());

        let result = paginator.paginate(&paragraphs).await.unwrap();
        assert_partition(&result.pages, paragraphs.len());

        for page in &result.pages {
            let window = Window::build(&paragraphs, page.start, paginator.config());
            assert_eq!(page.end(), window.end);
        }
    }

    #[tokio::test]
    async fn fallback_disabled_fails_the_run() {
        let oracle = Arc::new(ScriptedOracle::new(vec!["Break point: <4>", "no idea"]));
        let paginator = Paginator::new(
            oracle,
            PaginationConfig {
                allow_fallback_to_last: false,
                ..PaginationConfig::default()
            },
        );

        match paginator.paginate(&document()).await {
            Err(Error::Pagination(PaginationError::InvalidBreakPoint { start, end, response })) => {
                assert_eq!(start, 4);
                assert_eq!(end, 10);
                assert_eq!(response, "no idea");
            }
            other => panic!("Expected InvalidBreakPoint, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn short_document_needs_no_oracle() {
        let oracle = Arc::new(ScriptedOracle::new(vec![]));
        let paginator = Paginator::new(oracle.clone(), PaginationConfig::default());

        let paragraphs = strings(&["A short note.", "Another line.", "The end."]);
        let result = paginator.paginate(&paragraphs).await.unwrap();
        assert_eq!(result.pages.len(), 1);
        assert_eq!(result.pages[0].paragraphs, paragraphs);
        assert_eq!(result.usage, TokenUsage::default());
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_document_has_no_pages() {
        let oracle = Arc::new(ScriptedOracle::new(vec![]));
        let paginator = Paginator::new(oracle, PaginationConfig::default());
        let result = paginator.paginate(&[]).await.unwrap();
        assert!(result.pages.is_empty());
    }

    #[tokio::test]
    async fn tiny_word_limit_gives_one_page_per_paragraph() {
        let oracle = Arc::new(FnOracle::new(|_: &str| "Break point: nowhere".to_string()));
        let paginator = Paginator::new(oracle.clone(), config(1, 1));

        let paragraphs = strings(&["P0", "P1", "P2", "P3"]);
        let result = paginator.paginate(&paragraphs).await.unwrap();
        let pages: Vec<Vec<String>> = result.pages.iter().map(|p| p.paragraphs.clone()).collect();
        assert_eq!(
            pages,
            vec![strings(&["P0"]), strings(&["P1"]), strings(&["P2"]), strings(&["P3"])]
        );
        // The last window reaches the end and is short, so it is never sent.
        assert_eq!(oracle.call_count(), 3);
    }

    #[tokio::test]
    async fn echoing_the_last_label_gives_one_page_per_paragraph() {
        // Answers with the final label of the window, i.e. the window end.
        let oracle = Arc::new(FnOracle::new(|prompt: &str| {
            let at = prompt.rfind('<').unwrap_or_default();
            let label: String = prompt[at..].chars().take_while(|c| *c != '>').collect();
            format!("Break point: {label}>")
        }));
        let paginator = Paginator::new(oracle.clone(), config(1, 1));

        let paragraphs = strings(&["P0", "P1", "P2", "P3"]);
        let result = paginator.paginate(&paragraphs).await.unwrap();
        let ranges: Vec<_> = result.pages.iter().map(Page::range).collect();
        assert_eq!(ranges, vec![0..1, 1..2, 2..3, 3..4]);
        assert_eq!(oracle.call_count(), 3);
        assert!(oracle.prompts()[2].contains("P2\n<3>"));
    }

    #[tokio::test]
    async fn short_window_inside_the_document_still_asks() {
        let paragraphs: Vec<String> = (0..3).map(|n| paragraph(&format!("m{n}"), 50)).collect();
        let oracle = Arc::new(FnOracle::new(|_: &str| "no label here".to_string()));
        let paginator = Paginator::new(oracle.clone(), config(100, 280));

        let result = paginator.paginate(&paragraphs).await.unwrap();
        let ranges: Vec<_> = result.pages.iter().map(Page::range).collect();
        // 0..2 is 100 words but not the tail; only 2..3 takes the fast path.
        assert_eq!(ranges, vec![0..2, 2..3]);
        assert_eq!(oracle.call_count(), 1);
    }

    #[tokio::test]
    async fn oracle_failure_propagates() {
        let oracle = Arc::new(ScriptedOracle::with_results(vec![Err(
            OracleError::AuthenticationFailed("bad key".into()),
        )]));
        let paginator = Paginator::new(oracle, PaginationConfig::default());

        let err = paginator.paginate(&document()).await.unwrap_err();
        assert!(matches!(err, Error::Oracle(OracleError::AuthenticationFailed(_))));
    }
}
