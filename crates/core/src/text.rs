//! Text helpers shared by pagination and gisting.

use regex_lite::Regex;
use std::sync::LazyLock;

static NEWLINE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("newline-run pattern is valid"));

/// Count whitespace-separated words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Collapse every run of two or more consecutive `\n` into a single `\n`.
pub fn collapse_blank_lines(text: &str) -> String {
    NEWLINE_RUNS.replace_all(text, "\n").into_owned()
}
