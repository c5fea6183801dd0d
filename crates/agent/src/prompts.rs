//! Prompt templates and the parsers for the answers they ask for.
//!
//! Every prompt is a single user turn. The wording is part of the behavior:
//! the parsers below expect the response shapes these prompts demonstrate.

const PAGINATION_INSTRUCTIONS: &str = "
You are given a passage that is taken from a larger text (article, book, ...) and some numbered labels between the paragraphs in the passage.
Numbered label are in angeled brackets. For example, if the label number is 19, it shows as <19> in text.
Please choose one label that it is natural to break reading.
Such point can be scene transition, end of a dialogue, end of an argument, narrative transition, etc.
Please answer the break point label and explain.
For example, if <57> is a good point to break, answer with \"Break point: <57>\n Because ...\"

Passage:

";

const GIST_INSTRUCTIONS: &str = "
Please shorten the following passage.
Just give me a shortened version. DO NOT explain your reason.

Passage:
";

const LOOKUP_INSTRUCTIONS: &str = "
The following text is what you remembered from reading an article and a multiple choice question related to it.
You may read 1 to 6 page(s) of the article again to refresh your memory to prepare yourselve for the question.
Please respond with which page(s) you would like to read.
For example, if your only need to read Page 8, respond with \"I want to look up Page [8] to ...\";
if your would like to read Page 7 and 12, respond with \"I want to look up Page [7, 12] to ...\";
if your would like to read Page 2, 3, 7, 15 and 18, respond with \"I want to look up Page [2, 3, 7, 15, 18] to ...\".
if your would like to read Page 3, 4, 5, 12, 13 and 16, respond with \"I want to look up Page [3, 3, 4, 12, 13, 16] to ...\".
DO NOT select more pages if you don't need to.
DO NOT answer the question yet.

Text:
";

const ANSWER_INSTRUCTIONS: &str = "
Read the following article and answer a question.

Article:
";

/// The marker a pagination response is expected to put before its label.
pub const BREAK_POINT_MARKER: &str = "Break point:";

/// Ask where to end the current page.
///
/// `preceding` is the tail of the previous page (empty for the first window),
/// `passage` is the labelled window, `trailing` is the paragraph right after
/// the window (empty at the end of the document).
pub fn pagination_prompt(preceding: &str, passage: &str, trailing: &str) -> String {
    format!("{PAGINATION_INSTRUCTIONS}{preceding}\n{passage}\n{trailing}\n\n")
}

/// Ask for a shortened version of one page.
pub fn gist_prompt(page_text: &str) -> String {
    format!("{GIST_INSTRUCTIONS}{page_text}\n")
}

/// Ask which pages to re-read before answering `question`.
pub fn lookup_prompt(gists_text: &str, question: &str) -> String {
    format!(
        "{LOOKUP_INSTRUCTIONS}\"\"\"{gists_text}\"\"\"\n\nQuestion:\n{question}\n\n\
         Take a deep breath and tell me: Which page(s) would you like to read again?\n"
    )
}

/// Ask the final question against the (partially expanded) document.
pub fn answer_prompt(context: &str, question: &str) -> String {
    format!("{ANSWER_INSTRUCTIONS}\"\"\"{context}\"\"\"\n\nQuestion:\n{question}\n\nAnswer:\n")
}

/// Extract `N` from a response of the form `Break point: <N> ...`.
///
/// The marker may appear anywhere, so a prose prefix before it is tolerated,
/// and any whitespace after it (newlines included) is skipped. The label must
/// come next. A response without the marker is read from its start. Anything
/// other than a run of ASCII digits between the angle brackets yields `None`.
pub fn parse_break_point(response: &str) -> Option<usize> {
    let rest = match response.find(BREAK_POINT_MARKER) {
        Some(at) => &response[at + BREAK_POINT_MARKER.len()..],
        None => response,
    };

    let label = rest.trim_start().strip_prefix('<')?;
    let close = label.find('>')?;
    let digits = &label[..close];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
