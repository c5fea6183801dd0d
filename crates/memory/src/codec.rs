//! Text interchange for memories.
//!
//! Gists and pages are exchanged as index-annotated entries separated by
//! blank lines:
//!
//! ```text
//! 0: The narrator arrives in town.
//!
//! 1: A storm delays the ferry.
//! ```
//!
//! Pages use the same framing with a list-of-strings literal as payload
//! (`0: ['First paragraph.', "It's the second."]`). The literal is read by a
//! small recursive-descent parser; nothing is ever evaluated.

use readagent_core::error::MemoryError;
use readagent_core::text::collapse_blank_lines;
use std::fmt::Write as _;
use std::iter::Peekable;
use std::str::CharIndices;
use tracing::warn;

const ENTRY_SEPARATOR: &str = "\n\n";

/// Join paragraphs into one text, separated by blank lines.
pub fn join_paragraphs(paragraphs: &[String]) -> String {
    paragraphs.join(ENTRY_SEPARATOR)
}

/// Split a text into paragraphs on blank lines.
pub fn split_paragraphs(raw: &str) -> Vec<String> {
    raw.split(ENTRY_SEPARATOR).map(str::to_string).collect()
}

/// Render gists as `"{i}: {gist}"` entries.
///
/// Each gist is trimmed and its blank lines collapsed first, since the text
/// form cannot carry either. Gister output is already in that shape, so only
/// hand-edited gists change.
pub fn render_gists(gists: &[String]) -> String {
    gists
        .iter()
        .enumerate()
        .map(|(i, g)| format!("{i}: {}", collapse_blank_lines(g.trim())))
        .collect::<Vec<_>>()
        .join(ENTRY_SEPARATOR)
}

/// Parse text produced by [`render_gists`] (or edited by hand).
pub fn parse_gists(raw: &str) -> Result<Vec<String>, MemoryError> {
    Ok(split_entries(raw)?
        .into_iter()
        .map(|(_, payload)| payload.to_string())
        .collect())
}

/// Render pages as `"{i}: [...]"` entries, one list literal per page.
pub fn render_pages(pages: &[Vec<String>]) -> String {
    pages
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{i}: {}", render_string_list(p)))
        .collect::<Vec<_>>()
        .join(ENTRY_SEPARATOR)
}

/// Parse text produced by [`render_pages`].
pub fn parse_pages(raw: &str) -> Result<Vec<Vec<String>>, MemoryError> {
    split_entries(raw)?
        .into_iter()
        .enumerate()
        .map(|(entry, (_, payload))| {
            parse_string_list(payload).map_err(|reason| MemoryError::Format { entry, reason })
        })
        .collect()
}

/// Split interchange text into `(index, payload)` pairs.
fn split_entries(raw: &str) -> Result<Vec<(usize, &str)>, MemoryError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    raw.split(ENTRY_SEPARATOR)
        .enumerate()
        .map(|(entry, chunk)| {
            let (index, payload) = chunk.split_once(':').ok_or_else(|| MemoryError::Format {
                entry,
                reason: "missing ':' after the entry index".into(),
            })?;
            let index: usize = index.trim().parse().map_err(|_| MemoryError::Format {
                entry,
                reason: format!("'{}' is not an entry index", index.trim()),
            })?;
            if index != entry {
                warn!(entry, index, "Interchange entry index does not match its position");
            }
            Ok((index, payload.trim()))
        })
        .collect()
}

/// Render a list of strings as a list literal, quoting like Python's `repr`.
pub fn render_string_list(items: &[String]) -> String {
    let mut out = String::from("[");
    for (n, item) in items.iter().enumerate() {
        if n > 0 {
            out.push_str(", ");
        }
        push_quoted(&mut out, item);
    }
    out.push(']');
    out
}

/// Single quotes unless the text holds a `'` and no `"`.
fn push_quoted(out: &mut String, s: &str) {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || (0x7f..=0x9f).contains(&(c as u32)) => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}

/// Parse a list-of-strings literal such as `['a', "b's", 'c\n']`.
///
/// Accepts single- or double-quoted items, the usual backslash escapes and
/// an optional trailing comma. Anything else is rejected with a description
/// of what was expected where.
pub fn parse_string_list(literal: &str) -> Result<Vec<String>, String> {
    let mut parser = ListParser {
        chars: literal.char_indices().peekable(),
    };
    let items = parser.list()?;
    parser.skip_whitespace();
    match parser.chars.next() {
        None => Ok(items),
        Some((pos, c)) => Err(format!("unexpected '{c}' after the list at offset {pos}")),
    }
}

struct ListParser<'a> {
    chars: Peekable<CharIndices<'a>>,
}

impl ListParser<'_> {
    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn expect(&mut self, wanted: char) -> Result<(), String> {
        match self.chars.next() {
            Some((_, c)) if c == wanted => Ok(()),
            Some((pos, c)) => Err(format!("expected '{wanted}' at offset {pos}, found '{c}'")),
            None => Err(format!("expected '{wanted}', found end of input")),
        }
    }

    fn list(&mut self) -> Result<Vec<String>, String> {
        self.skip_whitespace();
        self.expect('[')?;

        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.chars.next_if(|(_, c)| *c == ']').is_some() {
                return Ok(items);
            }

            items.push(self.string()?);

            self.skip_whitespace();
            match self.chars.next() {
                Some((_, ',')) => continue,
                Some((_, ']')) => return Ok(items),
                Some((pos, c)) => {
                    return Err(format!("expected ',' or ']' at offset {pos}, found '{c}'"));
                }
                None => return Err("unterminated list".into()),
            }
        }
    }

    fn string(&mut self) -> Result<String, String> {
        let quote = match self.chars.next() {
            Some((_, c @ ('\'' | '"'))) => c,
            Some((pos, c)) => return Err(format!("expected a quoted string at offset {pos}, found '{c}'")),
            None => return Err("expected a quoted string, found end of input".into()),
        };

        let mut out = String::new();
        loop {
            match self.chars.next() {
                None => return Err("unterminated string".into()),
                Some((_, c)) if c == quote => return Ok(out),
                Some((pos, '\n')) => return Err(format!("raw newline inside string at offset {pos}")),
                Some((_, '\\')) => self.escape(&mut out)?,
                Some((_, c)) => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), String> {
        let (pos, c) = self
            .chars
            .next()
            .ok_or_else(|| "dangling backslash at end of input".to_string())?;
        match c {
            '\\' | '\'' | '"' => out.push(c),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'v' => out.push('\x0b'),
            '\n' => {}
            'x' => out.push(self.code_point(2, pos)?),
            'u' => out.push(self.code_point(4, pos)?),
            'U' => out.push(self.code_point(8, pos)?),
            // Unknown escapes keep their backslash.
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn code_point(&mut self, digits: usize, pos: usize) -> Result<char, String> {
        let mut value = 0u32;
        for _ in 0..digits {
            let digit = self
                .chars
                .next()
                .and_then(|(_, c)| c.to_digit(16))
                .ok_or_else(|| format!("truncated escape at offset {pos}"))?;
            value = value * 16 + digit;
        }
        char::from_u32(value).ok_or_else(|| format!("invalid code point {value:#x} at offset {pos}"))
    }
}
