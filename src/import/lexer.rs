//! Identifier lexing for TMDL declaration lines
//!
//! A declaration line is a sequence of whitespace-separated tokens such as
//! `column 'Order Date' = ...` or `table Sales`. An identifier is either a
//! bare token or a single-quoted span that may contain whitespace. Quotes
//! cannot be escaped: the second quote always ends the identifier.

use std::ops::Range;

/// Identifier quote delimiter
pub const QUOTE: char = '\'';

/// Reason an identifier could not be lexed from a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("line has no token at position {0}")]
    MissingToken(usize),
    #[error("quoted identifier is not terminated")]
    UnterminatedQuote,
}

/// Byte offsets of whitespace-delimited tokens in `line`
fn token_spans(line: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    let mut chars = line.char_indices().peekable();
    std::iter::from_fn(move || {
        while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
        let (start, _) = chars.next()?;
        let mut end = line.len();
        while let Some(&(idx, c)) = chars.peek() {
            if c.is_whitespace() {
                end = idx;
                break;
            }
            chars.next();
        }
        Some((start, end))
    })
}

/// The first whitespace-delimited token of `line`, if any
pub fn keyword(line: &str) -> Option<&str> {
    token_spans(line).next().map(|(s, e)| &line[s..e])
}

/// Lex the identifier at token `position` (0-based) of `line`
///
/// A token starting with a quote extends to the next quote on the line,
/// inclusive, so `'Order Date'` is returned whole with its delimiters.
///
/// # Example
///
/// ```rust
/// use tmdl_er_sdk::import::lexer::identifier_at;
///
/// assert_eq!(identifier_at("\tcolumn 'Order Date' = 1", 1), Ok("'Order Date'"));
/// assert_eq!(identifier_at("table Sales", 1), Ok("Sales"));
/// ```
pub fn identifier_at(line: &str, position: usize) -> Result<&str, LexError> {
    identifier_span_at(line, position).map(|span| &line[span])
}

/// Byte range of the identifier at token `position` of `line`
pub fn identifier_span_at(line: &str, position: usize) -> Result<Range<usize>, LexError> {
    let (start, end) = token_spans(line)
        .nth(position)
        .ok_or(LexError::MissingToken(position))?;

    if !line[start..end].starts_with(QUOTE) {
        return Ok(start..end);
    }

    let body = start + QUOTE.len_utf8();
    match line[body..].find(QUOTE) {
        Some(offset) => Ok(start..body + offset + QUOTE.len_utf8()),
        None => Err(LexError::UnterminatedQuote),
    }
}

/// Strip one pair of surrounding quotes, if present
pub fn unquote(identifier: &str) -> &str {
    identifier
        .strip_prefix(QUOTE)
        .and_then(|s| s.strip_suffix(QUOTE))
        .unwrap_or(identifier)
}

/// Split a `table.column` reference on its single unquoted `.`
///
/// Both parts are returned trimmed and unquoted. References with no
/// separator, more than one unquoted separator, or an empty part yield
/// `None`.
///
/// ```rust
/// use tmdl_er_sdk::import::lexer::split_reference;
///
/// assert_eq!(split_reference("'Sales Order'.'Order Date'"), Some(("Sales Order", "Order Date")));
/// assert_eq!(split_reference("'v1.2'.Key"), Some(("v1.2", "Key")));
/// assert_eq!(split_reference("a.b.c"), None);
/// ```
pub fn split_reference(reference: &str) -> Option<(&str, &str)> {
    let mut in_quote = false;
    let mut separator = None;

    for (idx, c) in reference.char_indices() {
        match c {
            QUOTE => in_quote = !in_quote,
            '.' if !in_quote => {
                if separator.replace(idx).is_some() {
                    return None;
                }
            }
            _ => {}
        }
    }

    let idx = separator?;
    let table = unquote(reference[..idx].trim());
    let column = unquote(reference[idx + 1..].trim());
    if table.is_empty() || column.is_empty() {
        return None;
    }
    Some((table, column))
}
