//! Value and key syntax.
//!
//! Values come in three forms: unquoted, single-quoted (no escapes) and
//! double-quoted (`\n \r \t \\ \"` escapes, literal newlines allowed).
//! [`encode`] only ever produces the unquoted or double-quoted form, and
//! `decode(encode(v)) == v` holds for every string.

use std::borrow::Cow;
use crate::error::{Error, Result};
use crate::types::QuoteType;

/// Returns true when `value` cannot be written unquoted.
pub fn needs_quotes(value: &str) -> bool {
    value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\' | '#'))
}

/// Encodes `value` into its on-disk form, quotes included.
pub fn encode(value: &str) -> (String, QuoteType) {
    if !needs_quotes(value) {
        return (value.to_owned(), QuoteType::None);
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    (out, QuoteType::Double)
}

/// Decodes a raw value (quotes included) written in the given style.
pub fn decode(raw: &str, quote: QuoteType) -> Cow<'_, str> {
    let inner = match quote.as_char() {
        Some(q) => raw
            .strip_prefix(q)
            .and_then(|r| r.strip_suffix(q))
            .unwrap_or(raw),
        None => return Cow::Borrowed(raw),
    };

    if quote == QuoteType::Single || memchr::memchr(b'\\', inner.as_bytes()).is_none() {
        return Cow::Borrowed(inner);
    }

    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('r') => value.push('\r'),
            Some('t') => value.push('\t'),
            Some('\\') => value.push('\\'),
            Some('"') => value.push('"'),
            Some(other) => {
                value.push('\\');
                value.push(other);
            }
            None => value.push('\\'),
        }
    }
    Cow::Owned(value)
}

/// Checks `key` against the write-time grammar `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_valid_key(key: &str) -> bool {
    validate_key(key).is_ok()
}

pub fn validate_key(key: &str) -> Result<()> {
    let reason = match key.as_bytes() {
        [] => "key is empty",
        [first, ..] if !(first.is_ascii_alphabetic() || *first == b'_') => {
            "key must start with a letter or underscore"
        }
        [_, rest @ ..] if rest.iter().any(|b| !(b.is_ascii_alphanumeric() || *b == b'_')) => {
            "key may only contain letters, digits and underscores"
        }
        _ => return Ok(()),
    };
    Err(Error::InvalidKey {
        key: key.to_owned(),
        reason,
    })
}
