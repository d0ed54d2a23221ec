use std::collections::HashMap;
use indexmap::IndexMap;
use tracing::debug;
use crate::codec::{self, validate_key};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::lexer::normalize_newlines;
use crate::types::{Assignment, Line, QuoteType};

/// Sets a single key. See [`set_many`].
pub fn set(text: &str, key: &str, value: &str) -> Result<String> {
    set_many(text, [(key, Some(value))])
}

/// Sets several keys in one pass.
///
/// Every key resolves against `text` as given: an existing key has its last
/// assignment rewritten in place, a new key is appended. When a key already
/// holds the requested value its line is left alone, and when nothing changes
/// at all the input comes back byte for byte.
///
/// A `None` value or a key outside `[A-Za-z_][A-Za-z0-9_]*` rejects the whole
/// batch before any text is produced.
pub fn set_many<'k, I>(text: &str, updates: I) -> Result<String>
where
    I: IntoIterator<Item = (&'k str, Option<&'k str>)>,
{
    let mut batch: IndexMap<&str, &str> = IndexMap::new();
    for (key, value) in updates {
        validate_key(key)?;
        let value = value.ok_or_else(|| Error::MissingValue { key: key.to_owned() })?;
        batch.insert(key, value);
    }

    let normalized = normalize_newlines(text);
    let doc = Document::parse(&normalized);

    let mut replacements: HashMap<usize, String> = HashMap::new();
    let mut appends: Vec<String> = Vec::new();
    let mut unchanged = 0usize;

    for (key, value) in &batch {
        match doc.position(key).and_then(|i| Some((i, doc.lines()[i].as_assignment()?))) {
            Some((_, existing)) if existing.value == *value => unchanged += 1,
            Some((i, existing)) => {
                replacements.insert(i, rewrite(existing, value));
            }
            None => appends.push(new_assignment(key, value)),
        }
    }

    debug!(
        replaced = replacements.len(),
        appended = appends.len(),
        unchanged,
        "applying batch"
    );

    if replacements.is_empty() && appends.is_empty() {
        return Ok(text.to_owned());
    }

    let lines = doc.lines();
    let insert_at = match lines.last() {
        Some(Line::Blank(_)) => lines.len() - 1,
        // an unclosed quote would swallow anything written after it
        Some(Line::Unknown(block)) if block.unterminated => lines.len() - 1,
        _ => lines.len(),
    };

    // A bare value ending in `\r` would read back without it once terminated
    if let Some(Line::Assignment(tail)) = lines.last() {
        if tail.quote == QuoteType::None && tail.raw_value.ends_with('\r') {
            replacements
                .entry(lines.len() - 1)
                .or_insert_with(|| rewrite(tail, &tail.value));
        }
    }

    let appended: usize = appends.iter().map(String::len).sum();
    let mut out = String::with_capacity(normalized.len() + appended);
    for (i, line) in lines.iter().enumerate() {
        if i == insert_at {
            appends.iter().for_each(|a| push_line(&mut out, a));
        }
        match replacements.get(&i) {
            Some(new) => push_line(&mut out, new),
            None => push_line(&mut out, line.raw()),
        }
    }
    if insert_at == lines.len() {
        appends.iter().for_each(|a| push_line(&mut out, a));
    }

    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

/// Renders `existing` with a new value, keeping everything around the value.
fn rewrite(existing: &Assignment<'_>, value: &str) -> String {
    let (encoded, quote) = codec::encode(value);
    let mut line = String::with_capacity(
        existing.prefix.len() + existing.key.len() + encoded.len() + existing.trailing.len() + 3,
    );
    line.push_str(existing.prefix);
    line.push_str(existing.key);
    line.push_str(existing.separator);
    line.push_str(&encoded);
    // `KEY=value#x` would read back as part of the value
    if quote == QuoteType::None && existing.trailing.starts_with('#') {
        line.push(' ');
    }
    line.push_str(existing.trailing);
    line.push('\n');
    line
}

fn new_assignment(key: &str, value: &str) -> String {
    let (encoded, _) = codec::encode(value);
    format!("{}={}\n", key, encoded)
}

/// Appends `text`, first terminating a previous line that lacked a newline.
fn push_line(out: &mut String, text: &str) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(text);
}
