use std::fmt;
use indexmap::IndexMap;
use crate::lexer::Lexer;
use crate::types::{Assignment, Line, ParseOptions, RawLine};

/// Parsed document with a last-occurrence-wins query API.
///
/// A document borrows its source and never changes after parsing. Editing
/// functions produce new text instead.
#[derive(Debug, Clone, Default)]
pub struct Document<'a> {
    source: &'a str,
    lines: Vec<Line<'a>>,
    /// key -> index in `lines` of its last assignment, in order of first appearance
    index: IndexMap<&'a str, usize>,
}

impl<'a> Document<'a> {
    pub fn parse(source: &'a str) -> Self {
        Self::parse_with_options(source, ParseOptions::default())
    }

    pub fn parse_with_options(source: &'a str, options: ParseOptions) -> Self {
        let lines = Lexer::with_options(source, options).tokenize();
        Self::from_lines(source, lines)
    }

    pub(crate) fn from_lines(source: &'a str, lines: Vec<Line<'a>>) -> Self {
        let mut index = IndexMap::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            if let Line::Assignment(kv) = line {
                index.insert(kv.key, i);
            }
        }
        Self { source, lines, index }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn lines(&self) -> &[Line<'a>] {
        &self.lines
    }

    /// Get value by key (returns None if not found)
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_assignment(key).map(|kv| kv.value.as_ref())
    }

    /// Get value or default
    pub fn get_or<'b>(&'b self, key: &str, default: &'b str) -> &'b str {
        self.get(key).unwrap_or(default)
    }

    /// The assignment that defines `key`, i.e. its last occurrence.
    pub fn get_assignment(&self, key: &str) -> Option<&Assignment<'a>> {
        self.position(key).and_then(|i| self.lines[i].as_assignment())
    }

    /// Line index of the assignment that defines `key`.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Values for `keys` in the requested order; missing keys map to `None`.
    pub fn get_many<I, K>(&self, keys: I) -> IndexMap<String, Option<String>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        keys.into_iter()
            .map(|k| {
                let k = k.as_ref();
                (k.to_owned(), self.get(k).map(str::to_owned))
            })
            .collect()
    }

    /// Export all keys with their effective values (owned copies)
    pub fn to_map(&self) -> IndexMap<String, String> {
        self.index
            .keys()
            .filter_map(|k| self.get(k).map(|v| (k.to_string(), v.to_owned())))
            .collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.index.keys().copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Every assignment in source order, shadowed duplicates included.
    pub fn assignments(&self) -> impl Iterator<Item = &Assignment<'a>> {
        self.lines.iter().filter_map(Line::as_assignment)
    }

    pub fn unknown_lines(&self) -> impl Iterator<Item = &RawLine<'a>> {
        self.lines.iter().filter_map(|line| match line {
            Line::Unknown(raw) => Some(raw),
            _ => None,
        })
    }

    pub fn has_unknown(&self) -> bool {
        self.lines.iter().any(Line::is_unknown)
    }
}

/// Writes the lines back out; the result equals the source text.
impl fmt::Display for Document<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.lines.iter().try_for_each(|line| f.write_str(line.raw()))
    }
}
