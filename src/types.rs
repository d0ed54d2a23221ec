use std::borrow::Cow;
use std::ops::Range;

// ==================================================================================
//  Configuration
// ==================================================================================

/// Character set accepted for keys when reading a document.
///
/// Writes always use the strict set, see [`crate::codec::validate_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyChars {
    /// `[A-Za-z_][A-Za-z0-9_.-]*`
    #[default]
    Permissive,
    /// `[A-Za-z_][A-Za-z0-9_]*`
    Strict,
}

impl KeyChars {
    #[inline]
    pub fn accepts(self, b: u8) -> bool {
        match self {
            KeyChars::Permissive => b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-'),
            KeyChars::Strict => b.is_ascii_alphanumeric() || b == b'_',
        }
    }

    #[inline]
    pub fn accepts_first(self, b: u8) -> bool {
        b.is_ascii_alphabetic() || b == b'_'
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    pub key_chars: KeyChars,
}

impl ParseOptions {
    pub fn permissive() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self {
            key_chars: KeyChars::Strict,
        }
    }
}

// ==================================================================================
//  Position & Spans
// ==================================================================================

/// A physical line index paired with the byte offset where that line starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub offset: usize,
}

impl Position {
    #[inline]
    pub fn new(line: usize, offset: usize) -> Self {
        Self { line, offset }
    }
}

/// Half-open span over physical lines. `end` points at the first line after the span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    #[inline]
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Physical line indices covered by this span.
    #[inline]
    pub fn lines(&self) -> Range<usize> {
        self.start.line..self.end.line
    }

    #[inline]
    pub fn line_count(&self) -> usize {
        self.end.line - self.start.line
    }

    /// Byte range covered by this span, terminators included.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start.offset..self.end.offset
    }

    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ==================================================================================
//  Data Models
// ==================================================================================

/// Type of quoting used for a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteType {
    Single, // '
    Double, // "
    #[default]
    None,   // No quotes
}

impl QuoteType {
    pub fn as_char(self) -> Option<char> {
        match self {
            QuoteType::Single => Some('\''),
            QuoteType::Double => Some('"'),
            QuoteType::None => None,
        }
    }
}

/// Strips one line terminator (`\n` or `\r\n`) from the end of `raw`.
/// A `\r` with no `\n` after it is content.
#[inline]
pub(crate) fn strip_terminator(raw: &str) -> &str {
    match raw.strip_suffix('\n') {
        Some(line) => line.strip_suffix('\r').unwrap_or(line),
        None => raw,
    }
}

/// A line kept as plain text: blank lines, comments and unparseable content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine<'a> {
    pub raw: &'a str,
    pub span: Span,
    /// Set on the unknown block an unclosed quote extends to end of input.
    /// Anything written after such a block becomes part of it.
    pub unterminated: bool,
}

impl<'a> RawLine<'a> {
    /// Line content without its final terminator.
    #[inline]
    pub fn text(&self) -> &'a str {
        strip_terminator(self.raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment<'a> {
    pub key: &'a str,

    /// Decoded value.
    pub value: Cow<'a, str>,
    /// Value exactly as written, quotes included.
    pub raw_value: &'a str,
    pub quote: QuoteType,

    pub leading_whitespace: &'a str,
    pub is_exported: bool,
    /// Everything before the key: leading whitespace and the `export` keyword.
    pub prefix: &'a str,
    /// Everything between the key and the value, `=` included.
    pub separator: &'a str,
    /// Everything after the value on its last physical line, terminator excluded.
    pub trailing: &'a str,

    pub raw: &'a str,
    pub span: Span,
}

impl<'a> Assignment<'a> {
    /// The inline `# ...` comment following the value, if any.
    pub fn trailing_comment(&self) -> Option<&'a str> {
        let trimmed = self.trailing.trim_start_matches([' ', '\t', '\r']);
        if trimmed.starts_with('#') {
            Some(trimmed.trim_end())
        } else {
            None
        }
    }

    #[inline]
    pub fn is_multiline(&self) -> bool {
        self.span.line_count() > 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    Blank(RawLine<'a>),
    Comment(RawLine<'a>),
    Assignment(Assignment<'a>),
    Unknown(RawLine<'a>),
}

impl<'a> Line<'a> {
    /// Source text of the line, terminators included.
    pub fn raw(&self) -> &'a str {
        match self {
            Line::Blank(l) | Line::Comment(l) | Line::Unknown(l) => l.raw,
            Line::Assignment(a) => a.raw,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Line::Blank(l) | Line::Comment(l) | Line::Unknown(l) => l.span,
            Line::Assignment(a) => a.span,
        }
    }

    pub fn as_assignment(&self) -> Option<&Assignment<'a>> {
        match self {
            Line::Assignment(a) => Some(a),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Line::Blank(_))
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Line::Comment(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Line::Unknown(_))
    }
}
