use std::borrow::Cow;
use memchr::{memchr, memchr2, memchr_iter};
use tracing::trace;
use crate::codec;
use crate::iter::LineIter;
use crate::types::{Assignment, Line, ParseOptions, Position, QuoteType, RawLine, Span};

const BOM: &str = "\u{FEFF}";

/// Replaces `\r\n` terminators with `\n`. Borrows when there is nothing to replace.
pub fn normalize_newlines(input: &str) -> Cow<'_, str> {
    if memchr(b'\r', input.as_bytes()).is_none() {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(input.replace("\r\n", "\n"))
    }
}

/// Splits a document into classified lines.
///
/// Every byte of the input belongs to exactly one [`Line`]; joining the `raw`
/// text of all lines gives the input back. The lexer never fails: anything it
/// cannot classify becomes [`Line::Unknown`].
pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    cursor: usize,
    line: usize,
    options: ParseOptions,
}

impl<'a> Lexer<'a> {
    #[inline(always)]
    pub fn new(input: &'a str) -> Self {
        Self::with_options(input, ParseOptions::default())
    }

    #[inline(always)]
    pub fn with_options(input: &'a str, options: ParseOptions) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            cursor: 0,
            line: 0,
            options,
        }
    }

    pub fn tokenize(&mut self) -> Vec<Line<'a>> {
        let mut lines = Vec::with_capacity(32);
        while let Some(line) = self.next_line() {
            lines.push(line);
        }
        lines
    }

    pub fn iter(self) -> LineIter<'a> {
        LineIter::new(self)
    }

    pub fn next_line(&mut self) -> Option<Line<'a>> {
        if self.is_eof() {
            return None;
        }

        let start = self.cursor;
        let end = self.line_end(start);
        let content_end = self.content_end(start, end);

        let mut body = start;
        if start == 0 && self.input.starts_with(BOM) {
            body += BOM.len();
        }
        body = self.skip_blanks(body, content_end);

        let line = if body == content_end {
            Line::Blank(self.take(start, self.after(end)))
        } else if self.bytes[body] == b'#' {
            Line::Comment(self.take(start, self.after(end)))
        } else {
            self.classify_pair(start, body, end)
        };
        Some(line)
    }
}

impl<'a> Lexer<'a> {
    fn classify_pair(&mut self, start: usize, body: usize, end: usize) -> Line<'a> {
        let input = self.input;
        let content_end = self.content_end(start, end);
        let keys = self.options.key_chars;

        let mut pos = body;
        let mut is_exported = false;
        if let Some(after) = self.export_keyword(pos, content_end) {
            if after < content_end && keys.accepts_first(self.bytes[after]) {
                pos = after;
                is_exported = true;
            }
        }

        let key_start = pos;
        if pos >= content_end || !keys.accepts_first(self.bytes[pos]) {
            return self.unknown(start, end);
        }
        pos += 1;
        while pos < content_end && keys.accepts(self.bytes[pos]) {
            pos += 1;
        }
        let key_end = pos;

        pos = self.skip_blanks(pos, content_end);
        if pos >= content_end || self.bytes[pos] != b'=' {
            return self.unknown(start, end);
        }
        let value_start = self.skip_blanks(pos + 1, content_end);

        let quote = match self.bytes[value_start..content_end].first().copied() {
            Some(b'"') => QuoteType::Double,
            Some(b'\'') => QuoteType::Single,
            _ => QuoteType::None,
        };

        let (raw_value, trailing, last_end) = if quote == QuoteType::None {
            let value_end = self.comment_start(value_start, content_end).unwrap_or(content_end);
            let raw_value = input[value_start..value_end].trim_end_matches([' ', '\t']);
            let trailing = &input[value_start + raw_value.len()..content_end];
            (raw_value, trailing, end)
        } else {
            let Some(close) = self.find_closing(value_start, quote) else {
                trace!(
                    line = self.line,
                    key = &input[key_start..key_end],
                    "unterminated quote, rest of input is unknown"
                );
                let mut block = self.take(start, self.bytes.len());
                block.unterminated = true;
                return Line::Unknown(block);
            };
            let last_end = self.line_end(close + 1);
            let last_content_end = self.content_end(close + 1, last_end);
            let trailing = &input[close + 1..last_content_end];
            if !is_comment_or_blank(trailing) {
                trace!(line = self.line, "unexpected text after closing quote");
                return self.unknown(start, last_end);
            }
            (&input[value_start..=close], trailing, last_end)
        };

        let RawLine { raw, span, .. } = self.take(start, self.after(last_end));

        Line::Assignment(Assignment {
            key: &input[key_start..key_end],
            value: codec::decode(raw_value, quote),
            raw_value,
            quote,
            leading_whitespace: &input[start..body],
            is_exported,
            prefix: &input[start..key_start],
            separator: &input[key_end..value_start],
            trailing,
            raw,
            span,
        })
    }

    /// Offset of the closing quote matching the one at `open`, searching past line ends.
    fn find_closing(&self, open: usize, quote: QuoteType) -> Option<usize> {
        let from = open + 1;
        match quote {
            QuoteType::Single => memchr(b'\'', &self.bytes[from..]).map(|i| from + i),
            QuoteType::Double => {
                let mut i = from;
                while i < self.bytes.len() {
                    let at = i + memchr2(b'"', b'\\', &self.bytes[i..])?;
                    if self.bytes[at] == b'"' {
                        return Some(at);
                    }
                    i = at + 2;
                }
                None
            }
            QuoteType::None => None,
        }
    }

    /// Offset of a `#` that starts an inline comment in an unquoted value.
    fn comment_start(&self, value_start: usize, content_end: usize) -> Option<usize> {
        memchr_iter(b'#', &self.bytes[value_start..content_end])
            .map(|i| value_start + i)
            .find(|&at| matches!(self.bytes[at - 1], b' ' | b'\t'))
    }

    fn export_keyword(&self, pos: usize, content_end: usize) -> Option<usize> {
        let rest = &self.bytes[pos..content_end];
        if rest.len() > 6 && rest.starts_with(b"export") && matches!(rest[6], b' ' | b'\t') {
            Some(self.skip_blanks(pos + 6, content_end))
        } else {
            None
        }
    }

    fn unknown(&mut self, start: usize, end: usize) -> Line<'a> {
        trace!(line = self.line, "unclassified line");
        Line::Unknown(self.take(start, self.after(end)))
    }
}

impl<'a> Lexer<'a> {
    #[inline(always)]
    fn is_eof(&self) -> bool {
        self.cursor >= self.bytes.len()
    }

    /// Offset of the `\n` ending the physical line containing `from`, or the input length.
    #[inline]
    fn line_end(&self, from: usize) -> usize {
        memchr(b'\n', &self.bytes[from..]).map_or(self.bytes.len(), |i| from + i)
    }

    /// End of a line's content: `end` minus the `\r` of a `\r\n` terminator.
    #[inline]
    fn content_end(&self, start: usize, end: usize) -> usize {
        if end < self.bytes.len() && end > start && self.bytes[end - 1] == b'\r' {
            end - 1
        } else {
            end
        }
    }

    #[inline]
    fn after(&self, end: usize) -> usize {
        (end + 1).min(self.bytes.len())
    }

    #[inline]
    fn skip_blanks(&self, mut pos: usize, limit: usize) -> usize {
        while pos < limit && matches!(self.bytes[pos], b' ' | b'\t') {
            pos += 1;
        }
        pos
    }

    /// Consumes `start..stop` and returns it as a raw line.
    fn take(&mut self, start: usize, stop: usize) -> RawLine<'a> {
        let raw = &self.input[start..stop];
        let terminators = memchr_iter(b'\n', raw.as_bytes()).count();
        let physical = terminators + usize::from(!raw.ends_with('\n'));

        let span = Span::new(
            Position::new(self.line, start),
            Position::new(self.line + physical, stop),
        );
        self.cursor = stop;
        self.line += physical;
        RawLine {
            raw,
            span,
            unterminated: false,
        }
    }
}

fn is_comment_or_blank(trailing: &str) -> bool {
    let rest = trailing.trim_start_matches([' ', '\t', '\r']);
    rest.is_empty() || rest.starts_with('#')
}
