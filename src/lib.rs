//! Round-trip safe reading and editing of `.env` documents.
//!
//! Reads resolve keys with last-occurrence-wins semantics. Edits rewrite only
//! the assignments they change; comments, blank lines, indentation, `export`
//! prefixes and the quoting of untouched values are kept as written.
//!
//! ```
//! let text = "# database\nDB_HOST=localhost # dev only\n";
//!
//! assert_eq!(envedit::get_key(text, "DB_HOST").as_deref(), Some("localhost"));
//!
//! let text = envedit::set(text, "DB_HOST", "db.internal").unwrap();
//! assert_eq!(text, "# database\nDB_HOST=db.internal # dev only\n");
//! ```

mod builder;
pub mod codec;
mod document;
mod error;
mod file;
mod formatter;
mod iter;
mod lexer;
mod mutator;
mod types;

pub use builder::{DocumentBuilder, EnvEdit};
pub use document::Document;
pub use error::{Error, Result};
pub use file::EnvFile;
pub use formatter::format;
pub use iter::LineIter;
pub use lexer::{normalize_newlines, Lexer};
pub use mutator::{set, set_many};
pub use types::{Assignment, KeyChars, Line, ParseOptions, Position, QuoteType, RawLine, Span};

use indexmap::IndexMap;

pub fn parse(input: &str) -> Document<'_> {
    Document::parse(input)
}

pub fn parse_with_options(input: &str, options: ParseOptions) -> Document<'_> {
    Document::parse_with_options(input, options)
}

/// All keys with their effective values, in order of first appearance.
pub fn get(text: &str) -> IndexMap<String, String> {
    let text = normalize_newlines(text);
    Document::parse(&text).to_map()
}

pub fn get_key(text: &str, key: &str) -> Option<String> {
    let text = normalize_newlines(text);
    Document::parse(&text).get(key).map(str::to_owned)
}

/// Values for `keys` in the requested order; missing keys map to `None`.
pub fn get_keys<I, K>(text: &str, keys: I) -> IndexMap<String, Option<String>>
where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    let text = normalize_newlines(text);
    Document::parse(&text).get_many(keys)
}
