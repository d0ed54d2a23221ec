use std::path::PathBuf;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::file::EnvFile;
use crate::types::{KeyChars, ParseOptions};

#[derive(Debug)]
enum Source<'a> {
    Str(&'a str),
    Bytes(&'a [u8]),
}

pub struct DocumentBuilder<'a> {
    source: Source<'a>,
    options: ParseOptions,
}

impl<'a> DocumentBuilder<'a> {
    pub fn new(source_str: &'a str) -> Self {
        Self {
            source: Source::Str(source_str),
            options: ParseOptions::default(),
        }
    }

    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self {
            source: Source::Bytes(bytes),
            options: ParseOptions::default(),
        }
    }

    /// Only recognize keys made of letters, digits and underscores
    pub fn strict_keys(mut self) -> Self {
        self.options.key_chars = KeyChars::Strict;
        self
    }

    /// Also recognize `.` and `-` inside keys (the default)
    pub fn permissive_keys(mut self) -> Self {
        self.options.key_chars = KeyChars::Permissive;
        self
    }

    pub fn options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse the input into a Document
    pub fn parse(self) -> Result<Document<'a>> {
        let text = match self.source {
            Source::Str(s) => s,
            Source::Bytes(b) => std::str::from_utf8(b).map_err(|e| Error::MalformedInput {
                offset: e.valid_up_to(),
                reason: format!("Invalid UTF-8: {}", e),
            })?,
        };
        Ok(Document::parse_with_options(text, self.options))
    }
}

/// Main entry point for configuring and opening documents
pub struct EnvEdit;

impl EnvEdit {
    /// Create a builder from a string slice
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &str) -> DocumentBuilder<'_> {
        DocumentBuilder::new(input)
    }

    /// Create a builder from bytes
    pub fn from_bytes(input: &[u8]) -> DocumentBuilder<'_> {
        DocumentBuilder::from_bytes(input)
    }

    /// Open a file-backed document
    pub fn from_file(path: impl Into<PathBuf>) -> EnvFile {
        EnvFile::new(path)
    }

    /// Search for file in current directory and ancestors
    pub fn find_file(filename: &str) -> Result<EnvFile> {
        let current = std::env::current_dir()
            .map_err(|e| Error::Io(format!("Failed to get current directory: {}", e)))?;
        Self::find_file_from(current, filename)
    }

    /// Search for file in `dir` and its ancestors
    pub fn find_file_from(dir: impl Into<PathBuf>, filename: &str) -> Result<EnvFile> {
        let start = dir.into();
        start
            .ancestors()
            .map(|dir| dir.join(filename))
            .find(|path| path.is_file())
            .map(EnvFile::new)
            .ok_or_else(|| {
                Error::Io(format!(
                    "File '{}' not found in {} or its ancestors",
                    filename,
                    start.display()
                ))
            })
    }
}
