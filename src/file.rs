use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use indexmap::IndexMap;
use tracing::{debug, warn};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::lexer::normalize_newlines;
use crate::types::ParseOptions;

/// A `.env` file on disk.
///
/// Every call reads the file again; nothing is cached between calls. Writes
/// happen only when an edit changes the text. Concurrent writers to the same
/// path are not coordinated.
#[derive(Debug, Clone)]
pub struct EnvFile {
    path: PathBuf,
    options: ParseOptions,
}

impl EnvFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: ParseOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file. A missing file reads as empty text.
    pub fn read_text(&self) -> Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "file does not exist, reading as empty");
                Ok(String::new())
            }
            Err(e) => Err(Error::Io(format!("Failed to read file {}: {}", self.path.display(), e))),
        }
    }

    /// Writes `text`, creating parent directories as needed.
    pub fn write_text(&self, text: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Io(format!("Failed to create directory {}: {}", parent.display(), e))
            })?;
        }
        fs::write(&self.path, text).map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "write failed");
            Error::Io(format!("Failed to write file {}: {}", self.path.display(), e))
        })?;
        debug!(path = %self.path.display(), bytes = text.len(), "wrote file");
        Ok(())
    }

    pub fn get(&self) -> Result<IndexMap<String, String>> {
        let text = self.read_text()?;
        let text = normalize_newlines(&text);
        Ok(Document::parse_with_options(&text, self.options).to_map())
    }

    pub fn get_key(&self, key: &str) -> Result<Option<String>> {
        let text = self.read_text()?;
        let text = normalize_newlines(&text);
        Ok(Document::parse_with_options(&text, self.options).get(key).map(str::to_owned))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_many([(key, Some(value))])
    }

    pub fn set_many<'k, I>(&self, updates: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'k str, Option<&'k str>)>,
    {
        let text = self.read_text()?;
        let updated = crate::set_many(&text, updates)?;
        self.write_if_changed(&text, &updated)
    }

    /// Rewrites the file in canonical form.
    pub fn format(&self) -> Result<()> {
        let text = self.read_text()?;
        let formatted = crate::format(&text);
        self.write_if_changed(&text, &formatted)
    }

    fn write_if_changed(&self, before: &str, after: &str) -> Result<()> {
        if before == after {
            debug!(path = %self.path.display(), "no changes to write");
            return Ok(());
        }
        self.write_text(after)
    }
}
