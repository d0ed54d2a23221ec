use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Byte input that is not valid UTF-8. Text input never produces this.
    #[error("Malformed input at byte {offset}: {reason}")]
    MalformedInput { offset: usize, reason: String },

    #[error("Invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: &'static str },

    #[error("Missing value for key {key:?}")]
    MissingValue { key: String },

    #[error("IO Error: {0}")]
    Io(String),
}

impl Error {
    /// Key the error refers to, for write-time errors.
    pub fn key(&self) -> Option<&str> {
        match self {
            Error::InvalidKey { key, .. } | Error::MissingValue { key } => Some(key.as_str()),
            Error::MalformedInput { .. } | Error::Io(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
