use std::io;

use thiserror::Error;

/// Errors raised while locating or walking a central directory.
///
/// Both variants are terminal for the current parse; callers treat either
/// as "not a readable archive".
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Format error: {0}")]
    Format(String),
}

impl Error {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        Error::Format(msg.into())
    }

    /// True for malformed-archive errors, false for I/O failures.
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(_))
    }
}

// Crate-wide result type
pub type Result<T> = std::result::Result<T, Error>;
