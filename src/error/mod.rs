//! Error types for fastchunking.

use std::fmt;

/// Errors that can occur while configuring or driving a chunker.
#[derive(Debug)]
pub enum ChunkError {
    /// An I/O error occurred while reading input data.
    Io(std::io::Error),

    /// Invalid configuration parameter.
    ///
    /// Always raised at construction time, never by a boundary query.
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}

impl ChunkError {
    pub(crate) const fn invalid(message: &'static str) -> Self {
        ChunkError::InvalidConfig { message }
    }
}

impl fmt::Display for ChunkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkError::Io(e) => write!(f, "io error: {}", e),
            ChunkError::InvalidConfig { message } => {
                write!(f, "invalid config: {}", message)
            }
        }
    }
}

impl std::error::Error for ChunkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChunkError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ChunkError {
    fn from(e: std::io::Error) -> Self {
        ChunkError::Io(e)
    }
}
