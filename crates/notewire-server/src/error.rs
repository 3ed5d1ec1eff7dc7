//! Server error types.

use std::io;
use std::path::PathBuf;

use notewire_core::CipherError;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// IO error (socket, file, etc.).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Protocol error (framing, encoding, etc.).
    #[error("Protocol error: {0}")]
    Protocol(#[from] notewire_protocol::ProtocolError),

    /// Notes file could not be read, parsed or written.
    #[error("Note store error ({}): {message}", path.display())]
    Store { path: PathBuf, message: String },

    /// A note body could not be encoded.
    #[error("Cannot encode body of note {index} ({title:?}): {source}")]
    Encode {
        index: usize,
        title: String,
        #[source]
        source: CipherError,
    },

    /// A note does not fit in a single record frame.
    #[error("Note {index} ({title:?}) is {size} bytes as JSON, frames hold at most {max}")]
    NoteTooLarge {
        index: usize,
        title: String,
        size: usize,
        max: usize,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A connection operation exceeded the configured timeout.
    #[error("Timeout during {operation}")]
    Timeout { operation: String },

    /// Shutdown requested.
    #[error("Server shutdown requested")]
    Shutdown,
}

impl ServerError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a note store error.
    pub fn store(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Store {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }
}
