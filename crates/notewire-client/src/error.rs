//! Client error types.

use std::fmt;

use notewire_core::CipherError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type for a record session.
pub type SessionResult<T> = Result<T, SessionError>;

/// Failures while receiving a note stream.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The stream closed or timed out before the end-of-stream frame.
    #[error("stream terminated before end-of-stream frame ({received} notes received)")]
    StreamTerminatedEarly { received: usize },

    /// A record frame did not hold a valid note.
    #[error("malformed record payload: {0}")]
    MalformedFramePayload(#[source] serde_json::Error),

    /// A note body could not be decoded with the password.
    #[error("failed to decode note {title:?}: {source}")]
    MalformedCiphertext {
        title: String,
        #[source]
        source: CipherError,
    },

    /// Reading from the connection failed.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
}

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// IO error.
    Io(std::io::Error),
    /// Connection to server failed.
    Connection(String),
    /// Record session failed.
    Session(SessionError),
    /// Writing an export failed.
    Export(String),
    /// The embedded server failed.
    Server(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Connection(msg) => write!(f, "connection error: {}", msg),
            Self::Session(err) => write!(f, "session error: {}", err),
            Self::Export(msg) => write!(f, "export failed: {}", msg),
            Self::Server(msg) => write!(f, "server error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Session(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<SessionError> for ClientError {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}

impl From<notewire_server::ServerError> for ClientError {
    fn from(err: notewire_server::ServerError) -> Self {
        match err {
            notewire_server::ServerError::Io(e) => Self::Io(e),
            other => Self::Server(other.to_string()),
        }
    }
}
