//! Protocol error types.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur during protocol operations.
///
/// A partially received frame is not an error; the codec reports it as
/// [`Decoded::Incomplete`](crate::Decoded::Incomplete) and the assembler
/// waits for more bytes.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Payload does not fit the 16-bit length field.
    #[error("payload too large: {size} bytes (max: {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// Failed to serialize a payload to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error during read/write.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
