//! Wire codec for the notewire record stream ("4P-Frame").
//!
//! Every frame is a fixed 3-byte header followed by the payload:
//!
//! ```text
//! +-----------+-----------+----------+---------------------+
//! | len_hi    | len_lo    | type     | payload (len bytes) |
//! +-----------+-----------+----------+---------------------+
//! ```
//!
//! The length is an unsigned 16-bit big-endian byte count. There is no
//! checksum and no terminator. Frame types are listed in [`FrameType`].
//!
//! # Example
//!
//! ```rust
//! use notewire_protocol::{FrameAssembler, FrameType, encode_frame};
//!
//! let mut bytes = encode_frame(FrameType::Info, "START_NOTES_STREAM").unwrap();
//! bytes.extend(encode_frame(FrameType::EndOfStream, "END").unwrap());
//!
//! let mut assembler = FrameAssembler::new();
//! let frames = assembler.push(&bytes[..5]);
//! assert!(frames.is_empty());
//!
//! let frames = assembler.push(&bytes[5..]);
//! assert_eq!(frames.len(), 2);
//! assert_eq!(frames[1].frame_type, FrameType::EndOfStream);
//! ```

mod assembler;
mod error;
mod framing;
mod types;

pub use assembler::FrameAssembler;
pub use error::{ProtocolError, ProtocolResult};
pub use framing::{
    Decoded, FrameReader, FrameWriter, encode_frame, encode_json_frame, try_decode_one,
};
pub use types::{Frame, FrameType};

/// Size of the frame header in bytes.
pub const HEADER_SIZE: usize = 3;

/// Largest payload a frame can carry.
pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize;

/// Payload of the informational frame that opens a note stream.
pub const STREAM_START_MESSAGE: &str = "START_NOTES_STREAM";

/// Payload of the end-of-stream frame.
pub const STREAM_END_MESSAGE: &str = "END";
