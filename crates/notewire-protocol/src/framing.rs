//! Frame encoding and decoding.
//!
//! [`encode_frame`] and [`try_decode_one`] are pure functions over byte
//! slices. [`FrameReader`] and [`FrameWriter`] move frames over an async
//! byte stream; the reader feeds whatever the transport delivers into a
//! [`FrameAssembler`] so frames may arrive split or batched arbitrarily.

use std::collections::VecDeque;

use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace};

use crate::assembler::FrameAssembler;
use crate::error::{ProtocolError, ProtocolResult};
use crate::types::{Frame, FrameType};
use crate::{HEADER_SIZE, MAX_PAYLOAD_SIZE};

/// Default size of a single transport read.
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Outcome of [`try_decode_one`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// A complete frame and the number of bytes it occupied.
    Frame { frame: Frame, consumed: usize },
    /// The buffer does not yet hold a complete frame.
    Incomplete,
}

/// Encodes a frame: 3-byte header followed by the UTF-8 payload.
///
/// # Example
///
/// ```rust
/// use notewire_protocol::{FrameType, encode_frame};
///
/// let bytes = encode_frame(FrameType::EndOfStream, "END").unwrap();
/// assert_eq!(bytes, [0x00, 0x03, 0xFF, b'E', b'N', b'D']);
/// ```
pub fn encode_frame(frame_type: FrameType, payload: &str) -> ProtocolResult<Vec<u8>> {
    let payload = payload.as_bytes();
    let len = u16::try_from(payload.len()).map_err(|_| ProtocolError::PayloadTooLarge {
        size: payload.len(),
        max: MAX_PAYLOAD_SIZE,
    })?;

    let mut buffer = Vec::with_capacity(HEADER_SIZE + payload.len());
    buffer.extend_from_slice(&len.to_be_bytes());
    buffer.push(frame_type.as_u8());
    buffer.extend_from_slice(payload);
    Ok(buffer)
}

/// Serializes `value` as compact JSON and encodes it as a frame.
pub fn encode_json_frame<T: Serialize>(frame_type: FrameType, value: &T) -> ProtocolResult<Vec<u8>> {
    let json = serde_json::to_string(value)?;
    encode_frame(frame_type, &json)
}

/// Attempts to decode one frame from the start of `buf`.
///
/// Never mutates `buf` and ignores anything after the first frame. Payload
/// bytes that are not valid UTF-8 are replaced with U+FFFD rather than
/// failing, so one bad payload cannot desynchronise the stream.
pub fn try_decode_one(buf: &[u8]) -> Decoded {
    if buf.len() < HEADER_SIZE {
        return Decoded::Incomplete;
    }

    let len = u16::from_be_bytes([buf[0], buf[1]]) as usize;
    let frame_type = FrameType::from(buf[2]);
    let end = HEADER_SIZE + len;

    if buf.len() < end {
        return Decoded::Incomplete;
    }

    let payload = String::from_utf8_lossy(&buf[HEADER_SIZE..end]).into_owned();
    Decoded::Frame {
        frame: Frame {
            frame_type,
            payload,
        },
        consumed: end,
    }
}

/// Reads frames from an async byte stream.
pub struct FrameReader<R> {
    reader: R,
    assembler: FrameAssembler,
    pending: VecDeque<Frame>,
    chunk: Vec<u8>,
    eof: bool,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    /// Creates a new FrameReader wrapping the given reader.
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, READ_CHUNK_SIZE)
    }

    /// Creates a FrameReader that reads at most `chunk_size` bytes at a time.
    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            assembler: FrameAssembler::new(),
            pending: VecDeque::new(),
            chunk: vec![0u8; chunk_size.max(1)],
            eof: false,
        }
    }

    /// Reads the next complete frame.
    ///
    /// Returns `Ok(None)` once the stream has ended. Bytes of a frame that
    /// was cut off by the end of the stream are left in the assembler; see
    /// [`FrameReader::buffered_len`].
    pub async fn read_frame(&mut self) -> ProtocolResult<Option<Frame>> {
        loop {
            if let Some(frame) = self.pending.pop_front() {
                return Ok(Some(frame));
            }
            if self.eof {
                return Ok(None);
            }

            let n = self.reader.read(&mut self.chunk).await?;
            if n == 0 {
                self.eof = true;
                if !self.assembler.is_empty() {
                    debug!(
                        buffered = self.assembler.buffered_len(),
                        "stream ended inside a frame"
                    );
                }
                continue;
            }

            trace!(bytes = n, "chunk received");
            self.pending.extend(self.assembler.push(&self.chunk[..n]));
        }
    }

    /// Number of bytes held for a frame that is not complete yet.
    pub fn buffered_len(&self) -> usize {
        self.assembler.buffered_len()
    }

    /// Returns true once the underlying stream reported end of file.
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Returns a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Returns a mutable reference to the underlying reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Unwraps this FrameReader, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Writes frames to an async byte stream.
///
/// Each frame is written with a single `write_all`, so frames are never
/// interleaved with partial writes from the same writer.
pub struct FrameWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    /// Creates a new FrameWriter wrapping the given writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes a single frame.
    pub async fn write_frame(&mut self, frame_type: FrameType, payload: &str) -> ProtocolResult<()> {
        let data = encode_frame(frame_type, payload)?;
        self.writer.write_all(&data).await?;
        Ok(())
    }

    /// Writes `value` as a JSON payload.
    pub async fn write_json<T: Serialize>(
        &mut self,
        frame_type: FrameType,
        value: &T,
    ) -> ProtocolResult<()> {
        let data = encode_json_frame(frame_type, value)?;
        self.writer.write_all(&data).await?;
        Ok(())
    }

    /// Flushes the underlying writer.
    pub async fn flush(&mut self) -> ProtocolResult<()> {
        self.writer.flush().await?;
        Ok(())
    }

    /// Flushes and closes the write side of the stream.
    pub async fn shutdown(&mut self) -> ProtocolResult<()> {
        self.writer.shutdown().await?;
        Ok(())
    }

    /// Returns a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Returns a mutable reference to the underlying writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Unwraps this FrameWriter, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
