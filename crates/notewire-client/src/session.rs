//! Client side of the record session.
//!
//! The server pushes an info frame, one record frame per note and an
//! end-of-stream frame, then closes. The client only reads.

use std::io;
use std::time::Duration;

use notewire_core::Note;
use notewire_protocol::{Frame, FrameReader, FrameType, ProtocolError};
use tokio::io::AsyncRead;
use tracing::{debug, trace, warn};

use crate::error::{SessionError, SessionResult};

/// Collects notes from frames as they arrive.
///
/// Encoded bodies are decoded with the session password before the note is
/// stored, so every collected note has `encrypted == false`.
#[derive(Debug)]
pub struct NoteCollector {
    password: String,
    notes: Vec<Note>,
    finished: bool,
}

impl NoteCollector {
    /// Creates a collector decoding bodies with `password`.
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            notes: Vec::new(),
            finished: false,
        }
    }

    /// Handles one frame.
    ///
    /// Frames after the end-of-stream frame are ignored.
    pub fn on_frame(&mut self, frame: Frame) -> SessionResult<()> {
        if self.finished {
            trace!(frame_type = %frame.frame_type, "frame after end of stream ignored");
            return Ok(());
        }

        match frame.frame_type {
            FrameType::Record => {
                let mut note: Note = serde_json::from_str(&frame.payload)
                    .map_err(SessionError::MalformedFramePayload)?;
                note.decode_body(&self.password).map_err(|source| {
                    SessionError::MalformedCiphertext {
                        title: note.title.clone(),
                        source,
                    }
                })?;
                debug!(title = %note.title, "note received");
                self.notes.push(note);
            }
            FrameType::Info => debug!(message = %frame.payload, "server info"),
            FrameType::Error => warn!(message = %frame.payload, "server reported an error"),
            FrameType::EndOfStream => {
                debug!(notes = self.notes.len(), "end of stream");
                self.finished = true;
            }
            FrameType::Unknown(code) => {
                debug!(code, len = frame.payload.len(), "unknown frame type skipped");
            }
        }

        Ok(())
    }

    /// Returns true once the end-of-stream frame was seen.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Notes collected so far.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Number of notes collected so far.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Returns true if no note was collected yet.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Consumes the collector, returning the notes.
    pub fn into_notes(self) -> Vec<Note> {
        self.notes
    }
}

fn transport_error(err: ProtocolError) -> SessionError {
    match err {
        ProtocolError::Io(e) => SessionError::Transport(e),
        other => SessionError::Transport(io::Error::new(io::ErrorKind::InvalidData, other)),
    }
}

async fn receive<R>(reader: &mut FrameReader<R>, collector: &mut NoteCollector) -> SessionResult<()>
where
    R: AsyncRead + Unpin,
{
    while !collector.is_finished() {
        match reader.read_frame().await.map_err(transport_error)? {
            Some(frame) => collector.on_frame(frame)?,
            None => {
                debug!(
                    buffered = reader.buffered_len(),
                    received = collector.len(),
                    "connection closed before end of stream"
                );
                return Err(SessionError::StreamTerminatedEarly {
                    received: collector.len(),
                });
            }
        }
    }
    Ok(())
}

/// Receives the whole note stream from `stream`.
///
/// Returns once the end-of-stream frame arrives; the stream is dropped,
/// closing the connection. With a `timeout`, the end frame must arrive
/// within it. No partial result is returned on failure.
pub async fn download<R>(
    stream: R,
    password: &str,
    timeout: Option<Duration>,
) -> SessionResult<Vec<Note>>
where
    R: AsyncRead + Unpin,
{
    let mut reader = FrameReader::new(stream);
    let mut collector = NoteCollector::new(password);

    let outcome = match timeout {
        Some(limit) => tokio::time::timeout(limit, receive(&mut reader, &mut collector))
            .await
            .ok(),
        None => Some(receive(&mut reader, &mut collector).await),
    };
    drop(reader);

    match outcome {
        Some(result) => result?,
        None => {
            debug!(received = collector.len(), "note stream timed out");
            return Err(SessionError::StreamTerminatedEarly {
                received: collector.len(),
            });
        }
    }

    Ok(collector.into_notes())
}
