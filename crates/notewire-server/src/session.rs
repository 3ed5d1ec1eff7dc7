//! Server side of the record session.
//!
//! A session is one-shot: the server pushes the whole note collection and
//! closes its side. The client never sends anything.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use notewire_core::Note;
use notewire_protocol::{FrameType, FrameWriter, STREAM_END_MESSAGE, STREAM_START_MESSAGE};
use tokio::io::AsyncWrite;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::error::{ServerError, ServerResult};
use crate::socket::Connection;

/// Note collection shared read-only by all connections.
pub type SharedNotes = Arc<[Note]>;

/// Runs `fut` with a deadline, mapping expiry to [`ServerError::Timeout`].
async fn with_timeout<T, F>(timeout: Duration, operation: &str, fut: F) -> ServerResult<T>
where
    F: Future<Output = ServerResult<T>>,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| ServerError::timeout(operation))?
}

/// Streams `notes` to `writer` and closes the write side.
///
/// Frame sequence: one info frame, one record frame per note in collection
/// order, one end-of-stream frame. Each write must finish within `timeout`.
/// Returns the number of notes sent.
pub async fn stream_notes<W>(writer: W, notes: &[Note], timeout: Duration) -> ServerResult<usize>
where
    W: AsyncWrite + Unpin,
{
    let mut writer = FrameWriter::new(writer);

    with_timeout(timeout, "write start frame", async {
        writer
            .write_frame(FrameType::Info, STREAM_START_MESSAGE)
            .await
            .map_err(ServerError::from)
    })
    .await?;

    for note in notes {
        with_timeout(timeout, "write note frame", async {
            writer
                .write_json(FrameType::Record, note)
                .await
                .map_err(ServerError::from)
        })
        .await?;
    }

    with_timeout(timeout, "write end frame", async {
        writer
            .write_frame(FrameType::EndOfStream, STREAM_END_MESSAGE)
            .await
            .map_err(ServerError::from)?;
        writer.shutdown().await.map_err(ServerError::from)
    })
    .await?;

    Ok(notes.len())
}

/// Creates a connection handler for use with [`TcpServer::run`].
///
/// Failures are logged per connection and never reach the accept loop.
///
/// [`TcpServer::run`]: crate::TcpServer::run
pub fn make_connection_handler(
    notes: SharedNotes,
) -> impl Fn(Connection) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync + 'static {
    move |mut conn| {
        let notes = notes.clone();
        let peer = conn.peer_addr();
        let span = info_span!("connection", peer = %peer);
        Box::pin(
            async move {
                let timeout = conn.timeout();
                let start = Instant::now();
                info!("Client connected");

                match stream_notes(conn.stream_mut(), &notes, timeout).await {
                    Ok(sent) => info!(
                        notes = sent,
                        duration_ms = start.elapsed().as_millis() as u64,
                        "Notes streamed"
                    ),
                    Err(e) => warn!(error = %e, "Connection handler error"),
                }
                debug!("Connection closed");
            }
            .instrument(span),
        )
    }
}
