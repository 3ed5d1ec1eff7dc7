//! TCP client for the note server.

use std::time::Duration;

use notewire_core::Note;
use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::error::{ClientError, ClientResult};
use crate::session;

/// Client downloading notes from a server.
#[derive(Debug, Clone)]
pub struct NoteClient {
    host: String,
    port: u16,
    timeout: Option<Duration>,
}

impl NoteClient {
    /// Creates a client for `host:port`.
    ///
    /// `timeout` bounds both connecting and receiving the whole stream.
    pub fn new(host: impl Into<String>, port: u16, timeout: Option<Duration>) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Returns `host:port`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Opens a connection to the server.
    pub async fn connect(&self) -> ClientResult<TcpStream> {
        let addr = self.address();
        debug!(addr = %addr, "connecting to server");

        let connect = TcpStream::connect((self.host.as_str(), self.port));
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, connect).await.map_err(|_| {
                ClientError::Connection(format!(
                    "connection to {} timed out after {}s",
                    addr,
                    limit.as_secs()
                ))
            })?,
            None => connect.await,
        };

        result.map_err(|e| ClientError::Connection(format!("failed to connect to {}: {}", addr, e)))
    }

    /// Connects and downloads every note, decoding bodies with `password`.
    pub async fn fetch(&self, password: &str) -> ClientResult<Vec<Note>> {
        let stream = self.connect().await?;
        let notes = session::download(stream, password, self.timeout).await?;
        info!(addr = %self.address(), count = notes.len(), "notes downloaded");
        Ok(notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SessionError;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    #[test]
    fn address_format() {
        let client = NoteClient::new("localhost", 5000, None);
        assert_eq!(client.address(), "localhost:5000");
        assert_eq!(client.timeout(), None);
    }

    #[tokio::test]
    async fn connection_refused() {
        // Grab a free port, then close the listener so nothing accepts on it
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = NoteClient::new("127.0.0.1", port, Some(Duration::from_secs(2)));
        let err = client.fetch("secret").await.unwrap_err();
        assert!(matches!(err, ClientError::Connection(_)));
    }

    #[tokio::test]
    async fn server_closing_early() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let start = notewire_protocol::encode_frame(
                notewire_protocol::FrameType::Info,
                notewire_protocol::STREAM_START_MESSAGE,
            )
            .unwrap();
            stream.write_all(&start).await.unwrap();
            stream.shutdown().await.unwrap();
        });

        let client = NoteClient::new("127.0.0.1", port, Some(Duration::from_secs(2)));
        let err = client.fetch("secret").await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Session(SessionError::StreamTerminatedEarly { received: 0 })
        ));
    }
}
