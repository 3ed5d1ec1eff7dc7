//! Note server: note store, TCP listener, record streaming.
//!
//! On startup the server loads its notes file, encodes every plain-text body
//! with the keystream transform and writes the file back. Every client that
//! connects then receives the whole collection as a frame stream:
//!
//! ```text
//! [0x02 "START_NOTES_STREAM"] [0x01 note]* [0xFF "END"] <close>
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use notewire_server::{NoteStore, ServerConfig, TcpServer, make_connection_handler, prepare_notes};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default();
//!     let notes = prepare_notes(&NoteStore::new(&config.notes_path), &config.password)?;
//!     let server = TcpServer::bind(config.clone()).await?;
//!
//!     server
//!         .run(make_connection_handler(notes.into()))
//!         .await?;
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod session;
mod signals;
mod socket;
mod store;

pub use config::{DEFAULT_PASSWORD, DEFAULT_PORT, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use session::{SharedNotes, make_connection_handler, stream_notes};
pub use signals::{ShutdownHandle, ShutdownSignal, SignalHandler};
pub use socket::{Connection, TcpServer};
pub use store::{NoteStore, check_frame_sizes, encode_all_plaintext, prepare_notes};
