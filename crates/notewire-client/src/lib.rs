//! CLI, TCP note client, record session, export
//!
//! This crate provides the `notewire` command-line interface: `serve` runs
//! the note server, `fetch` downloads and decodes notes.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod secret;
pub mod session;
pub mod socket;

pub use cli::Cli;
pub use error::{ClientError, ClientResult, SessionError, SessionResult};
pub use session::{NoteCollector, download};
pub use socket::NoteClient;
