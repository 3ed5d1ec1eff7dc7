//! Core types: notes, keystream cipher, export rendering, tracing

pub mod cipher;
pub mod export;
pub mod note;
pub mod tracing;

pub use cipher::{CipherError, decode, derive_base_key, encode};
pub use export::{ExportFormat, render_json, render_notes, render_xml, xml_escape};
pub use note::{Note, NoteEdit, NoteFilter, default_version};
pub use self::tracing::{LogFormat, TracingConfig, TracingError, init_tracing};
