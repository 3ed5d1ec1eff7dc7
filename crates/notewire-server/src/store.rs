//! Notes file storage.
//!
//! The notes file is a JSON array of notes. It is rewritten with every
//! plain-text body encoded the first time the server starts with it, so the
//! file never keeps plain text longer than one startup.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use notewire_core::Note;
use notewire_protocol::{FrameType, ProtocolError, encode_json_frame};
use tracing::{debug, info};

use crate::error::{ServerError, ServerResult};

/// JSON notes file on disk.
#[derive(Debug, Clone)]
pub struct NoteStore {
    path: PathBuf,
}

impl NoteStore {
    /// Creates a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the notes file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads all notes.
    ///
    /// A missing or blank file is an empty collection.
    pub fn load(&self) -> ServerResult<Vec<Note>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "notes file not found, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(ServerError::store(&self.path, format!("failed to read: {e}")));
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| ServerError::store(&self.path, format!("failed to parse: {e}")))
    }

    /// Writes `notes` as indented JSON, replacing the file.
    ///
    /// The content goes to a sibling temporary file first and is renamed
    /// into place.
    pub fn persist(&self, notes: &[Note]) -> ServerResult<()> {
        let json = serde_json::to_string_pretty(notes)
            .map_err(|e| ServerError::store(&self.path, format!("failed to serialize: {e}")))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json)
            .and_then(|()| fs::rename(&tmp, &self.path))
            .map_err(|e| ServerError::store(&self.path, format!("failed to write: {e}")))?;

        debug!(path = %self.path.display(), count = notes.len(), "notes persisted");
        Ok(())
    }
}

/// Encodes every plain-text body with `password`.
///
/// Returns the new collection and whether any note changed. Notes that are
/// already encoded are passed through untouched.
pub fn encode_all_plaintext(notes: &[Note], password: &str) -> ServerResult<(Vec<Note>, bool)> {
    let mut changed = false;
    let mut encoded = Vec::with_capacity(notes.len());

    for (index, note) in notes.iter().enumerate() {
        let mut note = note.clone();
        changed |= note
            .encode_body(password)
            .map_err(|source| ServerError::Encode {
                index,
                title: note.title.clone(),
                source,
            })?;
        encoded.push(note);
    }

    Ok((encoded, changed))
}

/// Checks that every note fits in one record frame.
pub fn check_frame_sizes(notes: &[Note]) -> ServerResult<()> {
    for (index, note) in notes.iter().enumerate() {
        match encode_json_frame(FrameType::Record, note) {
            Ok(_) => {}
            Err(ProtocolError::PayloadTooLarge { size, max }) => {
                return Err(ServerError::NoteTooLarge {
                    index,
                    title: note.title.clone(),
                    size,
                    max,
                });
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Loads the store, encodes plain-text bodies and persists the result.
///
/// The file is only rewritten when at least one note changed. Notes too
/// large to stream fail here, before anything is written.
pub fn prepare_notes(store: &NoteStore, password: &str) -> ServerResult<Vec<Note>> {
    let loaded = store.load()?;
    let (notes, changed) = encode_all_plaintext(&loaded, password)?;
    check_frame_sizes(&notes)?;

    if changed {
        store.persist(&notes)?;
        info!(
            path = %store.path().display(),
            count = notes.len(),
            "encoded plain-text notes"
        );
    }

    info!(count = notes.len(), "notes loaded");
    Ok(notes)
}
