//! Note record model.
//!
//! A [`Note`] is the unit stored by the server and streamed to clients. The
//! `body` is either plain text (`encrypted == false`) or the hex output of
//! the keystream transform (`encrypted == true`).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::cipher::{self, CipherError};

/// Returns the default note version.
pub fn default_version() -> u32 {
    1
}

/// Reads `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single note.
///
/// Keys not modelled here are kept in `extra` and written back unchanged,
/// so rewriting a notes file never drops data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Note title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// Creation timestamp, free-form text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    /// Tags, in display order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,

    /// Body text, encoded when `encrypted` is set.
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,

    /// Whether `body` holds keystream-encoded hex.
    #[serde(default, deserialize_with = "null_as_default")]
    pub encrypted: bool,

    /// Note format version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Unrecognised keys from the source document.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Note {
    fn default() -> Self {
        Self {
            title: String::new(),
            created: None,
            tags: Vec::new(),
            body: String::new(),
            encrypted: false,
            version: default_version(),
            extra: Map::new(),
        }
    }
}

impl Note {
    /// Creates a plain-text note.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            ..Default::default()
        }
    }

    /// Builder: set the creation timestamp.
    pub fn with_created(mut self, created: impl Into<String>) -> Self {
        self.created = Some(created.into());
        self
    }

    /// Builder: set the tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Encodes a plain-text body in place.
    ///
    /// Returns `true` if the note changed, `false` if it was already encoded.
    pub fn encode_body(&mut self, password: &str) -> Result<bool, CipherError> {
        if self.encrypted {
            return Ok(false);
        }
        self.body = cipher::encode(&self.body, password)?;
        self.encrypted = true;
        Ok(true)
    }

    /// Decodes an encoded body in place.
    ///
    /// Returns `true` if the note changed, `false` if it was already plain.
    pub fn decode_body(&mut self, password: &str) -> Result<bool, CipherError> {
        if !self.encrypted {
            return Ok(false);
        }
        self.body = cipher::decode(&self.body, password)?;
        self.encrypted = false;
        Ok(true)
    }

    /// Applies a single-field edit.
    ///
    /// Edits are stored as given; an encoded body is not re-encoded here.
    pub fn apply_edit(&mut self, edit: NoteEdit) {
        match edit {
            NoteEdit::Title(title) => self.title = title,
            NoteEdit::Created(created) => self.created = Some(created),
            NoteEdit::Tags(tags) => self.tags = tags,
            NoteEdit::Body(body) => self.body = body,
        }
    }
}

/// A single-field edit coming from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteEdit {
    Title(String),
    Created(String),
    Tags(Vec<String>),
    Body(String),
}

impl NoteEdit {
    /// Parses a `field=value` pair as used on the command line.
    ///
    /// Tags are comma separated; surrounding whitespace is trimmed and empty
    /// entries dropped.
    pub fn parse(input: &str) -> Option<Self> {
        let (field, value) = input.split_once('=')?;
        match field.trim() {
            "title" => Some(Self::Title(value.to_string())),
            "created" => Some(Self::Created(value.to_string())),
            "body" => Some(Self::Body(value.to_string())),
            "tags" => Some(Self::Tags(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
            _ => None,
        }
    }
}

/// Case-insensitive search over titles and tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    query: String,
}

impl NoteFilter {
    /// Creates a filter for `query`.
    pub fn new(query: impl AsRef<str>) -> Self {
        Self {
            query: query.as_ref().to_lowercase(),
        }
    }

    /// Returns true if the title or any tag contains the query.
    ///
    /// An empty query matches every note.
    pub fn matches(&self, note: &Note) -> bool {
        note.title.to_lowercase().contains(&self.query)
            || note
                .tags
                .iter()
                .any(|t| t.to_lowercase().contains(&self.query))
    }

    /// Returns the matching notes, keeping their order.
    pub fn apply<'a>(&self, notes: &'a [Note]) -> Vec<&'a Note> {
        notes.iter().filter(|n| self.matches(n)).collect()
    }
}
