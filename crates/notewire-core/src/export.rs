//! Rendering note collections for export.
//!
//! Two formats are supported: pretty JSON (two-space indent, the same layout
//! the server uses for its notes file) and a small XML document:
//!
//! ```text
//! <notes>
//!   <note version="1" encrypted="false">
//!     <title>...</title>
//!     <created>...</created>
//!     <tags><tag>...</tag></tags>
//!     <body>...</body>
//!   </note>
//! </notes>
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::note::Note;

/// Export file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Pretty-printed JSON array.
    #[default]
    Json,
    /// XML document with a `<notes>` root.
    Xml,
}

impl ExportFormat {
    /// Guesses the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        ext.parse().ok()
    }

    /// Conventional file extension for the format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            other => Err(format!("unknown export format: {other} (expected json or xml)")),
        }
    }
}

/// Renders `notes` in the given format.
pub fn render_notes(notes: &[Note], format: ExportFormat) -> Result<String, serde_json::Error> {
    match format {
        ExportFormat::Json => render_json(notes),
        ExportFormat::Xml => Ok(render_xml(notes)),
    }
}

/// Renders notes as a pretty JSON array.
pub fn render_json(notes: &[Note]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(notes)
}

/// Renders notes as XML.
pub fn render_xml(notes: &[Note]) -> String {
    let mut out = String::from("<notes>\n");

    for note in notes {
        let tags: String = note
            .tags
            .iter()
            .map(|t| format!("<tag>{}</tag>", xml_escape(t)))
            .collect();

        out.push_str(&format!(
            "  <note version=\"{}\" encrypted=\"{}\">\n",
            note.version, note.encrypted
        ));
        out.push_str(&format!("    <title>{}</title>\n", xml_escape(&note.title)));
        out.push_str(&format!(
            "    <created>{}</created>\n",
            xml_escape(note.created.as_deref().unwrap_or_default())
        ));
        out.push_str(&format!("    <tags>{tags}</tags>\n"));
        out.push_str(&format!("    <body>{}</body>\n", xml_escape(&note.body)));
        out.push_str("  </note>\n");
    }

    out.push_str("</notes>\n");
    out
}

/// Escapes `&`, `<` and `>` for XML text content.
pub fn xml_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}
