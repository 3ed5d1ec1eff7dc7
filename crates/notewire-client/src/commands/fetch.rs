//! Fetch command: downloads notes and prints or exports them.

use std::fmt::Write as _;
use std::path::Path;

use notewire_core::{ExportFormat, Note, NoteEdit, NoteFilter, render_notes};
use tracing::{debug, info};

use crate::cli::FetchArgs;
use crate::config::{ClientConfig, ConnectionSettings};
use crate::error::{ClientError, ClientResult};
use crate::socket::NoteClient;

/// Downloads notes and prints or exports them.
pub async fn run(args: &FetchArgs, config: &ClientConfig) -> ClientResult<()> {
    let settings = ConnectionSettings {
        password: args.password.clone().or_else(|| config.connection.password.clone()),
        ..config.connection.clone()
    };
    let password = settings.resolve_password().map_err(ClientError::Config)?;

    let client = client_for(args, config);
    let mut notes = client.fetch(&password).await?;

    let search = args.search.as_deref();
    if let Some(position) = args.select {
        edit_selected(&mut notes, search, position, &args.edit)?;
    }

    match &args.export {
        Some(path) => {
            let format = export_format(args.format, path, config.export.format);
            write_export(path, &notes, format)?;
            println!("Exported {} notes to {}", notes.len(), path.display());
        }
        None => {
            let shown = search_notes(notes, search);
            match args.format {
                Some(format) => print!("{}", render(&shown, format)?),
                None => print!("{}", render_listing(&shown)),
            }
        }
    }

    Ok(())
}

/// Builds the client from flags over the `[connection]` settings.
pub fn client_for(args: &FetchArgs, config: &ClientConfig) -> NoteClient {
    let settings = &config.connection;
    let host = args.host.clone().unwrap_or_else(|| settings.host.clone());
    let port = args.port.unwrap_or(settings.port);
    let timeout = match args.timeout {
        Some(0) => None,
        Some(secs) => Some(std::time::Duration::from_secs(secs)),
        None => settings.timeout(),
    };

    NoteClient::new(host, port, timeout)
}

/// Keeps the notes matching `search`, in order.
pub fn search_notes(notes: Vec<Note>, search: Option<&str>) -> Vec<Note> {
    match search {
        Some(query) => {
            let filter = NoteFilter::new(query);
            notes.into_iter().filter(|n| filter.matches(n)).collect()
        }
        None => notes,
    }
}

/// Applies `edits` to one note of the full collection.
///
/// `position` is 1-based and counts only the notes matching `search`, so it
/// refers to the same note the filtered listing shows at that position.
pub fn edit_selected(
    notes: &mut [Note],
    search: Option<&str>,
    position: usize,
    edits: &[NoteEdit],
) -> ClientResult<()> {
    let filter = search.map(NoteFilter::new).unwrap_or_default();
    let shown = notes.iter().filter(|n| filter.matches(n)).count();

    let note = position
        .checked_sub(1)
        .and_then(|i| notes.iter_mut().filter(|n| filter.matches(n)).nth(i))
        .ok_or_else(|| {
            ClientError::Config(format!("no note at position {position} ({shown} shown)"))
        })?;

    for edit in edits {
        debug!(title = %note.title, edit = ?edit, "applying edit");
        note.apply_edit(edit.clone());
    }
    Ok(())
}

/// Picks the export format: flag, then file extension, then config.
pub fn export_format(flag: Option<ExportFormat>, path: &Path, fallback: ExportFormat) -> ExportFormat {
    flag.or_else(|| ExportFormat::from_path(path))
        .unwrap_or(fallback)
}

/// Writes `notes` to `path` in `format`.
pub fn write_export(path: &Path, notes: &[Note], format: ExportFormat) -> ClientResult<()> {
    let content = render(notes, format)?;
    std::fs::write(path, content)
        .map_err(|e| ClientError::Export(format!("cannot write {}: {}", path.display(), e)))?;
    info!(path = %path.display(), format = %format, count = notes.len(), "notes exported");
    Ok(())
}

fn render(notes: &[Note], format: ExportFormat) -> ClientResult<String> {
    render_notes(notes, format)
        .map_err(|e| ClientError::Export(format!("cannot render {}: {}", format, e)))
}

/// Renders a human-readable listing.
pub fn render_listing(notes: &[Note]) -> String {
    if notes.is_empty() {
        return "No notes\n".to_string();
    }

    let mut out = String::new();
    for (i, note) in notes.iter().enumerate() {
        let _ = write!(out, "{}. {}", i + 1, note.title);
        if let Some(created) = &note.created {
            let _ = write!(out, " ({created})");
        }
        if !note.tags.is_empty() {
            let _ = write!(out, " [{}]", note.tags.join(", "));
        }
        out.push('\n');
        for line in note.body.lines() {
            let _ = writeln!(out, "   {line}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::tempdir;

    fn sample() -> Vec<Note> {
        vec![
            Note::new("Groceries", "milk\neggs").with_tags(["home"]),
            Note::new("Standup", "blockers").with_tags(["work", "daily"]),
            Note::new("Retro", "went well").with_created("2024-05-01").with_tags(["Work"]),
        ]
    }

    #[test]
    fn search_keeps_order() {
        let notes = search_notes(sample(), Some("work"));
        let titles: Vec<_> = notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["Standup", "Retro"]);

        assert_eq!(search_notes(sample(), None), sample());
    }

    #[test]
    fn edits_apply_to_selected_note_only() {
        let edits = [
            NoteEdit::Title("Retrospective".into()),
            NoteEdit::Tags(vec!["team".into()]),
        ];
        let mut notes = sample();
        edit_selected(&mut notes, Some("work"), 2, &edits).unwrap();

        // Position counts matches only, the collection stays whole
        assert_eq!(notes.len(), 3);
        assert_eq!(notes[0].title, "Groceries");
        assert_eq!(notes[1].title, "Standup");
        assert_eq!(notes[2].title, "Retrospective");
        assert_eq!(notes[2].tags, vec!["team"]);
        assert_eq!(notes[2].created.as_deref(), Some("2024-05-01"));
    }

    #[test]
    fn select_without_search_counts_every_note() {
        let mut notes = sample();
        edit_selected(&mut notes, None, 1, &[NoteEdit::Body("bread".into())]).unwrap();
        assert_eq!(notes[0].body, "bread");
    }

    #[test]
    fn select_out_of_range() {
        let mut notes = sample();
        let err = edit_selected(&mut notes, None, 4, &[]).unwrap_err();
        assert!(err.to_string().contains("no note at position 4 (3 shown)"));

        let err = edit_selected(&mut notes, Some("work"), 3, &[]).unwrap_err();
        assert!(err.to_string().contains("no note at position 3 (2 shown)"));

        assert!(edit_selected(&mut notes, None, 0, &[]).is_err());
        assert_eq!(notes, sample());
    }

    #[test]
    fn export_format_precedence() {
        let xml = PathBuf::from("out.xml");
        let other = PathBuf::from("out.txt");

        assert_eq!(
            export_format(Some(ExportFormat::Json), &xml, ExportFormat::Json),
            ExportFormat::Json
        );
        assert_eq!(export_format(None, &xml, ExportFormat::Json), ExportFormat::Xml);
        assert_eq!(export_format(None, &other, ExportFormat::Xml), ExportFormat::Xml);
    }

    #[test]
    fn write_export_files() {
        let dir = tempdir().unwrap();
        let notes = sample();

        let json_path = dir.path().join("notes.json");
        write_export(&json_path, &notes, ExportFormat::Json).unwrap();
        let back: Vec<Note> =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(back, notes);

        let xml_path = dir.path().join("notes.xml");
        write_export(&xml_path, &notes, ExportFormat::Xml).unwrap();
        let xml = std::fs::read_to_string(&xml_path).unwrap();
        assert!(xml.starts_with("<notes>\n"));
        assert_eq!(xml.matches("<note ").count(), 3);
    }

    #[test]
    fn write_export_to_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("notes.json");
        let err = write_export(&path, &sample(), ExportFormat::Json).unwrap_err();
        assert!(matches!(err, ClientError::Export(_)));
    }

    #[test]
    fn listing_layout() {
        let listing = render_listing(&sample()[..1]);
        assert_eq!(listing, "1. Groceries [home]\n   milk\n   eggs\n");

        let listing = render_listing(&sample()[2..]);
        assert_eq!(listing, "1. Retro (2024-05-01) [Work]\n   went well\n");

        assert_eq!(render_listing(&[]), "No notes\n");
    }

    #[test]
    fn flags_override_connection_settings() {
        let config = ClientConfig::default();

        let args = FetchArgs {
            host: Some("notes.local".into()),
            port: Some(6100),
            timeout: Some(0),
            ..Default::default()
        };
        let client = client_for(&args, &config);
        assert_eq!(client.address(), "notes.local:6100");
        assert_eq!(client.timeout(), None);

        let client = client_for(&FetchArgs::default(), &config);
        assert_eq!(client.address(), "127.0.0.1:5000");
        assert_eq!(client.timeout(), Some(Duration::from_secs(10)));
    }
}
