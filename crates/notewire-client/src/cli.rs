//! Command-line interface definition.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use notewire_core::{ExportFormat, NoteEdit};

/// notewire - stream password-obscured notes over TCP
#[derive(Debug, Parser)]
#[command(name = "notewire")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "NOTEWIRE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the note server in the foreground
    Serve(ServeArgs),

    /// Download notes from a server
    Fetch(FetchArgs),

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options for `serve`.
#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// Port to listen on
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Notes file (JSON array)
    #[arg(long, short)]
    pub notes: Option<PathBuf>,

    /// Password used to encode note bodies
    #[arg(long, env = "NOTEWIRE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Per-write timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Maximum concurrent clients
    #[arg(long)]
    pub max_connections: Option<usize>,
}

/// Options for `fetch`.
#[derive(Debug, Default, Args)]
pub struct FetchArgs {
    /// Server host
    #[arg(long, short = 'H')]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Password used to decode note bodies
    #[arg(long, env = "NOTEWIRE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Seconds to wait for the whole stream (0 waits forever)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Only list notes whose title or tags contain this text (exports keep every note)
    #[arg(long, short)]
    pub search: Option<String>,

    /// Position (1-based) of the note to edit, counted after --search
    #[arg(long)]
    pub select: Option<usize>,

    /// Edit the selected note, as field=value (title, created, tags, body)
    #[arg(long, requires = "select", value_parser = parse_edit, action = clap::ArgAction::Append)]
    pub edit: Vec<NoteEdit>,

    /// Write the notes to this file instead of printing them
    #[arg(long, short)]
    pub export: Option<PathBuf>,

    /// Output format (json or xml); defaults to the export file extension
    #[arg(long, short)]
    pub format: Option<ExportFormat>,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}

fn parse_edit(value: &str) -> Result<NoteEdit, String> {
    NoteEdit::parse(value).ok_or_else(|| {
        format!("invalid edit `{value}` (expected title=, created=, tags= or body=)")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_fetch_with_edits() {
        let cli = Cli::try_parse_from([
            "notewire",
            "fetch",
            "--host",
            "10.0.0.2",
            "--search",
            "work",
            "--select",
            "2",
            "--edit",
            "title=Renamed",
            "--edit",
            "tags=a, b",
            "--format",
            "xml",
        ])
        .unwrap();

        let Command::Fetch(args) = cli.command else {
            panic!("expected fetch");
        };
        assert_eq!(args.host.as_deref(), Some("10.0.0.2"));
        assert_eq!(args.select, Some(2));
        assert_eq!(
            args.edit,
            vec![
                NoteEdit::Title("Renamed".into()),
                NoteEdit::Tags(vec!["a".into(), "b".into()]),
            ]
        );
        assert_eq!(args.format, Some(ExportFormat::Xml));
    }

    #[test]
    fn edit_requires_select() {
        let result = Cli::try_parse_from(["notewire", "fetch", "--edit", "title=x"]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_unknown_edit_field() {
        let result =
            Cli::try_parse_from(["notewire", "fetch", "--select", "1", "--edit", "colour=red"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_serve() {
        let cli = Cli::try_parse_from([
            "notewire", "--debug", "serve", "--port", "6000", "--notes", "n.json",
        ])
        .unwrap();
        assert!(cli.debug);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.port, Some(6000));
        assert_eq!(args.notes, Some(PathBuf::from("n.json")));
        assert_eq!(args.bind, None);
    }
}
