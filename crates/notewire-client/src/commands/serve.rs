//! Serve command: runs the note server in the foreground.
//!
//! Startup encodes any plain-text note bodies in the notes file, then the
//! listener streams the collection to every client until SIGINT or SIGTERM.

use notewire_server::{
    NoteStore, ServerConfig, SignalHandler, TcpServer, make_connection_handler, prepare_notes,
};
use tracing::info;

use crate::cli::ServeArgs;
use crate::config::ServeSettings;
use crate::error::{ClientError, ClientResult};

/// Merges command-line flags over the `[serve]` settings.
///
/// A password given as a flag may also be a secret reference.
pub fn build_server_config(args: &ServeArgs, settings: &ServeSettings) -> ClientResult<ServerConfig> {
    let merged = ServeSettings {
        bind: args.bind.unwrap_or(settings.bind),
        port: args.port.unwrap_or(settings.port),
        notes_path: args
            .notes
            .clone()
            .unwrap_or_else(|| settings.notes_path.clone()),
        password: args.password.clone().or_else(|| settings.password.clone()),
        connection_timeout: args.timeout.unwrap_or(settings.connection_timeout),
        max_connections: args.max_connections.unwrap_or(settings.max_connections),
    };

    merged.to_server_config().map_err(ClientError::Config)
}

/// Starts the server and blocks until a shutdown signal arrives.
pub async fn run(args: &ServeArgs, settings: &ServeSettings) -> ClientResult<()> {
    let config = build_server_config(args, settings)?;
    info!(config = ?config, "Starting notes server");

    let store = NoteStore::new(&config.notes_path);
    let notes = prepare_notes(&store, &config.password)?;

    let signal_handler = SignalHandler::new();
    signal_handler.spawn_listener();

    let server = TcpServer::bind(config).await?;
    let handler = make_connection_handler(notes.into());

    server
        .run_until_shutdown(handler, signal_handler.shutdown().wait())
        .await?;

    info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn settings_used_without_flags() {
        let settings = ServeSettings {
            port: 6001,
            password: Some("from-config".into()),
            ..Default::default()
        };

        let config = build_server_config(&ServeArgs::default(), &settings).unwrap();
        assert_eq!(config.bind_addr.port(), 6001);
        assert!(config.bind_addr.ip().is_unspecified());
        assert_eq!(config.password, "from-config");
        assert_eq!(config.notes_path, PathBuf::from("notes.json"));
        assert_eq!(config.connection_timeout, Duration::from_secs(30));
    }

    #[test]
    fn flags_override_settings() {
        let settings = ServeSettings {
            password: Some("env::_NOTEWIRE_SERVE_TEST_UNSET".into()),
            ..Default::default()
        };
        let args = ServeArgs {
            bind: Some("127.0.0.1".parse().unwrap()),
            port: Some(7001),
            notes: Some(PathBuf::from("/tmp/other.json")),
            password: Some("flag".into()),
            timeout: Some(2),
            max_connections: Some(3),
        };

        // The flag wins, so the unresolvable reference is never looked at
        let config = build_server_config(&args, &settings).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:7001".parse().unwrap());
        assert_eq!(config.notes_path, PathBuf::from("/tmp/other.json"));
        assert_eq!(config.password, "flag");
        assert_eq!(config.connection_timeout, Duration::from_secs(2));
        assert_eq!(config.max_connections, 3);
    }

    #[test]
    fn default_password_when_unset() {
        let config = build_server_config(&ServeArgs::default(), &ServeSettings::default()).unwrap();
        assert_eq!(config.password, notewire_server::DEFAULT_PASSWORD);
    }
}
