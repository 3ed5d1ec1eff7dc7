//! Server configuration.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Port the server listens on when none is given.
pub const DEFAULT_PORT: u16 = 5000;

/// Password used when none is given.
pub const DEFAULT_PASSWORD: &str = "secret";

/// Server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind_addr: SocketAddr,

    /// Path to the notes file.
    pub notes_path: PathBuf,

    /// Password for the keystream transform.
    pub password: String,

    /// Timeout for each write to a client.
    pub connection_timeout: Duration,

    /// Maximum concurrent connections.
    pub max_connections: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            notes_path: PathBuf::from("notes.json"),
            password: DEFAULT_PASSWORD.to_string(),
            connection_timeout: Duration::from_secs(30),
            max_connections: 100,
        }
    }
}

// The password is never printed.
impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("notes_path", &self.notes_path)
            .field("password", &"<redacted>")
            .field("connection_timeout", &self.connection_timeout)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl ServerConfig {
    /// Creates a new server configuration listening on `bind_addr`.
    pub fn new(bind_addr: impl Into<SocketAddr>) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            ..Default::default()
        }
    }

    /// Builder: set the port, keeping the bind IP.
    pub fn with_port(mut self, port: u16) -> Self {
        self.bind_addr.set_port(port);
        self
    }

    /// Builder: set the notes file path.
    pub fn with_notes_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.notes_path = path.into();
        self
    }

    /// Builder: set the password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Builder: set connection timeout.
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Builder: set max connections.
    pub fn with_max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }
}
