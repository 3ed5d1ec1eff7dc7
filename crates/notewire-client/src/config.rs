//! Client configuration.
//!
//! All settings live in a single `config.toml`, by default
//! `~/.config/notewire/config.toml`. Password values support secret
//! references (`env::VAR`, `pass::path`), see [`crate::secret`].

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use notewire_core::ExportFormat;
use notewire_server::{DEFAULT_PASSWORD, DEFAULT_PORT, ServerConfig};
use serde::{Deserialize, Serialize};

/// Configuration for the notewire CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Where `fetch` connects to.
    pub connection: ConnectionSettings,

    /// Settings for `serve`.
    pub serve: ServeSettings,

    /// Export defaults.
    pub export: ExportSettings,
}

/// Connection settings used by `fetch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Server host name or address.
    pub host: String,

    /// Server port.
    pub port: u16,

    /// Password for decoding note bodies.
    pub password: Option<String>,

    /// Seconds to wait for the whole stream; 0 waits forever.
    pub timeout: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            password: None,
            timeout: 10,
        }
    }
}

impl ConnectionSettings {
    /// Returns the receive timeout, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }

    /// Resolves the configured password, falling back to the default one.
    pub fn resolve_password(&self) -> Result<String, String> {
        resolve_password(self.password.as_deref())
    }
}

/// Settings used by `serve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeSettings {
    /// Address to listen on.
    pub bind: IpAddr,

    /// Port to listen on.
    pub port: u16,

    /// Notes file.
    pub notes_path: PathBuf,

    /// Password for encoding note bodies.
    pub password: Option<String>,

    /// Per-write timeout in seconds.
    pub connection_timeout: u64,

    /// Maximum concurrent clients.
    pub max_connections: usize,
}

impl Default for ServeSettings {
    fn default() -> Self {
        let server = ServerConfig::default();
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            notes_path: server.notes_path,
            password: None,
            connection_timeout: server.connection_timeout.as_secs(),
            max_connections: server.max_connections,
        }
    }
}

impl ServeSettings {
    /// Resolves the configured password, falling back to the default one.
    pub fn resolve_password(&self) -> Result<String, String> {
        resolve_password(self.password.as_deref())
    }

    /// Builds the server configuration, resolving the password.
    pub fn to_server_config(&self) -> Result<ServerConfig, String> {
        Ok(ServerConfig::new(SocketAddr::new(self.bind, self.port))
            .with_notes_path(&self.notes_path)
            .with_password(self.resolve_password()?)
            .with_connection_timeout(Duration::from_secs(self.connection_timeout))
            .with_max_connections(self.max_connections))
    }
}

/// Export defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Format used when neither a flag nor the file extension decides.
    pub format: ExportFormat,
}

fn resolve_password(value: Option<&str>) -> Result<String, String> {
    match value {
        Some(raw) => {
            crate::secret::resolve(raw).map_err(|e| format!("failed to resolve password: {}", e))
        }
        None => Ok(DEFAULT_PASSWORD.to_string()),
    }
}

impl ClientConfig {
    /// Loads configuration from the default path.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("notewire")
    }
}
