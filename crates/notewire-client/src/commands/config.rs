//! Configuration commands.

use std::path::Path;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Dump the current configuration to stdout.
pub fn dump(config: &ClientConfig, path: &Path) -> ClientResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", path.display());
    println!("{}", toml_str);

    Ok(())
}

/// Validate the configuration.
///
/// Password references are resolved, so a missing variable or `pass` entry
/// is reported here rather than at connect time.
pub fn validate(config: &ClientConfig) -> ClientResult<()> {
    check(config)?;
    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path(path: &Path) -> ClientResult<()> {
    println!("config: {}", path.display());
    Ok(())
}

fn check(config: &ClientConfig) -> ClientResult<()> {
    if config.connection.host.trim().is_empty() {
        return Err(ClientError::Config("connection.host must not be empty".into()));
    }
    if config.connection.port == 0 {
        return Err(ClientError::Config("connection.port must not be 0".into()));
    }
    if config.serve.max_connections == 0 {
        return Err(ClientError::Config(
            "serve.max_connections must be at least 1".into(),
        ));
    }

    config
        .connection
        .resolve_password()
        .map_err(|e| ClientError::Config(format!("connection.password: {}", e)))?;
    config
        .serve
        .resolve_password()
        .map_err(|e| ClientError::Config(format!("serve.password: {}", e)))?;

    Ok(())
}
