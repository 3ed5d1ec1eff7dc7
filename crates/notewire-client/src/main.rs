//! notewire CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::{Level, warn};

use notewire_client::cli::{Cli, Command, ConfigAction};
use notewire_client::commands;
use notewire_client::config::ClientConfig;
use notewire_client::error::{ClientError, ClientResult};
use notewire_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = match cli.command {
        Command::Serve(_) if cli.debug => TracingConfig::server().with_level(Level::DEBUG),
        Command::Serve(_) => TracingConfig::server(),
        _ => TracingConfig::cli(cli.debug),
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: failed to initialize logging: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);
    let config = if cli.config.is_some() {
        ClientConfig::load_from(&config_path).map_err(ClientError::Config)?
    } else {
        ClientConfig::load().unwrap_or_else(|e| {
            warn!(error = %e, "ignoring unreadable configuration");
            ClientConfig::default()
        })
    };

    match cli.command {
        Command::Serve(args) => commands::serve::run(&args, &config.serve).await,
        Command::Fetch(args) => commands::fetch::run(&args, &config).await,
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(&config_path),
        },
    }
}
