//! Logging bootstrap for the notewire binary.
//!
//! Interactive commands (`fetch`, `config`) write short lines to stderr and
//! stay quiet below WARN. `serve` emits one JSON object per event, with
//! connection spans, for collection by a supervisor. `RUST_LOG` wins over
//! the profile level unless a filter was set explicitly.
//!
//! ```ignore
//! use notewire_core::tracing::{TracingConfig, init_tracing};
//!
//! init_tracing(TracingConfig::server())?;
//! ```

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Crate prefix matched by the default filter directive.
const TARGET_PREFIX: &str = "notewire";

/// Errors from [`init_tracing`].
#[derive(Debug, Error)]
pub enum TracingError {
    /// A global subscriber was already installed.
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// The explicit filter directive did not parse.
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
}

/// How events are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Single human-readable line per event.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

/// Subscriber settings.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level for notewire targets when no filter applies.
    pub level: Level,
    pub format: LogFormat,
    /// Source file and line on every event.
    pub with_location: bool,
    /// Module path on every event.
    pub with_target: bool,
    pub with_timestamp: bool,
    /// Log span open/close (used for per-connection spans).
    pub with_span_events: bool,
    /// Explicit filter directive, overrides `RUST_LOG` and `level`.
    pub filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::cli(false)
    }
}

impl TracingConfig {
    /// Profile for interactive commands.
    ///
    /// Warnings only; `debug` raises the level and adds locations.
    #[must_use]
    pub fn cli(debug: bool) -> Self {
        Self {
            level: if debug { Level::DEBUG } else { Level::WARN },
            format: LogFormat::Compact,
            with_location: debug,
            with_target: debug,
            with_timestamp: false,
            with_span_events: false,
            filter: None,
        }
    }

    /// Profile for the long-running server.
    #[must_use]
    pub fn server() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Json,
            with_location: true,
            with_target: true,
            with_timestamp: true,
            with_span_events: true,
            filter: None,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets an explicit filter directive such as `notewire_server=trace`.
    #[must_use]
    pub fn with_filter(mut self, directive: impl Into<String>) -> Self {
        self.filter = Some(directive.into());
        self
    }

    /// Directive used when neither `filter` nor `RUST_LOG` is set.
    pub fn default_directive(&self) -> String {
        format!("{TARGET_PREFIX}={}", self.level)
    }

    fn env_filter(&self) -> Result<EnvFilter, TracingError> {
        match &self.filter {
            Some(directive) => Ok(EnvFilter::try_new(directive)?),
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.default_directive()))),
        }
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let spans = if self.with_span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_file(self.with_location)
            .with_line_number(self.with_location)
            .with_target(self.with_target)
            .with_span_events(spans);

        match (self.format, self.with_timestamp) {
            (LogFormat::Json, true) => layer.json().boxed(),
            (LogFormat::Json, false) => layer.json().without_time().boxed(),
            (LogFormat::Compact, true) => layer.compact().boxed(),
            (LogFormat::Compact, false) => layer.compact().without_time().boxed(),
        }
    }
}

/// Installs the global subscriber.
///
/// Call once at startup.
///
/// # Errors
///
/// Fails if a subscriber is already installed or the explicit filter is
/// invalid.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let subscriber = tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(config.env_filter()?);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
