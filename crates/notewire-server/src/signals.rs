//! Shutdown on SIGTERM / SIGINT (Ctrl+C on other platforms).
//!
//! All parties share one `watch` flag that only ever goes from `false` to
//! `true`. Tests and embedders flip it through [`ShutdownHandle::trigger`].

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

/// Cloneable access to the shutdown flag.
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<watch::Sender<bool>>,
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            flag: Arc::new(flag),
        }
    }
}

impl ShutdownHandle {
    /// Requests shutdown. Idempotent.
    pub fn trigger(&self) {
        self.flag.send_replace(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.flag.borrow()
    }

    /// Future resolving once shutdown has been requested.
    pub fn wait(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.flag.subscribe(),
        }
    }
}

/// Pending shutdown notification.
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Resolves when shutdown is requested, immediately if it already was.
    pub async fn wait(mut self) {
        // Err means the flag is gone, which also ends the wait
        let _ = self.rx.wait_for(|&stopped| stopped).await;
    }
}

/// Turns process signals into a shutdown request.
#[derive(Default)]
pub struct SignalHandler {
    handle: ShutdownHandle,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a task that triggers shutdown on the first signal.
    ///
    /// If the signal handlers cannot be installed a warning is logged and
    /// only [`SignalHandler::trigger_shutdown`] stops the server.
    pub fn spawn_listener(&self) {
        let handle = self.handle.clone();
        tokio::spawn(async move {
            if let Some(signal) = next_signal().await {
                info!(signal, "shutting down");
                handle.trigger();
            }
        });
    }

    /// Future resolving once shutdown has been requested.
    pub fn shutdown(&self) -> ShutdownSignal {
        self.handle.wait()
    }

    pub fn is_shutdown(&self) -> bool {
        self.handle.is_shutdown()
    }

    pub fn trigger_shutdown(&self) {
        self.handle.trigger();
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.handle.clone()
    }
}

#[cfg(unix)]
async fn next_signal() -> Option<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let install = |kind: SignalKind| {
        signal(kind)
            .map_err(|e| warn!(error = %e, "failed to install signal handler"))
            .ok()
    };
    let mut term = install(SignalKind::terminate())?;
    let mut int = install(SignalKind::interrupt())?;

    tokio::select! {
        _ = term.recv() => Some("SIGTERM"),
        _ = int.recv() => Some("SIGINT"),
    }
}

#[cfg(not(unix))]
async fn next_signal() -> Option<&'static str> {
    match tokio::signal::ctrl_c().await {
        Ok(()) => Some("Ctrl+C"),
        Err(e) => {
            warn!(error = %e, "failed to listen for Ctrl+C");
            None
        }
    }
}
