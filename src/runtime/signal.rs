//! # OS termination signal handling.
//!
//! [`wait_for_signal`] completes when the process receives a termination
//! signal and classifies it:
//!
//! **Unix**
//! - `SIGINT` (Ctrl-C) → [`Signal::Graceful`]
//! - `SIGHUP` → [`Signal::Graceful`] (tokio installs its own handler, so
//!   hangup is always observed here even where the platform default ignores it)
//! - `SIGTERM` (kill default, systemd/Kubernetes) → [`Signal::Forceful`]
//!
//! **Non-Unix**
//! - Ctrl-C → [`Signal::Graceful`]

use std::io;

/// Classification of a received termination signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Cooperative shutdown: stop applications in reverse order and drain.
    Graceful,
    /// Immediate termination: no draining.
    Forceful,
}

/// Waits for a termination signal and classifies it.
///
/// Each call creates independent signal listeners. Returns `Err` only if
/// listener registration fails.
#[cfg(unix)]
pub async fn wait_for_signal() -> io::Result<Signal> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut hangup = signal(SignalKind::hangup())?;
    let mut terminate = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = interrupt.recv() => Ok(Signal::Graceful),
        _ = hangup.recv() => Ok(Signal::Graceful),
        _ = terminate.recv() => Ok(Signal::Forceful),
    }
}

/// Waits for a termination signal and classifies it.
#[cfg(not(unix))]
pub async fn wait_for_signal() -> io::Result<Signal> {
    tokio::signal::ctrl_c().await?;
    Ok(Signal::Graceful)
}
