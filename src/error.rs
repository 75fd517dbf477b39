//! Error types used by the service host.
//!
//! - [`AppError`] — errors surfaced by an application's `start`/`stop`.
//!   [`AppError::Closed`] is the sentinel for normal termination: `start`
//!   returning it after `stop` means the application drained cleanly.
//! - [`RuntimeError`] — errors raised by the supervisor itself. Any of these
//!   is fatal for the whole process; the host has no partial-failure mode.
//! - [`DispatchError`] — errors from the producer lookup surface.
//! - [`ConfigError`] — errors from loading the configuration file.
//!
//! Handler faults and backpressure drops are deliberately **not** represented
//! here: they are recovered at their origin and only show up in logs.

use thiserror::Error;

/// # Errors produced by application lifecycle methods.
///
/// Everything except [`AppError::Closed`] is treated as fatal by the
/// supervisor: there is no retry and no partial-failure recovery at the host
/// layer.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum AppError {
    /// Normal termination sentinel: `start` returns this after `stop` has
    /// been invoked and the application finished draining.
    #[error("application closed")]
    Closed,

    /// Transport-level I/O failure (port binding, accept loop, ...).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A database pool failed to open or failed its liveness probe.
    #[error("database pool `{name}`: {cause}")]
    Pool {
        /// Configured backend name.
        name: String,
        /// Underlying driver error.
        cause: anyhow::Error,
    },

    /// Any other application-defined failure.
    #[error("{0}")]
    Other(anyhow::Error),
}

impl AppError {
    /// Returns `true` for the normal-termination sentinel.
    ///
    /// # Example
    /// ```
    /// use apphost::AppError;
    ///
    /// assert!(AppError::Closed.is_closed());
    /// assert!(!AppError::Other(anyhow::anyhow!("boom")).is_closed());
    /// ```
    pub fn is_closed(&self) -> bool {
        matches!(self, AppError::Closed)
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            AppError::Closed => "app_closed",
            AppError::Io(_) => "app_io",
            AppError::Pool { .. } => "app_pool",
            AppError::Other(_) => "app_other",
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Other(err)
    }
}

/// # Errors produced by the supervisor.
///
/// All variants terminate the run; the caller is expected to log the cause
/// and exit the process with a failure code.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// An application's `start` returned a non-sentinel error.
    #[error("failed to start application `{app}`: {source}")]
    StartFailed {
        /// Application name.
        app: String,
        /// The error returned by `start`.
        source: AppError,
    },

    /// An application's `stop` returned an error during graceful shutdown.
    #[error("failed to stop application `{app}`: {source}")]
    StopFailed {
        /// Application name.
        app: String,
        /// The error returned by `stop`.
        source: AppError,
    },

    /// A spawned `start` task panicked instead of returning.
    #[error("application task panicked: {detail}")]
    StartPanicked {
        /// Join error description.
        detail: String,
    },

    /// A forceful termination signal was received; the host exits without
    /// draining anything.
    #[error("forceful termination signal received; exiting without draining")]
    ForcedExit,

    /// Registering the OS signal listeners failed.
    #[error("signal listener failed: {0}")]
    Signal(#[from] std::io::Error),
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::StartFailed { .. } => "runtime_start_failed",
            RuntimeError::StopFailed { .. } => "runtime_stop_failed",
            RuntimeError::StartPanicked { .. } => "runtime_start_panicked",
            RuntimeError::ForcedExit => "runtime_forced_exit",
            RuntimeError::Signal(_) => "runtime_signal",
        }
    }
}

/// Errors from [`dispatch`](crate::dispatch::dispatch), the producer-facing
/// lookup-and-publish surface.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DispatchError {
    /// No event manager is registered under the payload's event alias.
    #[error("event manager not found for alias `{0}`")]
    ManagerNotFound(String),
}

/// Errors from loading the configuration file.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The file could not be parsed as YAML.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}
