//! # Application lifecycle capability.
//!
//! Every supervised service implements [`Application`]:
//!
//! ```text
//! constructed ──► start() ── blocks until stopped ──► Err(AppError::Closed)
//!                    ▲                                        │
//!                    └──────────── stop() triggers ───────────┘
//! ```
//!
//! `start` is invoked exactly once and suspends until asked to stop; `stop`
//! is invoked exactly once and causes `start` to return the closed sentinel.
//! Implementations model the "run until stopped" seam as a
//! [`CancellationToken`](tokio_util::sync::CancellationToken) created at
//! construction: `start` awaits it after setup, `stop` cancels it.

use async_trait::async_trait;

use crate::error::AppError;

/// Long-running service with a start/stop lifecycle.
///
/// Any `start`/`stop` error other than [`AppError::Closed`] is process-fatal:
/// the supervisor tears the whole host down, there is no partial-failure
/// recovery at this layer.
#[async_trait]
pub trait Application: Send + Sync + 'static {
    /// Stable application name, for logs and error reporting.
    fn name(&self) -> &str;

    /// Performs setup and blocks until [`stop`](Application::stop) is called,
    /// then returns [`AppError::Closed`].
    async fn start(&self) -> Result<(), AppError>;

    /// Signals `start` to return, draining whatever the variant drains.
    async fn stop(&self) -> Result<(), AppError>;
}
