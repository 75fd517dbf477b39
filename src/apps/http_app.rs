//! # HTTP-serving application.
//!
//! Wraps an [`axum::Router`] in the host lifecycle: `start` binds and serves
//! until stopped or a fatal transport error occurs; `stop` triggers graceful
//! shutdown and waits up to a configured budget for in-flight requests to
//! drain, then force-closes.
//!
//! Routing, middleware, compression and the like belong to the router the
//! caller supplies — this type only owns the lifecycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::apps::Application;
use crate::error::AppError;

const DEFAULT_CLOSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Application serving an axum router until stopped.
pub struct HttpApp {
    name: String,
    addr: String,
    close_timeout: Duration,
    router: Router,
    stop: CancellationToken,
    /// Signalled once the serve loop has fully drained and returned.
    drained: Notify,
    finished: AtomicBool,
}

impl HttpApp {
    /// Creates the application; the listener is bound when `start` runs.
    pub fn new(name: impl Into<String>, addr: impl Into<String>, router: Router) -> Self {
        Self {
            name: name.into(),
            addr: addr.into(),
            close_timeout: DEFAULT_CLOSE_TIMEOUT,
            router,
            stop: CancellationToken::new(),
            drained: Notify::new(),
            finished: AtomicBool::new(false),
        }
    }

    /// Sets the graceful-drain budget used by `stop`.
    pub fn with_close_timeout(mut self, close_timeout: Duration) -> Self {
        self.close_timeout = close_timeout;
        self
    }
}

#[async_trait]
impl Application for HttpApp {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&self) -> Result<(), AppError> {
        let listener = TcpListener::bind(&self.addr).await?;
        info!(app = %self.name, addr = %self.addr, "http server listening");

        let shutdown = self.stop.clone();
        let served = axum::serve(listener, self.router.clone())
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await;

        self.finished.store(true, Ordering::SeqCst);
        self.drained.notify_waiters();
        // A transport error before shutdown is fatal; a clean return only
        // happens after graceful shutdown completed.
        served?;
        Err(AppError::Closed)
    }

    async fn stop(&self) -> Result<(), AppError> {
        let drained = self.drained.notified();
        tokio::pin!(drained);
        drained.as_mut().enable();

        self.stop.cancel();
        if self.finished.load(Ordering::SeqCst) {
            return Ok(());
        }
        if tokio::time::timeout(self.close_timeout, drained).await.is_err() {
            warn!(
                app = %self.name,
                timeout = ?self.close_timeout,
                "drain budget elapsed; closing with requests in flight"
            );
        }
        Ok(())
    }
}
