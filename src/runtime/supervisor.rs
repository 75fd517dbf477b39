//! # Supervisor: concurrent start, ordered stop.
//!
//! The [`Supervisor`] owns the ordered application list and drives the whole
//! process lifecycle:
//!
//! ```text
//! idle ──► starting ─────► running ─────► stopping ─────► stopped
//!          │                 │               │
//!          │ spawn start()   │ await OS      │ graceful: stop() apps in
//!          │ per app into    │ signal (or    │ reverse start order,
//!          │ a JoinSet       │ all tasks     │ sequentially, then join
//!          │                 │ finishing)    │ every start task
//!          │                 │               │ forceful: return at once,
//!          │                 │               │ nothing drained
//! ```
//!
//! Failure policy: an early `start` return that is not the closed sentinel is
//! fatal, as is any `stop` error — the host has no partial-failure state. A
//! `start` task that finishes cleanly on its own is logged and tolerated.

use std::future::Future;
use std::io;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{error, info};

use crate::apps::Application;
use crate::error::{AppError, RuntimeError};
use crate::runtime::signal::{self, Signal};

/// Coordinates concurrent startup and ordered shutdown of all applications.
pub struct Supervisor {
    /// Applications in start order; stopped in reverse.
    apps: Vec<Arc<dyn Application>>,
}

impl Supervisor {
    /// Creates a supervisor over the given applications (start order).
    pub fn new(apps: Vec<Arc<dyn Application>>) -> Self {
        Self { apps }
    }

    /// Runs until an OS termination signal arrives (or every application
    /// exits on its own), then shuts down per the signal's classification.
    pub async fn run(&self) -> Result<(), RuntimeError> {
        self.run_with_shutdown(signal::wait_for_signal()).await
    }

    /// Same as [`run`](Supervisor::run) with the shutdown trigger injected —
    /// the seam tests use to drive deterministic signals.
    pub async fn run_with_shutdown<F>(&self, shutdown: F) -> Result<(), RuntimeError>
    where
        F: Future<Output = io::Result<Signal>>,
    {
        let mut started = JoinSet::new();
        for app in &self.apps {
            let app = Arc::clone(app);
            info!(app = app.name(), "starting application");
            started.spawn(async move {
                let name = app.name().to_string();
                (name, app.start().await)
            });
        }

        let received = tokio::select! {
            sig = shutdown => sig?,
            outcome = Self::watch_start_tasks(&mut started) => return outcome,
        };

        match received {
            Signal::Forceful => {
                error!("forceful termination signal; exiting without draining");
                return Err(RuntimeError::ForcedExit);
            }
            Signal::Graceful => info!("graceful shutdown signal received"),
        }

        for app in self.apps.iter().rev() {
            info!(app = app.name(), "stopping application");
            app.stop().await.map_err(|source| RuntimeError::StopFailed {
                app: app.name().to_string(),
                source,
            })?;
        }

        // Every start task must have exited before we report completion.
        while let Some(joined) = started.join_next().await {
            Self::check_exit(joined)?;
        }
        info!("service host stopped");
        Ok(())
    }

    /// Observes start tasks while running: a non-sentinel error is fatal; if
    /// all applications exit on their own the run ends cleanly.
    async fn watch_start_tasks(
        started: &mut JoinSet<(String, Result<(), AppError>)>,
    ) -> Result<(), RuntimeError> {
        while let Some(joined) = started.join_next().await {
            Self::check_exit(joined)?;
        }
        info!("all applications exited; service host stopped");
        Ok(())
    }

    fn check_exit(
        joined: Result<(String, Result<(), AppError>), tokio::task::JoinError>,
    ) -> Result<(), RuntimeError> {
        match joined {
            Ok((name, Ok(()))) => {
                info!(app = %name, "application exited");
                Ok(())
            }
            Ok((name, Err(err))) if err.is_closed() => {
                info!(app = %name, "application closed");
                Ok(())
            }
            Ok((name, Err(source))) => {
                error!(app = %name, error = %source, label = source.as_label(), "application failed");
                Err(RuntimeError::StartFailed { app: name, source })
            }
            Err(join_err) => Err(RuntimeError::StartPanicked {
                detail: join_err.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::future;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::{sleep, timeout};
    use tokio_util::sync::CancellationToken;

    /// Blocks until stopped; records the order `stop` was invoked in.
    struct RecordingApp {
        name: String,
        stop: CancellationToken,
        order: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingApp {
        fn new(name: &str, order: Arc<Mutex<Vec<String>>>) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                stop: CancellationToken::new(),
                order,
            })
        }
    }

    #[async_trait]
    impl Application for RecordingApp {
        fn name(&self) -> &str {
            &self.name
        }

        async fn start(&self) -> Result<(), AppError> {
            self.stop.cancelled().await;
            Err(AppError::Closed)
        }

        async fn stop(&self) -> Result<(), AppError> {
            self.order.lock().unwrap().push(self.name.clone());
            self.stop.cancel();
            Ok(())
        }
    }

    struct FailingApp;

    #[async_trait]
    impl Application for FailingApp {
        fn name(&self) -> &str {
            "failing"
        }

        async fn start(&self) -> Result<(), AppError> {
            Err(AppError::Other(anyhow::anyhow!("bind failed")))
        }

        async fn stop(&self) -> Result<(), AppError> {
            Ok(())
        }
    }

    struct OneShotApp;

    #[async_trait]
    impl Application for OneShotApp {
        fn name(&self) -> &str {
            "one_shot"
        }

        async fn start(&self) -> Result<(), AppError> {
            Ok(())
        }

        async fn stop(&self) -> Result<(), AppError> {
            Ok(())
        }
    }

    fn never() -> impl Future<Output = io::Result<Signal>> {
        future::pending()
    }

    #[tokio::test]
    async fn graceful_signal_stops_in_reverse_start_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let a = RecordingApp::new("a", order.clone());
        let b = RecordingApp::new("b", order.clone());
        let c = RecordingApp::new("c", order.clone());
        let sup = Supervisor::new(vec![a, b, c]);

        let shutdown = async {
            sleep(Duration::from_millis(50)).await;
            Ok(Signal::Graceful)
        };
        timeout(Duration::from_secs(5), sup.run_with_shutdown(shutdown))
            .await
            .expect("run must return after graceful shutdown")
            .expect("graceful shutdown must succeed");

        assert_eq!(*order.lock().unwrap(), vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn forceful_signal_returns_without_stopping() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let a = RecordingApp::new("a", order.clone());
        let sup = Supervisor::new(vec![a]);

        let result = sup
            .run_with_shutdown(async { Ok(Signal::Forceful) })
            .await;
        assert!(matches!(result, Err(RuntimeError::ForcedExit)));
        assert!(order.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_sentinel_start_error_is_fatal() {
        let sup = Supervisor::new(vec![Arc::new(FailingApp)]);
        let result = timeout(Duration::from_secs(5), sup.run_with_shutdown(never()))
            .await
            .expect("fatal start error must end the run");
        match result {
            Err(RuntimeError::StartFailed { app, .. }) => assert_eq!(app, "failing"),
            other => panic!("expected StartFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn all_apps_exiting_ends_the_run_cleanly() {
        let sup = Supervisor::new(vec![Arc::new(OneShotApp)]);
        timeout(Duration::from_secs(5), sup.run_with_shutdown(never()))
            .await
            .expect("run must end when every app exits")
            .expect("clean exits are not errors");
    }
}
