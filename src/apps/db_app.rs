//! # Database-pool application.
//!
//! Holds one connection pool per configured backend for the lifetime of the
//! process. Pool internals are external: backends plug in through the
//! [`PoolDriver`] seam, the host only manages the lifecycle.
//!
//! Boot policy is deliberately fail-fast: an open or liveness-probe failure
//! aborts `start` (and therefore the whole host) — no retry, a service that
//! cannot reach its database should not come up.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::apps::Application;
use crate::error::AppError;

/// An opened connection pool, as much of it as the host needs to see.
#[async_trait]
pub trait ConnectionPool: Send + Sync + 'static {
    /// Liveness probe, run once right after open.
    async fn ping(&self) -> anyhow::Result<()>;

    /// Releases the pool's connections.
    async fn close(&self) -> anyhow::Result<()>;
}

/// Factory for one backend's pool.
#[async_trait]
pub trait PoolDriver: Send + Sync + 'static {
    /// Configured backend name, for logs and lookup.
    fn name(&self) -> &str;

    /// Opens the pool. Called once, at `start`.
    async fn open(&self) -> anyhow::Result<Arc<dyn ConnectionPool>>;
}

/// Application owning the process's database pools.
pub struct DatabaseApp {
    name: String,
    drivers: Vec<Arc<dyn PoolDriver>>,
    pools: Mutex<Vec<(String, Arc<dyn ConnectionPool>)>>,
    stop: CancellationToken,
}

impl DatabaseApp {
    pub fn new(name: impl Into<String>, drivers: Vec<Arc<dyn PoolDriver>>) -> Self {
        Self {
            name: name.into(),
            drivers,
            pools: Mutex::new(Vec::new()),
            stop: CancellationToken::new(),
        }
    }

    /// Looks up an opened pool by backend name.
    pub async fn pool(&self, name: &str) -> Option<Arc<dyn ConnectionPool>> {
        self.pools
            .lock()
            .await
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, pool)| Arc::clone(pool))
    }
}

#[async_trait]
impl Application for DatabaseApp {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&self) -> Result<(), AppError> {
        let mut opened = Vec::with_capacity(self.drivers.len());
        for driver in &self.drivers {
            let pool = driver.open().await.map_err(|cause| AppError::Pool {
                name: driver.name().to_string(),
                cause,
            })?;
            pool.ping().await.map_err(|cause| AppError::Pool {
                name: driver.name().to_string(),
                cause,
            })?;
            info!(app = %self.name, pool = driver.name(), "database pool ready");
            opened.push((driver.name().to_string(), pool));
        }
        *self.pools.lock().await = opened;

        self.stop.cancelled().await;
        Err(AppError::Closed)
    }

    async fn stop(&self) -> Result<(), AppError> {
        for (name, pool) in self.pools.lock().await.drain(..) {
            if let Err(err) = pool.close().await {
                warn!(app = %self.name, pool = %name, error = %err, "pool close failed");
            }
        }
        self.stop.cancel();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::time::{sleep, timeout};

    struct FakePool {
        pinged: AtomicBool,
        closed: AtomicBool,
    }

    #[async_trait]
    impl ConnectionPool for FakePool {
        async fn ping(&self) -> anyhow::Result<()> {
            self.pinged.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn close(&self) -> anyhow::Result<()> {
            self.closed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FakeDriver {
        backend: &'static str,
        fail_open: bool,
        pool: Arc<FakePool>,
    }

    impl FakeDriver {
        fn new(backend: &'static str) -> Self {
            Self {
                backend,
                fail_open: false,
                pool: Arc::new(FakePool {
                    pinged: AtomicBool::new(false),
                    closed: AtomicBool::new(false),
                }),
            }
        }
    }

    #[async_trait]
    impl PoolDriver for FakeDriver {
        fn name(&self) -> &str {
            self.backend
        }

        async fn open(&self) -> anyhow::Result<Arc<dyn ConnectionPool>> {
            if self.fail_open {
                return Err(anyhow!("connection refused"));
            }
            Ok(self.pool.clone())
        }
    }

    #[tokio::test]
    async fn opens_probes_blocks_and_closes_on_stop() {
        let driver = Arc::new(FakeDriver::new("main"));
        let pool = driver.pool.clone();
        let app = Arc::new(DatabaseApp::new("database", vec![driver]));

        let running = {
            let app = Arc::clone(&app);
            tokio::spawn(async move { app.start().await })
        };

        for _ in 0..200 {
            if pool.pinged.load(Ordering::SeqCst) {
                break;
            }
            sleep(Duration::from_millis(10)).await;
        }
        assert!(pool.pinged.load(Ordering::SeqCst));
        assert!(app.pool("main").await.is_some());
        assert!(app.pool("other").await.is_none());

        app.stop().await.unwrap();
        let result = timeout(Duration::from_secs(2), running)
            .await
            .expect("start must return after stop")
            .expect("start task must not panic");
        assert!(matches!(result, Err(AppError::Closed)));
        assert!(pool.closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn open_failure_is_fatal_and_names_the_backend() {
        let mut driver = FakeDriver::new("broken");
        driver.fail_open = true;
        let app = DatabaseApp::new("database", vec![Arc::new(driver)]);

        match app.start().await {
            Err(AppError::Pool { name, .. }) => assert_eq!(name, "broken"),
            other => panic!("expected pool error, got {other:?}"),
        }
    }
}
