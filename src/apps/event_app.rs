//! # Event-driven application.
//!
//! Owns one [`EventManager`] and a fixed handler set. `start` creates the
//! manager, registers it in the shared registry under a fixed alias, adds the
//! handlers, then blocks on its stop signal. `stop` closes all registry
//! managers and releases the signal.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::apps::Application;
use crate::error::AppError;
use crate::events::{EventManager, EventManagerRegistry};
use crate::handlers::Handler;

/// Application wrapping an event manager and its handlers.
pub struct EventApp {
    name: String,
    alias: String,
    queue_capacity: usize,
    /// Handed to the manager once, when `start` runs.
    handlers: Mutex<Vec<Arc<dyn Handler>>>,
    registry: Arc<EventManagerRegistry>,
    stop: CancellationToken,
}

impl EventApp {
    /// Creates the application. Nothing is registered until `start` runs.
    pub fn new(
        name: impl Into<String>,
        alias: impl Into<String>,
        queue_capacity: usize,
        handlers: Vec<Arc<dyn Handler>>,
        registry: Arc<EventManagerRegistry>,
    ) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
            queue_capacity,
            handlers: Mutex::new(handlers),
            registry,
            stop: CancellationToken::new(),
        }
    }
}

#[async_trait]
impl Application for EventApp {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&self) -> Result<(), AppError> {
        let manager = Arc::new(EventManager::new(self.queue_capacity));
        self.registry
            .add(self.alias.clone(), Arc::clone(&manager))
            .await;
        for handler in self.handlers.lock().unwrap().drain(..) {
            manager.add_handler(handler);
        }
        info!(app = %self.name, alias = %self.alias, "event manager registered");

        self.stop.cancelled().await;
        Err(AppError::Closed)
    }

    async fn stop(&self) -> Result<(), AppError> {
        self.registry.stop_all().await;
        self.stop.cancel();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Event;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::{sleep, timeout};

    struct Counter {
        inited: AtomicBool,
        received: AtomicUsize,
    }

    #[async_trait]
    impl Handler for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        fn init(&self) {
            self.inited.store(true, Ordering::SeqCst);
        }

        async fn handle_event(&self, _event: Event) {
            self.received.fetch_add(1, Ordering::SeqCst);
        }

        fn close(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn start_registers_manager_and_stop_tears_down() {
        let registry = Arc::new(EventManagerRegistry::new());
        let counter = Arc::new(Counter {
            inited: AtomicBool::new(false),
            received: AtomicUsize::new(0),
        });
        let app = Arc::new(EventApp::new(
            "gen_event_app",
            "sample_task",
            8,
            vec![counter.clone()],
            Arc::clone(&registry),
        ));

        let running = {
            let app = Arc::clone(&app);
            tokio::spawn(async move { app.start().await })
        };

        // Wait until start() has registered the manager and handler.
        for _ in 0..200 {
            if registry
                .get("sample_task")
                .is_some_and(|m| m.handler_count() == 1)
            {
                break;
            }
            sleep(Duration::from_millis(10)).await;
        }
        assert!(counter.inited.load(Ordering::SeqCst));

        let manager = registry.get("sample_task").expect("manager registered");
        manager.publish(Arc::new(json!({"msg": "hi"}))).await;
        for _ in 0..200 {
            if counter.received.load(Ordering::SeqCst) == 1 {
                break;
            }
            sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(counter.received.load(Ordering::SeqCst), 1);

        app.stop().await.unwrap();
        let result = timeout(Duration::from_secs(2), running)
            .await
            .expect("start must return after stop")
            .expect("start task must not panic");
        assert!(matches!(result, Err(AppError::Closed)));
        assert!(registry.is_empty());
        assert!(manager.is_closed());
    }
}
