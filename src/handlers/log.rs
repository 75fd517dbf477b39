//! # Logging handler for debugging and demos.
//!
//! [`LogHandler`] writes every lifecycle step and event it sees to the
//! structured log. Useful for development and as a reference implementation;
//! production code should implement [`Handler`] directly.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::info;

use crate::events::Event;
use crate::handlers::Handler;

/// Handler that logs init/close and every received event.
///
/// Knows how to render the two payload shapes the host itself produces
/// (string-map properties and JSON values); anything else is logged opaquely.
pub struct LogHandler {
    name: String,
}

impl LogHandler {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Handler for LogHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&self) {
        info!(handler = %self.name, "handler initialized");
    }

    async fn handle_event(&self, event: Event) {
        if let Some(properties) = event.downcast_ref::<HashMap<String, String>>() {
            info!(handler = %self.name, ?properties, "event received");
        } else if let Some(value) = event.downcast_ref::<serde_json::Value>() {
            info!(handler = %self.name, payload = %value, "event received");
        } else {
            info!(handler = %self.name, "event received (opaque payload)");
        }
    }

    fn close(&self) -> anyhow::Result<()> {
        info!(handler = %self.name, "handler closed");
        Ok(())
    }
}
