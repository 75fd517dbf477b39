//! # Producer lookup surface.
//!
//! Producers (typically an HTTP endpoint) hand a [`Payload`] to
//! [`dispatch`], which looks up the event manager registered under the
//! payload's event alias and publishes the payload's properties to it.
//! Fire-and-forget from there: delivery faults and backpressure drops stay in
//! the logs, the producer only learns about a missing alias.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;
use crate::events::EventManagerRegistry;

/// Wire payload accepted from producers.
///
/// `event` selects the target manager; `properties` become the published
/// event. The remaining fields are carried for producers that round-trip the
/// payload, the bus itself never reads them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Payload {
    #[serde(default)]
    pub project: String,
    pub event: String,
    #[serde(default)]
    pub properties: HashMap<String, String>,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub pass_through: Vec<u8>,
    #[serde(default)]
    pub ts: i64,
}

/// Publishes the payload's properties to the manager registered under the
/// payload's event alias.
pub async fn dispatch(
    registry: &EventManagerRegistry,
    payload: Payload,
) -> Result<(), DispatchError> {
    let manager = registry
        .get(&payload.event)
        .ok_or_else(|| DispatchError::ManagerNotFound(payload.event.clone()))?;
    manager.publish(Arc::new(payload.properties)).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Event, EventManager};
    use crate::handlers::Handler;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::sleep;

    #[test]
    fn payload_parses_report_json() {
        let raw = r#"{
            "project": "demo",
            "event": "sample_task",
            "properties": {"msg": "hello"},
            "type": "track",
            "ts": 1700000000
        }"#;
        let payload: Payload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.event, "sample_task");
        assert_eq!(payload.kind, "track");
        assert_eq!(payload.properties["msg"], "hello");
        assert!(payload.pass_through.is_empty());
    }

    struct PropsRecorder {
        seen: Mutex<Vec<HashMap<String, String>>>,
    }

    #[async_trait]
    impl Handler for PropsRecorder {
        fn name(&self) -> &str {
            "props_recorder"
        }

        fn init(&self) {}

        async fn handle_event(&self, event: Event) {
            if let Some(props) = event.downcast_ref::<HashMap<String, String>>() {
                self.seen.lock().unwrap().push(props.clone());
            }
        }

        fn close(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn dispatch_publishes_properties_to_the_aliased_manager() {
        let registry = EventManagerRegistry::new();
        let manager = Arc::new(EventManager::new(4));
        let recorder = Arc::new(PropsRecorder {
            seen: Mutex::new(Vec::new()),
        });
        manager.add_handler(recorder.clone());
        registry.add("sample_task", Arc::clone(&manager)).await;

        let payload = Payload {
            event: "sample_task".to_string(),
            properties: HashMap::from([("msg".to_string(), "hello".to_string())]),
            ..Payload::default()
        };
        dispatch(&registry, payload).await.unwrap();

        for _ in 0..200 {
            if !recorder.seen.lock().unwrap().is_empty() {
                break;
            }
            sleep(Duration::from_millis(10)).await;
        }
        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0]["msg"], "hello");
    }

    #[tokio::test]
    async fn unknown_alias_reports_manager_not_found() {
        let registry = EventManagerRegistry::new();
        let payload = Payload {
            event: "ghost".to_string(),
            ..Payload::default()
        };
        match dispatch(&registry, payload).await {
            Err(DispatchError::ManagerNotFound(alias)) => assert_eq!(alias, "ghost"),
            other => panic!("expected ManagerNotFound, got {other:?}"),
        }
    }
}
