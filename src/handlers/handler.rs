//! # Core handler trait.
//!
//! A handler is registered with one event manager and reacts to the events
//! that manager fans out. Identity is **object identity** (`Arc::ptr_eq`),
//! never the name — two handlers of the same type are two members of the set.
//!
//! ## Contract
//! - `init` runs exactly once, synchronously, when the handler is added.
//! - `handle_event` runs zero or more times, possibly concurrently with
//!   itself across events; implementations must tolerate reordering.
//! - `close` runs exactly once: on removal, on fault-triggered removal, or
//!   when the owning manager closes.
//! - A panic inside `handle_event` removes the handler from the set; the
//!   manager and its other handlers keep running.

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event handlers.
///
/// Deliveries run on dedicated tasks; slow handlers delay only themselves,
/// never the dispatch loop or other handlers.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    /// Human-readable name, for logs only.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// One-time setup, called synchronously when the handler is added.
    fn init(&self);

    /// Processes one event. The payload is opaque; downcast as needed.
    async fn handle_event(&self, event: Event);

    /// One-time teardown. Errors are logged by the caller, never escalated.
    fn close(&self) -> anyhow::Result<()>;
}
