//! The event payload type.
//!
//! Events are opaque to the bus: any `'static + Send + Sync` value works, and
//! handlers downcast to the concrete types they understand. The `Arc` makes
//! fan-out to N handlers a cheap pointer clone.

use std::any::Any;
use std::sync::Arc;

/// Opaque event payload broadcast through an [`EventManager`](crate::EventManager).
///
/// No schema is enforced. Handlers that care about the payload downcast it:
///
/// ```
/// use std::sync::Arc;
/// use apphost::Event;
///
/// let ev: Event = Arc::new(String::from("hello"));
/// assert_eq!(ev.downcast_ref::<String>().unwrap(), "hello");
/// assert!(ev.downcast_ref::<u64>().is_none());
/// ```
pub type Event = Arc<dyn Any + Send + Sync>;
