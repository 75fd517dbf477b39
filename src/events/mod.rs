//! Event bus primitives.
//!
//! - [`Event`] — opaque payload broadcast through a manager.
//! - [`EventManager`] — per-alias broadcaster: bounded inbound queue, one
//!   dispatch task, concurrent fan-out to a mutable handler set.
//! - [`EventManagerRegistry`] — process-wide alias → manager map; the sole
//!   long-term owner of every manager.
//!
//! ```text
//! producer ── publish(Event) ──► [bounded queue] ──► dispatch task
//!                                                        │ fan-out
//!                                          ┌─────────────┼─────────────┐
//!                                          ▼             ▼             ▼
//!                                   handler H1     handler H2    handler HN
//!                                 (one task per handler, not awaited)
//! ```

mod event;
mod manager;
mod registry;

pub use event::Event;
pub use manager::EventManager;
pub use registry::EventManagerRegistry;
