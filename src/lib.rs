//! # apphost
//!
//! **apphost** is a small service host: it runs a fixed set of independently
//! implemented long-running services ("applications") in one process,
//! coordinates their startup and shutdown, and offers an in-process
//! publish/subscribe event bus decoupling event producers from the handlers
//! reacting to them.
//!
//! ## Architecture
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   EventApp   │   │   HttpApp    │   │ DatabaseApp  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Supervisor                                                   │
//! │  - spawns every Application::start concurrently (JoinSet)     │
//! │  - waits for an OS termination signal                         │
//! │  - graceful: stop() in reverse start order, join all starts   │
//! │  - forceful: return immediately, nothing drained              │
//! └───────────────────────────────┬───────────────────────────────┘
//!                                 │
//!                 EventManagerRegistry (alias → manager)
//!                                 │
//!            producer ── publish(Event) ──► EventManager
//!                                 │  [bounded queue, one dispatch task]
//!                    ┌────────────┼────────────┐
//!                    ▼            ▼            ▼
//!               handler H1   handler H2   handler HN
//!             (one delivery task per handler, panics isolated)
//! ```
//!
//! ## Guarantees
//! | Concern           | Behavior                                                            |
//! |-------------------|---------------------------------------------------------------------|
//! | Fan-out           | Every handler registered at dequeue time gets the event once.       |
//! | Handler faults    | Caught per delivery, logged, handler removed; bus unaffected.       |
//! | Backpressure      | `publish` suspends on a full queue; dropped (logged) if closing.    |
//! | Shutdown order    | Applications stop in reverse start order, sequentially.             |
//! | Failure policy    | Non-sentinel start/stop errors are process-fatal, no retry.         |
//!
//! There is no persistence, no delivery acknowledgment, no cross-topic
//! ordering and no redelivery: this is a single-process, best-effort,
//! in-memory bus plus a minimal lifecycle manager.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use apphost::{EventApp, EventManagerRegistry, LogHandler, Supervisor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Arc::new(EventManagerRegistry::new());
//!     let app = Arc::new(EventApp::new(
//!         "gen_event_app",
//!         "sample_task",
//!         16,
//!         vec![Arc::new(LogHandler::new("sample_a"))],
//!         Arc::clone(&registry),
//!     ));
//!
//!     // Blocks until SIGINT/SIGHUP (graceful) or SIGTERM (forceful).
//!     Supervisor::new(vec![app]).run().await?;
//!     Ok(())
//! }
//! ```

pub mod apps;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod handlers;
pub mod runtime;

// ---- Public re-exports ----

pub use apps::{Application, ConnectionPool, DatabaseApp, EventApp, HttpApp, PoolDriver};
pub use config::Config;
pub use dispatch::{dispatch, Payload};
pub use error::{AppError, ConfigError, DispatchError, RuntimeError};
pub use events::{Event, EventManager, EventManagerRegistry};
pub use handlers::{Handler, LogHandler};
pub use runtime::{Signal, Supervisor};
