//! Event handlers.
//!
//! [`Handler`] is the extension point for reacting to events from one
//! [`EventManager`](crate::EventManager). [`LogHandler`] is a built-in
//! implementation that logs everything it sees (demo/reference).

mod handler;
mod log;

pub use handler::Handler;
pub use log::LogHandler;
