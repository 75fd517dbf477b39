//! Supervised applications.
//!
//! [`Application`] is the lifecycle capability every supervised service
//! implements. Variants shipped with the host:
//! - [`EventApp`] — owns an event manager plus its handler set.
//! - [`HttpApp`] — serves HTTP until stopped, with bounded graceful drain.
//! - [`DatabaseApp`] — holds connection pools opened through the
//!   [`PoolDriver`] seam, fail-fast at boot.
//!
//! The supervisor never inspects concrete kinds; it only sees the trait.

mod application;
mod db_app;
mod event_app;
mod http_app;

pub use application::Application;
pub use db_app::{ConnectionPool, DatabaseApp, PoolDriver};
pub use event_app::EventApp;
pub use http_app::HttpApp;
