//! Process lifecycle: signal classification and the supervisor.
//!
//! - [`signal`]: maps OS termination signals onto [`Signal`].
//! - [`Supervisor`]: starts all applications concurrently, stops them in
//!   reverse start order on a graceful signal, waits for every start task.

pub mod signal;
mod supervisor;

pub use signal::Signal;
pub use supervisor::Supervisor;
