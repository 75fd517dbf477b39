//! # EventManager: per-alias broadcaster with isolated fan-out.
//!
//! One [`EventManager`] owns a mutable handler set and a bounded inbound
//! queue, and runs a single dispatch task that fans each event out to every
//! registered handler **concurrently** — one task per handler, never awaited
//! before the next event is pulled.
//!
//! ## What it guarantees
//! - Every handler registered when an event is dequeued receives it exactly
//!   once (absent faults); handlers removed beforehand receive nothing.
//! - A panic inside one handler is caught at that delivery's task boundary,
//!   logged, and the handler is removed; other handlers are unaffected.
//! - [`EventManager::close`] stops intake, drains in-flight deliveries,
//!   closes remaining handlers, and never hangs a blocked publisher.
//!
//! ## What it does **not** guarantee
//! - No ordering of deliveries to the *same* handler across different events
//!   (handlers are assumed independent and reorder-tolerant).
//! - No retry: a faulted delivery is lost, the publisher never learns.
//!
//! ## Backpressure
//! `publish` suspends while the queue is full. If the manager closes while a
//! publisher is waiting, the event is dropped and logged — never an error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

use crate::events::Event;
use crate::handlers::Handler;

/// Per-alias event broadcaster.
///
/// Created with a fixed queue capacity; mutated while open; closed exactly
/// once by its owner (extra `close` calls are safe no-ops, so references
/// handed out by the registry cannot corrupt shutdown).
pub struct EventManager {
    inner: Arc<Inner>,
}

struct Inner {
    /// Live handler set. Membership only; iteration order is unspecified.
    handlers: RwLock<Vec<Arc<dyn Handler>>>,
    tx: mpsc::Sender<Event>,
    /// Cancelled = closed: no further intake.
    cancel: CancellationToken,
    /// Tracks the dispatch loop and every in-flight delivery.
    tracker: TaskTracker,
    closed: AtomicBool,
}

impl EventManager {
    /// Creates a manager with the given queue capacity and spawns its
    /// dispatch task. Capacity below 1 is clamped to 1.
    pub fn new(queue_capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let inner = Arc::new(Inner {
            handlers: RwLock::new(Vec::new()),
            tx,
            cancel: CancellationToken::new(),
            tracker: TaskTracker::new(),
            closed: AtomicBool::new(false),
        });

        let dispatch = Arc::clone(&inner);
        inner.tracker.spawn(dispatch.dispatch_loop(rx));

        Self { inner }
    }

    /// Enqueues an event for fan-out.
    ///
    /// Suspends while the queue is full. If the manager is closed — before
    /// the call or while waiting for space — the event is dropped and logged;
    /// publishing is fire-and-forget, never an error.
    pub async fn publish(&self, event: Event) {
        if self.inner.cancel.is_cancelled() {
            debug!("event manager closed; event dropped");
            return;
        }
        tokio::select! {
            sent = self.inner.tx.send(event) => {
                if sent.is_err() {
                    debug!("event manager closed; event dropped");
                }
            }
            _ = self.inner.cancel.cancelled() => {
                warn!("event manager closed while waiting for queue space; event dropped");
            }
        }
    }

    /// Registers a handler and synchronously calls its `init`.
    ///
    /// The handler starts receiving future (not past) events immediately.
    /// Adding to a closed manager is a logged no-op: `init` is not called,
    /// so there is nothing to leak.
    pub fn add_handler(&self, handler: Arc<dyn Handler>) {
        if self.inner.cancel.is_cancelled() {
            warn!(handler = handler.name(), "event manager closed; handler not added");
            return;
        }
        self.inner
            .handlers
            .write()
            .unwrap()
            .push(Arc::clone(&handler));
        handler.init();
    }

    /// Unregisters a handler by object identity and synchronously calls its
    /// `close`. Unknown handlers are ignored.
    pub fn remove_handler(&self, handler: &Arc<dyn Handler>) {
        self.inner.unregister(handler);
    }

    /// Closes the manager: stops intake, waits for already-dequeued events'
    /// fan-out to finish, closes every remaining handler, releases the queue.
    ///
    /// Idempotent: only the first call does the work, later calls return
    /// immediately. Events still sitting in the queue when close begins are
    /// dropped.
    pub async fn close(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.cancel.cancel();
        self.inner.tracker.close();
        self.inner.tracker.wait().await;

        let remaining: Vec<Arc<dyn Handler>> = {
            let mut set = self.inner.handlers.write().unwrap();
            set.drain(..).collect()
        };
        for handler in remaining {
            if let Err(err) = handler.close() {
                warn!(handler = handler.name(), error = %err, "handler close failed");
            }
        }
        debug!("event manager closed");
    }

    /// True once `close` has begun; no further events are accepted.
    pub fn is_closed(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    /// Number of currently registered handlers.
    pub fn handler_count(&self) -> usize {
        self.inner.handlers.read().unwrap().len()
    }
}

impl Inner {
    /// Waits for the next queued event or shutdown; fans events out without
    /// awaiting their deliveries. Biased toward shutdown so close stops
    /// intake even under a constantly full queue.
    async fn dispatch_loop(self: Arc<Self>, mut rx: mpsc::Receiver<Event>) {
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                next = rx.recv() => match next {
                    Some(event) => Self::fan_out(&self, event),
                    None => break,
                },
            }
        }
    }

    /// Spawns one tracked delivery task per currently registered handler.
    fn fan_out(this: &Arc<Self>, event: Event) {
        let snapshot: Vec<Arc<dyn Handler>> = this.handlers.read().unwrap().clone();
        for handler in snapshot {
            let inner = Arc::clone(this);
            let event = event.clone();
            this.tracker.spawn(async move {
                let delivery = std::panic::AssertUnwindSafe(handler.handle_event(event));
                if let Err(panic) = delivery.catch_unwind().await {
                    warn!(
                        handler = handler.name(),
                        panic = %panic_message(panic.as_ref()),
                        "handler panicked during delivery; removing from set"
                    );
                    inner.unregister(&handler);
                }
            });
        }
    }

    fn unregister(&self, handler: &Arc<dyn Handler>) {
        let removed = {
            let mut set = self.handlers.write().unwrap();
            let before = set.len();
            set.retain(|existing| !Arc::ptr_eq(existing, handler));
            before != set.len()
        };
        // Close outside the lock; a concurrent close() draining the set wins
        // the race and closes the handler itself.
        if removed {
            if let Err(err) = handler.close() {
                warn!(handler = handler.name(), error = %err, "handler close failed");
            }
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
