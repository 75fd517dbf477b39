//! # EventManagerRegistry: process-wide alias → manager map.
//!
//! The registry is the sole long-term owner of every [`EventManager`].
//! Producers look managers up by alias and hold only a transient reference
//! for the duration of a publish. There is no implicit global: the registry
//! instance is created by the composition root and passed where needed.
//!
//! Lookups proceed concurrently with each other; mutations are mutually
//! exclusive with lookups and other mutations. The lock is never held across
//! an `.await`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::events::EventManager;

/// Alias-keyed map of event managers.
#[derive(Default)]
pub struct EventManagerRegistry {
    managers: RwLock<HashMap<String, Arc<EventManager>>>,
}

impl EventManagerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a manager under an alias.
    ///
    /// If the alias is already taken, the displaced manager is closed before
    /// being dropped (close-then-replace): silent replacement would leak the
    /// old manager's dispatch task and handlers.
    pub async fn add(&self, alias: impl Into<String>, manager: Arc<EventManager>) {
        let alias = alias.into();
        let displaced = {
            let mut managers = self.managers.write().unwrap();
            managers.insert(alias.clone(), manager)
        };
        if let Some(old) = displaced {
            warn!(%alias, "alias already registered; closing displaced event manager");
            old.close().await;
        }
    }

    /// Looks up a manager by alias. Safe under concurrent lookups; the
    /// returned reference is transient — the registry stays the owner.
    pub fn get(&self, alias: &str) -> Option<Arc<EventManager>> {
        self.managers.read().unwrap().get(alias).cloned()
    }

    /// Removes the entry and closes its manager. Unknown aliases are ignored.
    pub async fn remove(&self, alias: &str) {
        let removed = {
            let mut managers = self.managers.write().unwrap();
            managers.remove(alias)
        };
        if let Some(manager) = removed {
            debug!(%alias, "closing removed event manager");
            manager.close().await;
        }
    }

    /// Closes every registered manager and empties the map. Used at process
    /// shutdown.
    pub async fn stop_all(&self) {
        let drained: Vec<(String, Arc<EventManager>)> = {
            let mut managers = self.managers.write().unwrap();
            managers.drain().collect()
        };
        for (alias, manager) in drained {
            debug!(%alias, "closing event manager");
            manager.close().await;
        }
    }

    /// Number of registered managers.
    pub fn len(&self) -> usize {
        self.managers.read().unwrap().len()
    }

    /// True if no managers are registered.
    pub fn is_empty(&self) -> bool {
        self.managers.read().unwrap().is_empty()
    }
}
