//! Host application lifecycle dispatch.
//!
//! The host calls `dispatch_*` whenever a screen changes state; every
//! registered [`LifecycleObserver`] is notified in registration order.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use crate::domain::models::constants::LOG_TARGET;
use crate::domain::ports::{LifecycleObserver, ScreenContainer};

/// Registry of lifecycle observers for one application process.
#[derive(Default)]
pub struct LifecycleRegistry {
    observers: RwLock<Vec<Arc<dyn LifecycleObserver>>>,
}

impl LifecycleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `observer`. Returns `false` if it was already registered.
    pub fn register(&self, observer: Arc<dyn LifecycleObserver>) -> bool {
        let mut observers = self.observers.write();
        if observers.iter().any(|existing| same_observer(existing, &observer)) {
            return false;
        }
        observers.push(observer);
        true
    }

    /// Unregister `observer`. Returns `false` if it was not registered.
    pub fn unregister(&self, observer: &Arc<dyn LifecycleObserver>) -> bool {
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|existing| !same_observer(existing, observer));
        observers.len() != before
    }

    pub fn is_registered(&self, observer: &Arc<dyn LifecycleObserver>) -> bool {
        self.observers
            .read()
            .iter()
            .any(|existing| same_observer(existing, observer))
    }

    pub fn observer_count(&self) -> usize {
        self.observers.read().len()
    }

    pub fn dispatch_created(&self, container: &Arc<dyn ScreenContainer>) {
        self.dispatch("created", |observer| observer.on_container_created(container));
    }

    pub fn dispatch_started(&self, container: &Arc<dyn ScreenContainer>) {
        self.dispatch("started", |observer| observer.on_container_started(container));
    }

    pub fn dispatch_resumed(&self, container: &Arc<dyn ScreenContainer>) {
        self.dispatch("resumed", |observer| observer.on_container_resumed(container));
    }

    pub fn dispatch_paused(&self, container: &Arc<dyn ScreenContainer>) {
        self.dispatch("paused", |observer| observer.on_container_paused(container));
    }

    pub fn dispatch_stopped(&self, container: &Arc<dyn ScreenContainer>) {
        self.dispatch("stopped", |observer| observer.on_container_stopped(container));
    }

    pub fn dispatch_destroyed(&self, container: &Arc<dyn ScreenContainer>) {
        self.dispatch("destroyed", |observer| observer.on_container_destroyed(container));
    }

    fn dispatch(&self, transition: &str, notify: impl Fn(&Arc<dyn LifecycleObserver>)) {
        // Snapshot so observers may (un)register while being notified
        let observers = self.observers.read().clone();
        trace!(target: LOG_TARGET, transition, observers = observers.len(), "dispatching lifecycle transition");
        for observer in &observers {
            notify(observer);
        }
    }
}

fn same_observer(a: &Arc<dyn LifecycleObserver>, b: &Arc<dyn LifecycleObserver>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
