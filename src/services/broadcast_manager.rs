//! Process-local broadcast delivery.
//!
//! Receivers register against an [`IntentFilter`]; a broadcast reaches every
//! receiver whose filter matches its action. Registration is keyed by the
//! receiver's `Arc` identity, so registering twice never duplicates delivery.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::domain::models::constants::LOG_TARGET;
use crate::domain::models::{Intent, IntentFilter};
use crate::domain::ports::BroadcastReceiver;

struct ReceiverRecord {
    receiver: Arc<dyn BroadcastReceiver>,
    filter: IntentFilter,
}

/// Broadcast hub shared by everything in one process.
#[derive(Default)]
pub struct LocalBroadcastManager {
    receivers: RwLock<Vec<ReceiverRecord>>,
}

impl LocalBroadcastManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `receiver` for the actions in `filter`.
    ///
    /// Actions the receiver is already registered for are ignored. Returns
    /// `false` when nothing new was registered.
    pub fn register_receiver(&self, receiver: Arc<dyn BroadcastReceiver>, filter: IntentFilter) -> bool {
        let mut receivers = self.receivers.write();
        let new_actions: Vec<String> = filter
            .actions()
            .iter()
            .filter(|action| {
                !receivers.iter().any(|record| {
                    same_receiver(&record.receiver, &receiver)
                        && record.filter.actions().contains(*action)
                })
            })
            .cloned()
            .collect();

        let Some((first, rest)) = new_actions.split_first() else {
            return false;
        };
        let filter = rest
            .iter()
            .fold(IntentFilter::new(first.clone()), |f, action| f.add_action(action.clone()));
        receivers.push(ReceiverRecord { receiver, filter });
        true
    }

    /// Remove every registration of `receiver`. Returns `false` if it had none.
    pub fn unregister_receiver(&self, receiver: &Arc<dyn BroadcastReceiver>) -> bool {
        let mut receivers = self.receivers.write();
        let before = receivers.len();
        receivers.retain(|record| !same_receiver(&record.receiver, receiver));
        receivers.len() != before
    }

    pub fn is_registered(&self, receiver: &Arc<dyn BroadcastReceiver>) -> bool {
        self.receivers
            .read()
            .iter()
            .any(|record| same_receiver(&record.receiver, receiver))
    }

    pub fn receiver_count(&self) -> usize {
        self.receivers.read().len()
    }

    /// Deliver `intent` on the calling thread. Returns the number of receivers reached.
    pub fn send_broadcast_sync(&self, intent: &Intent) -> usize {
        let matching: Vec<Arc<dyn BroadcastReceiver>> = self
            .receivers
            .read()
            .iter()
            .filter(|record| record.filter.matches(intent))
            .map(|record| record.receiver.clone())
            .collect();

        trace!(target: LOG_TARGET, action = %intent.action, receivers = matching.len(), "delivering broadcast");
        for receiver in &matching {
            receiver.on_receive(intent);
        }
        matching.len()
    }

    /// Deliver `intent` on a blocking Tokio task.
    ///
    /// Must be called from within a Tokio runtime. The handle resolves to the
    /// number of receivers reached.
    pub fn send_broadcast(self: &Arc<Self>, intent: Intent) -> JoinHandle<usize> {
        let manager = Arc::clone(self);
        debug!(target: LOG_TARGET, action = %intent.action, "queueing broadcast");
        tokio::task::spawn_blocking(move || manager.send_broadcast_sync(&intent))
    }
}

fn same_receiver(a: &Arc<dyn BroadcastReceiver>, b: &Arc<dyn BroadcastReceiver>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
