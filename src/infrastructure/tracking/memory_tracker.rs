//! In-memory tracking context.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::models::constants::LOG_TARGET;
use crate::domain::ports::RemoteCommandContext;

/// One event handed to the tracking context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackedEvent {
    pub name: String,
    pub properties: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
}

/// Collects tracked events in memory, in arrival order.
#[derive(Debug, Default)]
pub struct InMemoryTracker {
    events: RwLock<Vec<TrackedEvent>>,
}

impl InMemoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TrackedEvent> {
        self.events.read().clone()
    }

    pub fn events_named(&self, name: &str) -> Vec<TrackedEvent> {
        self.events
            .read()
            .iter()
            .filter(|event| event.name == name)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl RemoteCommandContext for InMemoryTracker {
    fn track(&self, event_name: &str, data: Map<String, Value>) {
        debug!(target: LOG_TARGET, event_name, properties = data.len(), "tracked");
        self.events.write().push(TrackedEvent {
            name: event_name.to_string(),
            properties: data,
            timestamp: Utc::now(),
        });
    }
}
