//! Tracking context adapters.

pub mod memory_tracker;

pub use memory_tracker::{InMemoryTracker, TrackedEvent};
