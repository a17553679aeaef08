//! Feedback SDK adapters.

pub mod tracing_sdk;

pub use tracing_sdk::TracingFeedbackSdk;
