//! Domain layer: models, port traits and error types.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{BridgeError, BridgeResult, SdkError};
