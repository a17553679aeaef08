//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - YAML file loading
//! - Environment variable overrides
//! - Validation of the loaded values

pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
