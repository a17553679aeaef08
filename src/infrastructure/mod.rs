//! Infrastructure layer module
//!
//! Adapters that satisfy the domain ports or support the binary:
//! - Configuration management
//! - Logging infrastructure
//! - A logging feedback SDK
//! - An in-memory tracking context
//! - A headless host screen

pub mod config;
pub mod host;
pub mod logging;
pub mod sdk;
pub mod tracking;
