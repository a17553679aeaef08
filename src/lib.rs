//! Usabilla remote command
//!
//! Bridges a tag management SDK's remote commands to the Usabilla feedback
//! SDK. An invocation names one or more commands in `command_name`; the
//! router parses them and drives a tracking backend that loads forms,
//! attaches them to the visible screen and reports form outcomes back into
//! the analytics pipeline.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, port traits and errors
//! - **Service Layer** (`services`): router, backend and in-process registries
//! - **Infrastructure Layer** (`infrastructure`): config, logging and adapters
//! - **CLI Layer** (`cli`): command-line harness
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use usabilla_remote_command::{
//!     LifecycleRegistry, LocalBroadcastManager, Payload, RemoteCommand,
//!     RemoteCommandConfig, Response, UsabillaRemoteCommand,
//! };
//!
//! let command = UsabillaRemoteCommand::new(
//!     &RemoteCommandConfig::default(),
//!     Arc::new(LifecycleRegistry::new()),
//!     Arc::new(LocalBroadcastManager::new()),
//!     sdk,
//!     None,
//! );
//! let payload = Payload::new()
//!     .with("command_name", "initialize")
//!     .with("appId", "my-app-id");
//! command.on_invoke(&Response::new("usabilla", payload));
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::errors::{BridgeError, BridgeResult, SdkError};
pub use domain::models::{
    Command, Config, FeedbackResult, FormClient, FormFragment, Intent, IntentFilter,
    LoggingConfig, Payload, RemoteCommandConfig,
};
pub use domain::ports::{
    BroadcastReceiver, FeedbackSdk, FormCallback, FragmentManager, LifecycleObserver,
    ReadyCallback, RemoteCommand, RemoteCommandContext, Response, ScreenContainer,
    UsabillaCommand,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{LifecycleRegistry, LocalBroadcastManager, UsabillaInstance, UsabillaRemoteCommand};
