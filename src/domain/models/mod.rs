//! Domain models: the command vocabulary, invocation payloads, broadcast
//! messages, form results and configuration.

pub mod command;
pub mod config;
pub mod feedback;
pub mod intent;
pub mod payload;

pub use command::{constants, events, keys, split_commands, Command};
pub use config::{Config, LoggingConfig, RemoteCommandConfig};
pub use feedback::{FeedbackResult, FormClient, FormFragment};
pub use intent::{
    Intent, IntentFilter, INTENT_CLOSE_CAMPAIGN, INTENT_CLOSE_FORM, INTENT_FEEDBACK_RESULT,
    INTENT_FEEDBACK_RESULT_CAMPAIGN,
};
pub use payload::Payload;
