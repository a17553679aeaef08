use serde::{Deserialize, Serialize};

use super::command::constants;

/// Main configuration structure for the bridge
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Remote command registration settings
    #[serde(default)]
    pub remote_command: RemoteCommandConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How the remote command registers itself with the host
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RemoteCommandConfig {
    /// Identifier the tag management system invokes the command by
    #[serde(default = "default_command_id")]
    pub command_id: String,

    /// Free-form description reported to the host
    #[serde(default = "default_description")]
    pub description: String,

    /// Track the visible screen through lifecycle callbacks on construction
    #[serde(default = "default_true")]
    pub auto_fragment_manager: bool,

    /// Register the form-closure receivers on construction
    #[serde(default = "default_true")]
    pub auto_feedback_handler: bool,
}

fn default_command_id() -> String {
    constants::DEFAULT_COMMAND_ID.to_string()
}

fn default_description() -> String {
    constants::DEFAULT_COMMAND_DESC.to_string()
}

const fn default_true() -> bool {
    true
}

impl Default for RemoteCommandConfig {
    fn default() -> Self {
        Self {
            command_id: default_command_id(),
            description: default_description(),
            auto_fragment_manager: true,
            auto_feedback_handler: true,
        }
    }
}

impl RemoteCommandConfig {
    /// Configuration with both automatic registrations turned off.
    pub fn manual() -> Self {
        Self {
            auto_fragment_manager: false,
            auto_feedback_handler: false,
            ..Self::default()
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stdout only when unset
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
