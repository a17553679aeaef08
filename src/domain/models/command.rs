//! Command vocabulary shared by the router and the tracking backend.
//!
//! Everything in here is pure data: the command tokens accepted on the wire,
//! the payload keys read for each command, and the names of the analytics
//! events emitted back into the tracking pipeline.

use std::fmt;

/// Constants describing the bridge itself.
pub mod constants {
    /// `tracing` target used by every log statement in the crate.
    pub const LOG_TARGET: &str = "tealium_usabilla";
    /// Separator for multiple commands in a single `command_name` value.
    pub const SEPARATOR: &str = ",";
    /// Tag under which an injected passive feedback form is attached.
    pub const FRAGMENT_TAG_NAME: &str = "tealium_usabilla_passive_feedback";
    /// Fragment container id used when the payload does not name one.
    pub const UNSPECIFIED_FRAGMENT_ID: i32 = -1;
    /// Default identifier the remote command is registered under.
    pub const DEFAULT_COMMAND_ID: &str = "usabilla";
    /// Default description of the remote command.
    pub const DEFAULT_COMMAND_DESC: &str = "Tealium-Usabilla Remote Command";
}

/// Payload keys read from an invocation.
pub mod keys {
    pub const COMMAND_NAME: &str = "command_name";

    pub const APP_ID: &str = "appId";
    pub const EVENT_NAME: &str = "event";
    pub const DEBUG_ENABLED: &str = "debugEnabled";
    pub const FORM_ID: &str = "formId";
    pub const CUSTOM: &str = "custom";
    pub const FRAGMENT_ID: &str = "fragmentId";
    pub const MASK_LIST: &str = "maskList";
    pub const MASK_CHAR: &str = "maskChar";

    pub const USABILLA_RATING: &str = "usabilla_rating";
    pub const USABILLA_ABANDONED_PAGE_INDEX: &str = "usabilla_abandoned_page_index";
    pub const USABILLA_SENT: &str = "usabilla_sent";
}

/// Names of the events tracked back into the analytics pipeline.
pub mod events {
    pub const USABILLA_FORM_CLOSED: &str = "usabilla_form_closed";
    pub const USABILLA_FORM_LOAD_ERROR: &str = "usabilla_form_load_error";
    pub const USABILLA_FORM_LOADED: &str = "usabilla_form_did_load";
}

/// A single operation the bridge knows how to route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Initialize,
    SetDebugEnabled,
    LoadFeedbackForm,
    PreloadFeedbackForms,
    RemoveCachedForms,
    Reset,
    SendEvent,
    SetCustomVariables,
    SetDataMasking,
    Dismiss,
    /// Recognised for parity with the iOS bridge; has no effect here.
    DisplayCampaign,
}

impl Command {
    /// Every command, in declaration order.
    pub const ALL: [Self; 11] = [
        Self::Initialize,
        Self::SetDebugEnabled,
        Self::LoadFeedbackForm,
        Self::PreloadFeedbackForms,
        Self::RemoveCachedForms,
        Self::Reset,
        Self::SendEvent,
        Self::SetCustomVariables,
        Self::SetDataMasking,
        Self::Dismiss,
        Self::DisplayCampaign,
    ];

    /// Wire token for this command.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::SetDebugEnabled => "debugenabled",
            Self::LoadFeedbackForm => "loadfeedbackform",
            Self::PreloadFeedbackForms => "preloadfeedbackforms",
            Self::RemoveCachedForms => "removecachedforms",
            Self::Reset => "resetcampaigndata",
            Self::SendEvent => "sendevent",
            Self::SetCustomVariables => "setcustomvariables",
            Self::SetDataMasking => "setdatamasking",
            Self::Dismiss => "dismissautomatically",
            Self::DisplayCampaign => "displaycampaign",
        }
    }

    /// Look up a command by its normalised (trimmed, lowercased) token.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.as_str() == token)
    }

    /// Payload keys this command reads.
    pub const fn payload_keys(&self) -> &'static [&'static str] {
        match self {
            Self::Initialize => &[keys::APP_ID],
            Self::SetDebugEnabled => &[keys::DEBUG_ENABLED],
            Self::LoadFeedbackForm => &[keys::FORM_ID, keys::FRAGMENT_ID],
            Self::PreloadFeedbackForms => &[keys::FORM_ID],
            Self::SendEvent => &[keys::EVENT_NAME],
            Self::SetCustomVariables => &[keys::CUSTOM],
            Self::SetDataMasking => &[keys::MASK_LIST, keys::MASK_CHAR],
            Self::RemoveCachedForms | Self::Reset | Self::Dismiss | Self::DisplayCampaign => &[],
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split a raw `command_name` value into normalised tokens.
///
/// Tokens are trimmed and lowercased; empty and unknown tokens are kept so
/// callers can decide what to ignore.
pub fn split_commands(command_name: &str) -> Vec<String> {
    command_name
        .split(constants::SEPARATOR)
        .map(|token| token.trim().to_lowercase())
        .collect()
}
