//! Domain errors for the Usabilla bridge.

use thiserror::Error;

/// Failures reported by the feedback SDK behind [`FeedbackSdk`](super::ports::FeedbackSdk).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SdkError {
    #[error("Feedback SDK is not initialized")]
    NotInitialized,

    #[error("Feedback SDK rejected {operation}: {reason}")]
    Rejected { operation: String, reason: String },

    #[error("Feedback SDK unavailable: {0}")]
    Unavailable(String),
}

impl SdkError {
    pub fn rejected(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while executing a single bridge command.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("SDK error: {0}")]
    Sdk(#[from] SdkError),

    #[error("Invalid payload value for '{key}': {reason}")]
    InvalidPayload { key: String, reason: String },
}

pub type BridgeResult<T> = Result<T, BridgeError>;
