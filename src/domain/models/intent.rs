//! Process-local broadcast messages and filters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::feedback::FeedbackResult;

/// Action broadcast by the feedback SDK when a passive form closes.
pub const INTENT_CLOSE_FORM: &str = "com.usabilla.closeForm";
/// Action broadcast by the feedback SDK when a campaign form closes.
pub const INTENT_CLOSE_CAMPAIGN: &str = "com.usabilla.closeCampaign";

/// Extras key carrying a passive form's [`FeedbackResult`].
pub const INTENT_FEEDBACK_RESULT: &str = "feedbackResult";
/// Extras key carrying a campaign form's [`FeedbackResult`].
pub const INTENT_FEEDBACK_RESULT_CAMPAIGN: &str = "feedbackResultCampaign";

/// A broadcast message: an action name plus loosely typed extras.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub action: String,
    #[serde(default)]
    pub extras: Map<String, Value>,
}

impl Intent {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            extras: Map::new(),
        }
    }

    /// Passive form closure carrying `result`.
    pub fn passive_form_closed(result: FeedbackResult) -> Self {
        Self::new(INTENT_CLOSE_FORM).with_feedback_result(INTENT_FEEDBACK_RESULT, result)
    }

    /// Campaign form closure carrying `result`.
    pub fn campaign_form_closed(result: FeedbackResult) -> Self {
        Self::new(INTENT_CLOSE_CAMPAIGN).with_feedback_result(INTENT_FEEDBACK_RESULT_CAMPAIGN, result)
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    pub fn with_feedback_result(self, key: &str, result: FeedbackResult) -> Self {
        let value = serde_json::to_value(result).unwrap_or(Value::Null);
        self.with_extra(key, value)
    }

    /// Decode a [`FeedbackResult`] stored under `key`, if present and well formed.
    pub fn feedback_result(&self, key: &str) -> Option<FeedbackResult> {
        let value = self.extras.get(key)?;
        serde_json::from_value(value.clone()).ok()
    }
}

/// Set of actions a receiver is interested in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IntentFilter {
    actions: Vec<String>,
}

impl IntentFilter {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            actions: vec![action.into()],
        }
    }

    /// Filter matching passive form closures.
    pub fn closer_filter_passive() -> Self {
        Self::new(INTENT_CLOSE_FORM)
    }

    /// Filter matching campaign form closures.
    pub fn closer_filter_campaign() -> Self {
        Self::new(INTENT_CLOSE_CAMPAIGN)
    }

    pub fn add_action(mut self, action: impl Into<String>) -> Self {
        let action = action.into();
        if !self.actions.contains(&action) {
            self.actions.push(action);
        }
        self
    }

    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    pub fn matches(&self, intent: &Intent) -> bool {
        self.actions.iter().any(|action| *action == intent.action)
    }
}
