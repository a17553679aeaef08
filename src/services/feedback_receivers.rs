//! Broadcast receivers for form closures.
//!
//! The passive receiver also detaches the injected form before reporting.
//! Both track `usabilla_form_closed` when the broadcast carries a decodable
//! [`FeedbackResult`], and do nothing else otherwise.

use std::sync::Arc;

use tracing::debug;

use crate::domain::models::constants::LOG_TARGET;
use crate::domain::models::{events, Intent, INTENT_FEEDBACK_RESULT, INTENT_FEEDBACK_RESULT_CAMPAIGN};
use crate::domain::ports::BroadcastReceiver;

use super::usabilla_instance::TrackerState;

pub struct PassiveFeedbackReceiver {
    state: Arc<TrackerState>,
}

impl PassiveFeedbackReceiver {
    pub(crate) const fn new(state: Arc<TrackerState>) -> Self {
        Self { state }
    }
}

impl BroadcastReceiver for PassiveFeedbackReceiver {
    fn on_receive(&self, intent: &Intent) {
        self.state.remove_passive_feedback_fragment();

        match intent.feedback_result(INTENT_FEEDBACK_RESULT) {
            Some(result) => self
                .state
                .track_feedback_result(events::USABILLA_FORM_CLOSED, &result),
            None => debug!(target: LOG_TARGET, action = %intent.action, "passive close without feedback result"),
        }
    }
}

pub struct CampaignFeedbackReceiver {
    state: Arc<TrackerState>,
}

impl CampaignFeedbackReceiver {
    pub(crate) const fn new(state: Arc<TrackerState>) -> Self {
        Self { state }
    }
}

impl BroadcastReceiver for CampaignFeedbackReceiver {
    fn on_receive(&self, intent: &Intent) {
        match intent.feedback_result(INTENT_FEEDBACK_RESULT_CAMPAIGN) {
            Some(result) => self
                .state
                .track_feedback_result(events::USABILLA_FORM_CLOSED, &result),
            None => debug!(target: LOG_TARGET, action = %intent.action, "campaign close without feedback result"),
        }
    }
}
