//! Default handling of form load outcomes.

use std::sync::Arc;

use tracing::debug;

use crate::domain::models::constants::LOG_TARGET;
use crate::domain::models::events;
use crate::domain::models::FormClient;
use crate::domain::ports::FormCallback;

use super::usabilla_instance::TrackerState;

/// Attaches a loaded form to the current screen and reports the outcome.
pub(crate) struct DefaultFormCallback {
    state: Arc<TrackerState>,
    fragment_id: i32,
}

impl DefaultFormCallback {
    pub(crate) const fn new(state: Arc<TrackerState>, fragment_id: i32) -> Self {
        Self { state, fragment_id }
    }
}

impl FormCallback for DefaultFormCallback {
    fn form_load_success(&self, form: FormClient) {
        debug!(target: LOG_TARGET, form_id = %form.form_id, fragment_id = self.fragment_id, "form loaded");
        self.state
            .add_passive_feedback_fragment(form.fragment, self.fragment_id);
        self.state.track(events::USABILLA_FORM_LOADED, None);
    }

    fn form_load_fail(&self) {
        debug!(target: LOG_TARGET, fragment_id = self.fragment_id, "form failed to load");
        self.state.track(events::USABILLA_FORM_LOAD_ERROR, None);
    }
}
