//! Port for the third-party feedback SDK.
//!
//! The SDK is a black box: rendering, networking and caching of forms all
//! happen behind this trait. The bridge owns exactly one handle to it.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::errors::SdkError;
use crate::domain::models::FormClient;

use super::screen::FragmentManager;

/// Notified once the SDK has finished initialising.
pub trait ReadyCallback: Send + Sync {
    fn on_usabilla_initialized(&self);
}

/// Receives the outcome of a single form load.
pub trait FormCallback: Send + Sync {
    /// The form loaded and its content can be displayed.
    fn form_load_success(&self, form: FormClient);

    /// The form could not be loaded.
    fn form_load_fail(&self);

    /// The SDK changed the label of the form's main button.
    fn main_button_text_updated(&self, _text: &str) {}
}

/// Operations exposed by the feedback SDK.
///
/// Every call may be made from any thread. Asynchronous work (initialisation,
/// form loads) reports back through the supplied callbacks, on a thread of the
/// SDK's choosing.
pub trait FeedbackSdk: Send + Sync {
    /// Start initialisation. `ready` is invoked once the SDK is usable.
    fn initialize(&self, app_id: &str, ready: Arc<dyn ReadyCallback>) -> Result<(), SdkError>;

    fn set_debug_enabled(&self, enabled: bool) -> Result<(), SdkError>;

    fn send_event(&self, event: &str) -> Result<(), SdkError>;

    /// Point the SDK at the fragment manager of the visible screen.
    fn update_fragment_manager(&self, manager: Arc<dyn FragmentManager>) -> Result<(), SdkError>;

    fn set_custom_variables(&self, variables: HashMap<String, String>) -> Result<(), SdkError>;

    fn load_feedback_form(
        &self,
        form_id: &str,
        callback: Arc<dyn FormCallback>,
    ) -> Result<(), SdkError>;

    fn preload_feedback_forms(&self, form_ids: Vec<String>) -> Result<(), SdkError>;

    fn remove_cached_forms(&self) -> Result<(), SdkError>;

    fn reset_campaign_data(&self) -> Result<(), SdkError>;

    fn dismiss(&self) -> Result<(), SdkError>;

    fn set_data_masking(&self, mask_list: Vec<String>, mask_char: char) -> Result<(), SdkError>;
}
