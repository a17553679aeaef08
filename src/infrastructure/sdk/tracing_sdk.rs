//! A [`FeedbackSdk`] that renders nothing and logs every call.
//!
//! Used by the CLI to exercise the bridge end to end without a device.
//! Initialisation completes synchronously, and forms load successfully
//! unless the adapter was built with [`TracingFeedbackSdk::failing_form_loads`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::domain::errors::SdkError;
use crate::domain::models::constants::LOG_TARGET;
use crate::domain::models::FormClient;
use crate::domain::ports::{FeedbackSdk, FormCallback, FragmentManager, ReadyCallback};

#[derive(Default)]
pub struct TracingFeedbackSdk {
    initialized: AtomicBool,
    fail_form_loads: bool,
    cached_forms: RwLock<Vec<String>>,
}

impl TracingFeedbackSdk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every form load reports failure to its callback.
    pub fn failing_form_loads() -> Self {
        Self {
            fail_form_loads: true,
            ..Self::default()
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Form ids currently preloaded.
    pub fn cached_forms(&self) -> Vec<String> {
        self.cached_forms.read().clone()
    }

    fn ensure_initialized(&self, operation: &str) -> Result<(), SdkError> {
        if self.is_initialized() {
            Ok(())
        } else {
            info!(target: LOG_TARGET, operation, "rejected: sdk not initialized");
            Err(SdkError::NotInitialized)
        }
    }
}

impl FeedbackSdk for TracingFeedbackSdk {
    fn initialize(&self, app_id: &str, ready: Arc<dyn ReadyCallback>) -> Result<(), SdkError> {
        info!(target: LOG_TARGET, app_id, "sdk.initialize");
        self.initialized.store(true, Ordering::SeqCst);
        ready.on_usabilla_initialized();
        Ok(())
    }

    fn set_debug_enabled(&self, enabled: bool) -> Result<(), SdkError> {
        info!(target: LOG_TARGET, enabled, "sdk.set_debug_enabled");
        Ok(())
    }

    fn send_event(&self, event: &str) -> Result<(), SdkError> {
        self.ensure_initialized("send_event")?;
        info!(target: LOG_TARGET, event, "sdk.send_event");
        Ok(())
    }

    fn update_fragment_manager(&self, _manager: Arc<dyn FragmentManager>) -> Result<(), SdkError> {
        info!(target: LOG_TARGET, "sdk.update_fragment_manager");
        Ok(())
    }

    fn set_custom_variables(&self, variables: HashMap<String, String>) -> Result<(), SdkError> {
        info!(target: LOG_TARGET, ?variables, "sdk.set_custom_variables");
        Ok(())
    }

    fn load_feedback_form(&self, form_id: &str, callback: Arc<dyn FormCallback>) -> Result<(), SdkError> {
        self.ensure_initialized("load_feedback_form")?;
        info!(target: LOG_TARGET, form_id, "sdk.load_feedback_form");
        if self.fail_form_loads {
            callback.form_load_fail();
        } else {
            callback.form_load_success(FormClient::new(form_id));
        }
        Ok(())
    }

    fn preload_feedback_forms(&self, form_ids: Vec<String>) -> Result<(), SdkError> {
        self.ensure_initialized("preload_feedback_forms")?;
        info!(target: LOG_TARGET, ?form_ids, "sdk.preload_feedback_forms");
        let mut cached = self.cached_forms.write();
        for form_id in form_ids {
            if !cached.contains(&form_id) {
                cached.push(form_id);
            }
        }
        Ok(())
    }

    fn remove_cached_forms(&self) -> Result<(), SdkError> {
        info!(target: LOG_TARGET, "sdk.remove_cached_forms");
        self.cached_forms.write().clear();
        Ok(())
    }

    fn reset_campaign_data(&self) -> Result<(), SdkError> {
        info!(target: LOG_TARGET, "sdk.reset_campaign_data");
        Ok(())
    }

    fn dismiss(&self) -> Result<(), SdkError> {
        info!(target: LOG_TARGET, "sdk.dismiss");
        Ok(())
    }

    fn set_data_masking(&self, mask_list: Vec<String>, mask_char: char) -> Result<(), SdkError> {
        info!(target: LOG_TARGET, ?mask_list, %mask_char, "sdk.set_data_masking");
        Ok(())
    }
}
