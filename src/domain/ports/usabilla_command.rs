//! Capability interface the command router dispatches into.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::domain::errors::BridgeResult;

use super::broadcast::BroadcastReceiver;
use super::feedback_sdk::{FormCallback, ReadyCallback};
use super::screen::{FragmentManager, LifecycleObserver};
use super::tracking::RemoteCommandContext;

/// Contract a feedback-tracking backend must satisfy.
///
/// Argument validation failures are silent no-ops; only failures from the
/// underlying SDK surface as errors. Implementations also observe the host's
/// screen lifecycle and the SDK's ready notification.
///
/// The `Arc` accessors must return the same instances for the lifetime of
/// the implementation so that unregistering always targets what was registered.
pub trait UsabillaCommand: LifecycleObserver + ReadyCallback + Send + Sync {
    /// Start SDK initialisation. No-op when `app_id` is absent or blank.
    fn initialize(&self, app_id: Option<&str>) -> BridgeResult<()>;

    fn set_debug_enabled(&self, enabled: bool) -> BridgeResult<()>;

    /// Forward a custom event. No-op when `event` is absent or blank.
    fn send_event(&self, event: Option<&str>) -> BridgeResult<()>;

    fn update_fragment_manager(&self, manager: Arc<dyn FragmentManager>) -> BridgeResult<()>;

    /// Forward custom variables, every value rendered as a string. No-op when absent.
    fn set_custom_variables(&self, variables: Option<&Map<String, Value>>) -> BridgeResult<()>;

    /// Load a form. Without `callback` a default one is used that attaches the
    /// form to `fragment_id` and reports the outcome to the tracking context.
    fn load_feedback_form(
        &self,
        form_id: &str,
        callback: Option<Arc<dyn FormCallback>>,
        fragment_id: i32,
    ) -> BridgeResult<()>;

    /// Preload forms. No-op when absent or empty.
    fn preload_feedback_forms(&self, form_ids: Option<Vec<String>>) -> BridgeResult<()>;

    fn remove_cached_forms(&self) -> BridgeResult<()>;

    fn reset(&self) -> BridgeResult<()>;

    fn dismiss(&self) -> BridgeResult<()>;

    fn set_data_masking(&self, mask_list: &[String], mask_char: char) -> BridgeResult<()>;

    fn set_command_context(&self, context: Arc<dyn RemoteCommandContext>);

    /// Observer to register with the host application's lifecycle.
    fn lifecycle_observer(&self) -> Arc<dyn LifecycleObserver>;

    /// Receiver for passive form closures.
    fn passive_feedback_receiver(&self) -> Arc<dyn BroadcastReceiver>;

    /// Receiver for campaign form closures.
    fn campaign_feedback_receiver(&self) -> Arc<dyn BroadcastReceiver>;
}
