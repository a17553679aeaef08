//! Tracking backend: the stateful implementation of [`UsabillaCommand`].
//!
//! Holds the feedback SDK handle, follows the visible screen through
//! lifecycle notifications, and turns form outcomes into tracked events.
//! The two feedback receivers, the lifecycle observer and the ready callback
//! are created once in [`UsabillaInstance::new`] and share one [`TrackerState`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::domain::errors::BridgeResult;
use crate::domain::models::constants::{FRAGMENT_TAG_NAME, LOG_TARGET};
use crate::domain::models::{FeedbackResult, FormFragment};
use crate::domain::ports::{
    BroadcastReceiver, FeedbackSdk, FormCallback, FragmentManager, FragmentTransaction,
    LifecycleObserver, ReadyCallback, RemoteCommandContext, ScreenContainer, UsabillaCommand,
};

use super::feedback_receivers::{CampaignFeedbackReceiver, PassiveFeedbackReceiver};
use super::form_callback::DefaultFormCallback;

/// State shared between the backend and the listeners it owns.
pub(crate) struct TrackerState {
    sdk: Arc<dyn FeedbackSdk>,
    current_container: RwLock<Option<Weak<dyn ScreenContainer>>>,
    initialized: AtomicBool,
    context: RwLock<Option<Arc<dyn RemoteCommandContext>>>,
    ready_callback: Option<Arc<dyn ReadyCallback>>,
}

impl TrackerState {
    fn set_current_container(&self, container: &Arc<dyn ScreenContainer>) {
        *self.current_container.write() = Some(Arc::downgrade(container));
    }

    pub(crate) fn current_container(&self) -> Option<Arc<dyn ScreenContainer>> {
        self.current_container.read().as_ref().and_then(Weak::upgrade)
    }

    /// Fragment manager of the visible screen, if it can host fragments.
    pub(crate) fn fragment_manager(&self) -> Option<Arc<dyn FragmentManager>> {
        self.current_container()?.fragment_manager()
    }

    /// Attach `fragment` to `fragment_id` under the passive feedback tag.
    ///
    /// Dropped silently when there is no fragment or no screen able to host it.
    pub(crate) fn add_passive_feedback_fragment(&self, fragment: Option<FormFragment>, fragment_id: i32) {
        let Some(fragment) = fragment else {
            return;
        };
        match self.fragment_manager() {
            Some(manager) => {
                debug!(target: LOG_TARGET, form_id = %fragment.form_id, fragment_id, "attaching passive feedback form");
                manager.commit(FragmentTransaction::new().replace(
                    fragment_id,
                    fragment,
                    FRAGMENT_TAG_NAME,
                ));
            }
            None => {
                debug!(target: LOG_TARGET, form_id = %fragment.form_id, "no active fragment manager, form not attached");
            }
        }
    }

    /// Remove whatever is attached under the passive feedback tag.
    pub(crate) fn remove_passive_feedback_fragment(&self) {
        let Some(manager) = self.fragment_manager() else {
            return;
        };
        if let Some(fragment) = manager.find_fragment_by_tag(FRAGMENT_TAG_NAME) {
            debug!(target: LOG_TARGET, form_id = %fragment.form_id, "removing passive feedback form");
            manager.commit(FragmentTransaction::new().remove(fragment));
        }
    }

    /// Track `event_name` into the current context, if one is set.
    pub(crate) fn track(&self, event_name: &str, data: Option<Map<String, Value>>) {
        let context = self.context.read().clone();
        match context {
            Some(context) => context.track(event_name, data.unwrap_or_default()),
            None => debug!(target: LOG_TARGET, event_name, "no tracking context, event dropped"),
        }
    }

    pub(crate) fn track_feedback_result(&self, event_name: &str, feedback: &FeedbackResult) {
        self.track(event_name, Some(feedback.to_properties()));
    }

    fn refresh_fragment_manager(&self) {
        if let Some(manager) = self.fragment_manager() {
            if let Err(err) = self.sdk.update_fragment_manager(manager) {
                warn!(target: LOG_TARGET, error = %err, "failed to update fragment manager");
            }
        }
    }

    fn on_ready(&self) {
        self.initialized.store(true, Ordering::SeqCst);
        info!(target: LOG_TARGET, "feedback SDK initialized");
        self.refresh_fragment_manager();

        if let Some(callback) = &self.ready_callback {
            callback.on_usabilla_initialized();
        }
    }
}

/// Follows the visible screen. Registered with the host's lifecycle registry.
pub struct ContainerLifecycleObserver {
    state: Arc<TrackerState>,
}

impl LifecycleObserver for ContainerLifecycleObserver {
    fn on_container_created(&self, container: &Arc<dyn ScreenContainer>) {
        self.state.set_current_container(container);
    }

    fn on_container_started(&self, container: &Arc<dyn ScreenContainer>) {
        self.state.set_current_container(container);
        // Handing the SDK a fragment manager before it is initialised fails
        if self.state.initialized.load(Ordering::SeqCst) {
            self.state.refresh_fragment_manager();
        }
    }

    fn on_container_resumed(&self, container: &Arc<dyn ScreenContainer>) {
        self.state.set_current_container(container);
    }
}

/// Handed to the SDK on every `initialize`.
pub struct InstanceReadyCallback {
    state: Arc<TrackerState>,
}

impl ReadyCallback for InstanceReadyCallback {
    fn on_usabilla_initialized(&self) {
        self.state.on_ready();
    }
}

/// Production [`UsabillaCommand`] backed by a [`FeedbackSdk`].
pub struct UsabillaInstance {
    state: Arc<TrackerState>,
    lifecycle_observer: Arc<ContainerLifecycleObserver>,
    ready_callback: Arc<InstanceReadyCallback>,
    passive_receiver: Arc<PassiveFeedbackReceiver>,
    campaign_receiver: Arc<CampaignFeedbackReceiver>,
}

impl UsabillaInstance {
    /// Create a backend around `sdk`. `ready_callback` is forwarded every
    /// time the SDK reports that it finished initialising.
    pub fn new(sdk: Arc<dyn FeedbackSdk>, ready_callback: Option<Arc<dyn ReadyCallback>>) -> Self {
        let state = Arc::new(TrackerState {
            sdk,
            current_container: RwLock::new(None),
            initialized: AtomicBool::new(false),
            context: RwLock::new(None),
            ready_callback,
        });

        Self {
            lifecycle_observer: Arc::new(ContainerLifecycleObserver {
                state: Arc::clone(&state),
            }),
            ready_callback: Arc::new(InstanceReadyCallback {
                state: Arc::clone(&state),
            }),
            passive_receiver: Arc::new(PassiveFeedbackReceiver::new(Arc::clone(&state))),
            campaign_receiver: Arc::new(CampaignFeedbackReceiver::new(Arc::clone(&state))),
            state,
        }
    }

    /// Set the tracking context up front.
    pub fn with_context(self, context: Arc<dyn RemoteCommandContext>) -> Self {
        self.set_command_context(context);
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.state.initialized.load(Ordering::SeqCst)
    }

    /// The screen most recently created, started or resumed, while it is alive.
    pub fn current_container(&self) -> Option<Arc<dyn ScreenContainer>> {
        self.state.current_container()
    }

    /// Fragment manager of the current screen, if it has one.
    pub fn fragment_manager(&self) -> Option<Arc<dyn FragmentManager>> {
        self.state.fragment_manager()
    }

    /// Adds `fragment` to the current screen in the container `fragment_id`,
    /// tagged with [`FRAGMENT_TAG_NAME`]. The host applies the change later.
    pub fn add_passive_feedback_fragment(&self, fragment: Option<FormFragment>, fragment_id: i32) {
        self.state.add_passive_feedback_fragment(fragment, fragment_id);
    }

    /// Removes the passive feedback fragment, looked up by [`FRAGMENT_TAG_NAME`].
    pub fn remove_passive_feedback_fragment(&self) {
        self.state.remove_passive_feedback_fragment();
    }

    /// Callback used when a form is loaded without a caller-supplied one.
    ///
    /// On success the form is attached to `fragment_id` and
    /// `usabilla_form_did_load` is tracked; on failure
    /// `usabilla_form_load_error` is tracked.
    pub fn default_form_callback(&self, fragment_id: i32) -> Arc<dyn FormCallback> {
        Arc::new(DefaultFormCallback::new(Arc::clone(&self.state), fragment_id))
    }
}

impl UsabillaCommand for UsabillaInstance {
    fn initialize(&self, app_id: Option<&str>) -> BridgeResult<()> {
        let Some(app_id) = app_id.filter(|id| !id.trim().is_empty()) else {
            debug!(target: LOG_TARGET, "initialize skipped: no app id");
            return Ok(());
        };
        let ready: Arc<dyn ReadyCallback> = self.ready_callback.clone();
        self.state.sdk.initialize(app_id, ready)?;
        Ok(())
    }

    fn set_debug_enabled(&self, enabled: bool) -> BridgeResult<()> {
        self.state.sdk.set_debug_enabled(enabled)?;
        Ok(())
    }

    fn send_event(&self, event: Option<&str>) -> BridgeResult<()> {
        if let Some(event) = event.filter(|e| !e.trim().is_empty()) {
            self.state.sdk.send_event(event)?;
        }
        Ok(())
    }

    fn update_fragment_manager(&self, manager: Arc<dyn FragmentManager>) -> BridgeResult<()> {
        self.state.sdk.update_fragment_manager(manager)?;
        Ok(())
    }

    fn set_custom_variables(&self, variables: Option<&Map<String, Value>>) -> BridgeResult<()> {
        let Some(variables) = variables else {
            return Ok(());
        };
        let custom: HashMap<String, String> = variables
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), text)
            })
            .collect();
        self.state.sdk.set_custom_variables(custom)?;
        Ok(())
    }

    fn load_feedback_form(
        &self,
        form_id: &str,
        callback: Option<Arc<dyn FormCallback>>,
        fragment_id: i32,
    ) -> BridgeResult<()> {
        let callback = callback.unwrap_or_else(|| self.default_form_callback(fragment_id));
        self.state.sdk.load_feedback_form(form_id, callback)?;
        Ok(())
    }

    fn preload_feedback_forms(&self, form_ids: Option<Vec<String>>) -> BridgeResult<()> {
        if let Some(form_ids) = form_ids.filter(|ids| !ids.is_empty()) {
            self.state.sdk.preload_feedback_forms(form_ids)?;
        }
        Ok(())
    }

    fn remove_cached_forms(&self) -> BridgeResult<()> {
        self.state.sdk.remove_cached_forms()?;
        Ok(())
    }

    fn reset(&self) -> BridgeResult<()> {
        self.state.sdk.reset_campaign_data()?;
        Ok(())
    }

    fn dismiss(&self) -> BridgeResult<()> {
        self.state.sdk.dismiss()?;
        Ok(())
    }

    fn set_data_masking(&self, mask_list: &[String], mask_char: char) -> BridgeResult<()> {
        self.state.sdk.set_data_masking(mask_list.to_vec(), mask_char)?;
        Ok(())
    }

    fn set_command_context(&self, context: Arc<dyn RemoteCommandContext>) {
        *self.state.context.write() = Some(context);
    }

    fn lifecycle_observer(&self) -> Arc<dyn LifecycleObserver> {
        self.lifecycle_observer.clone()
    }

    fn passive_feedback_receiver(&self) -> Arc<dyn BroadcastReceiver> {
        self.passive_receiver.clone()
    }

    fn campaign_feedback_receiver(&self) -> Arc<dyn BroadcastReceiver> {
        self.campaign_receiver.clone()
    }
}

impl LifecycleObserver for UsabillaInstance {
    fn on_container_created(&self, container: &Arc<dyn ScreenContainer>) {
        self.lifecycle_observer.on_container_created(container);
    }

    fn on_container_started(&self, container: &Arc<dyn ScreenContainer>) {
        self.lifecycle_observer.on_container_started(container);
    }

    fn on_container_resumed(&self, container: &Arc<dyn ScreenContainer>) {
        self.lifecycle_observer.on_container_resumed(container);
    }
}

impl ReadyCallback for UsabillaInstance {
    fn on_usabilla_initialized(&self) {
        self.state.on_ready();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{BridgeError, SdkError};
    use crate::domain::models::FormClient;
    use crate::domain::ports::FragmentOp;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct StubSdk {
        calls: Mutex<Vec<String>>,
        ready: Mutex<Option<Arc<dyn ReadyCallback>>>,
        fail_dismiss: bool,
    }

    impl StubSdk {
        fn record(&self, call: impl Into<String>) -> Result<(), SdkError> {
            self.calls.lock().push(call.into());
            Ok(())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    impl FeedbackSdk for StubSdk {
        fn initialize(&self, app_id: &str, ready: Arc<dyn ReadyCallback>) -> Result<(), SdkError> {
            *self.ready.lock() = Some(ready);
            self.record(format!("initialize:{app_id}"))
        }

        fn set_debug_enabled(&self, enabled: bool) -> Result<(), SdkError> {
            self.record(format!("debug:{enabled}"))
        }

        fn send_event(&self, event: &str) -> Result<(), SdkError> {
            self.record(format!("event:{event}"))
        }

        fn update_fragment_manager(&self, _manager: Arc<dyn FragmentManager>) -> Result<(), SdkError> {
            self.record("update_fragment_manager")
        }

        fn set_custom_variables(&self, variables: HashMap<String, String>) -> Result<(), SdkError> {
            let mut pairs: Vec<_> = variables.into_iter().map(|(k, v)| format!("{k}={v}")).collect();
            pairs.sort();
            self.record(format!("custom:{}", pairs.join("&")))
        }

        fn load_feedback_form(&self, form_id: &str, callback: Arc<dyn FormCallback>) -> Result<(), SdkError> {
            callback.form_load_success(FormClient::new(form_id));
            self.record(format!("load:{form_id}"))
        }

        fn preload_feedback_forms(&self, form_ids: Vec<String>) -> Result<(), SdkError> {
            self.record(format!("preload:{}", form_ids.join("|")))
        }

        fn remove_cached_forms(&self) -> Result<(), SdkError> {
            self.record("remove_cached_forms")
        }

        fn reset_campaign_data(&self) -> Result<(), SdkError> {
            self.record("reset")
        }

        fn dismiss(&self) -> Result<(), SdkError> {
            if self.fail_dismiss {
                return Err(SdkError::NotInitialized);
            }
            self.record("dismiss")
        }

        fn set_data_masking(&self, mask_list: Vec<String>, mask_char: char) -> Result<(), SdkError> {
            self.record(format!("mask:{}:{mask_char}", mask_list.join("|")))
        }
    }

    #[derive(Default)]
    struct ImmediateFragments {
        attached: Mutex<Option<(i32, FormFragment)>>,
    }

    impl FragmentManager for ImmediateFragments {
        fn find_fragment_by_tag(&self, tag: &str) -> Option<FormFragment> {
            (tag == FRAGMENT_TAG_NAME)
                .then(|| self.attached.lock().as_ref().map(|(_, f)| f.clone()))
                .flatten()
        }

        fn commit(&self, transaction: FragmentTransaction) {
            for op in transaction.into_ops() {
                match op {
                    FragmentOp::Replace { container_id, fragment, .. } => {
                        *self.attached.lock() = Some((container_id, fragment));
                    }
                    FragmentOp::Remove { .. } => {
                        *self.attached.lock() = None;
                    }
                }
            }
        }
    }

    struct Screen {
        name: &'static str,
        fragments: Option<Arc<ImmediateFragments>>,
    }

    impl ScreenContainer for Screen {
        fn name(&self) -> &str {
            self.name
        }

        fn fragment_manager(&self) -> Option<Arc<dyn FragmentManager>> {
            self.fragments.clone().map(|f| f as Arc<dyn FragmentManager>)
        }
    }

    #[derive(Default)]
    struct Sink {
        events: Mutex<Vec<(String, Map<String, Value>)>>,
    }

    impl RemoteCommandContext for Sink {
        fn track(&self, event_name: &str, data: Map<String, Value>) {
            self.events.lock().push((event_name.to_string(), data));
        }
    }

    struct CountingReady(AtomicUsize);

    impl ReadyCallback for CountingReady {
        fn on_usabilla_initialized(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn fragment_screen(name: &'static str) -> (Arc<ImmediateFragments>, Arc<dyn ScreenContainer>) {
        let fragments = Arc::new(ImmediateFragments::default());
        let screen: Arc<dyn ScreenContainer> = Arc::new(Screen {
            name,
            fragments: Some(fragments.clone()),
        });
        (fragments, screen)
    }

    #[test]
    fn test_argument_validation_no_ops() {
        let sdk = Arc::new(StubSdk::default());
        let instance = UsabillaInstance::new(sdk.clone(), None);

        instance.initialize(None).unwrap();
        instance.initialize(Some("  ")).unwrap();
        instance.send_event(None).unwrap();
        instance.send_event(Some(" ")).unwrap();
        instance.set_custom_variables(None).unwrap();
        instance.preload_feedback_forms(None).unwrap();
        instance.preload_feedback_forms(Some(vec![])).unwrap();

        assert!(sdk.calls().is_empty());
    }

    #[test]
    fn test_custom_variables_are_stringified() {
        let sdk = Arc::new(StubSdk::default());
        let instance = UsabillaInstance::new(sdk.clone(), None);
        let vars = serde_json::json!({ "s": "text", "i": 10, "b": false, "d": 100.5, "n": null });

        instance.set_custom_variables(vars.as_object()).unwrap();

        assert_eq!(sdk.calls(), vec!["custom:b=false&d=100.5&i=10&n=null&s=text"]);
    }

    #[test]
    fn test_sdk_failure_propagates() {
        let sdk = Arc::new(StubSdk {
            fail_dismiss: true,
            ..StubSdk::default()
        });
        let instance = UsabillaInstance::new(sdk, None);

        assert!(matches!(
            instance.dismiss(),
            Err(BridgeError::Sdk(SdkError::NotInitialized))
        ));
    }

    #[test]
    fn test_default_callback_attaches_and_tracks() {
        let sdk = Arc::new(StubSdk::default());
        let sink = Arc::new(Sink::default());
        let instance = UsabillaInstance::new(sdk, None).with_context(sink.clone());
        let (fragments, screen) = fragment_screen("main");
        instance.on_container_started(&screen);

        instance.load_feedback_form("form-1", None, 42).unwrap();

        let attached = fragments.attached.lock().clone();
        assert_eq!(attached.map(|(id, f)| (id, f.form_id)), Some((42, "form-1".to_string())));
        let events = sink.events.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "usabilla_form_did_load");
        assert!(events[0].1.is_empty());
    }

    #[test]
    fn test_ready_refreshes_fragment_manager_and_forwards() {
        let sdk = Arc::new(StubSdk::default());
        let ready = Arc::new(CountingReady(AtomicUsize::new(0)));
        let instance = UsabillaInstance::new(sdk.clone(), Some(ready.clone()));
        let (_fragments, screen) = fragment_screen("main");

        // Not initialised yet: started only records the screen
        instance.on_container_started(&screen);
        assert!(sdk.calls().is_empty());

        instance.initialize(Some("app-id")).unwrap();
        let sdk_ready = sdk.ready.lock().clone().unwrap();
        sdk_ready.on_usabilla_initialized();

        assert!(instance.is_initialized());
        assert_eq!(sdk.calls(), vec!["initialize:app-id", "update_fragment_manager"]);
        assert_eq!(ready.0.load(Ordering::SeqCst), 1);

        // Initialised: started refreshes, resumed does not
        instance.on_container_started(&screen);
        instance.on_container_resumed(&screen);
        assert_eq!(
            sdk.calls(),
            vec!["initialize:app-id", "update_fragment_manager", "update_fragment_manager"]
        );
    }

    #[test]
    fn test_container_reference_is_weak_and_last_wins() {
        let instance = UsabillaInstance::new(Arc::new(StubSdk::default()), None);
        let (_a_fragments, first) = fragment_screen("first");
        let (_b_fragments, second) = fragment_screen("second");

        instance.on_container_created(&first);
        instance.on_container_started(&second);
        assert_eq!(instance.current_container().map(|c| c.name().to_string()).as_deref(), Some("second"));

        drop(second);
        assert!(instance.current_container().is_none());
        assert!(instance.fragment_manager().is_none());
    }

    #[test]
    fn test_listener_identities_are_stable() {
        let instance = UsabillaInstance::new(Arc::new(StubSdk::default()), None);
        assert!(std::ptr::addr_eq(
            Arc::as_ptr(&instance.passive_feedback_receiver()),
            Arc::as_ptr(&instance.passive_feedback_receiver())
        ));
        assert!(std::ptr::addr_eq(
            Arc::as_ptr(&instance.lifecycle_observer()),
            Arc::as_ptr(&instance.lifecycle_observer())
        ));
        assert!(!std::ptr::addr_eq(
            Arc::as_ptr(&instance.passive_feedback_receiver()),
            Arc::as_ptr(&instance.campaign_feedback_receiver())
        ));
    }
}
