//! Test doubles shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Map, Value};

use usabilla_remote_command::domain::errors::{BridgeResult, SdkError};
use usabilla_remote_command::domain::models::{FormClient, FormFragment, Intent};
use usabilla_remote_command::domain::ports::{
    BroadcastReceiver, FeedbackSdk, FormCallback, FragmentManager, FragmentOp,
    FragmentTransaction, LifecycleObserver, ReadyCallback, RemoteCommandContext, Response,
    ResponseSink, ScreenContainer, UsabillaCommand,
};

// ---------------------------------------------------------------------------
// Capability double
// ---------------------------------------------------------------------------

/// A call received by [`RecordingCapability`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Initialize(Option<String>),
    SetDebugEnabled(bool),
    SendEvent(Option<String>),
    UpdateFragmentManager,
    SetCustomVariables(Option<Map<String, Value>>),
    LoadFeedbackForm {
        form_id: String,
        has_callback: bool,
        fragment_id: i32,
    },
    PreloadFeedbackForms(Option<Vec<String>>),
    RemoveCachedForms,
    Reset,
    Dismiss,
    SetDataMasking(Vec<String>, char),
    Ready,
}

#[derive(Default)]
pub struct CountingReceiver(AtomicUsize);

impl CountingReceiver {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl BroadcastReceiver for CountingReceiver {
    fn on_receive(&self, _intent: &Intent) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct CountingObserver(AtomicUsize);

impl CountingObserver {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl LifecycleObserver for CountingObserver {
    fn on_container_created(&self, _container: &Arc<dyn ScreenContainer>) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    fn on_container_started(&self, _container: &Arc<dyn ScreenContainer>) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    fn on_container_resumed(&self, _container: &Arc<dyn ScreenContainer>) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Records every capability call. Calls named in `failing` return an SDK error.
#[derive(Default)]
pub struct RecordingCapability {
    calls: Mutex<Vec<Call>>,
    failing: Mutex<Vec<&'static str>>,
    pub observer: Arc<CountingObserver>,
    pub passive: Arc<CountingReceiver>,
    pub campaign: Arc<CountingReceiver>,
}

impl RecordingCapability {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    /// Make the named operation fail from now on.
    pub fn fail_on(&self, operation: &'static str) {
        self.failing.lock().push(operation);
    }

    fn record(&self, operation: &'static str, call: Call) -> BridgeResult<()> {
        self.calls.lock().push(call);
        if self.failing.lock().contains(&operation) {
            return Err(SdkError::rejected(operation, "configured to fail").into());
        }
        Ok(())
    }
}

impl LifecycleObserver for RecordingCapability {
    fn on_container_created(&self, container: &Arc<dyn ScreenContainer>) {
        self.observer.on_container_created(container);
    }

    fn on_container_started(&self, container: &Arc<dyn ScreenContainer>) {
        self.observer.on_container_started(container);
    }

    fn on_container_resumed(&self, container: &Arc<dyn ScreenContainer>) {
        self.observer.on_container_resumed(container);
    }
}

impl ReadyCallback for RecordingCapability {
    fn on_usabilla_initialized(&self) {
        self.calls.lock().push(Call::Ready);
    }
}

impl UsabillaCommand for RecordingCapability {
    fn initialize(&self, app_id: Option<&str>) -> BridgeResult<()> {
        self.record("initialize", Call::Initialize(app_id.map(str::to_string)))
    }

    fn set_debug_enabled(&self, enabled: bool) -> BridgeResult<()> {
        self.record("set_debug_enabled", Call::SetDebugEnabled(enabled))
    }

    fn send_event(&self, event: Option<&str>) -> BridgeResult<()> {
        self.record("send_event", Call::SendEvent(event.map(str::to_string)))
    }

    fn update_fragment_manager(&self, _manager: Arc<dyn FragmentManager>) -> BridgeResult<()> {
        self.record("update_fragment_manager", Call::UpdateFragmentManager)
    }

    fn set_custom_variables(&self, variables: Option<&Map<String, Value>>) -> BridgeResult<()> {
        self.record(
            "set_custom_variables",
            Call::SetCustomVariables(variables.cloned()),
        )
    }

    fn load_feedback_form(
        &self,
        form_id: &str,
        callback: Option<Arc<dyn FormCallback>>,
        fragment_id: i32,
    ) -> BridgeResult<()> {
        self.record(
            "load_feedback_form",
            Call::LoadFeedbackForm {
                form_id: form_id.to_string(),
                has_callback: callback.is_some(),
                fragment_id,
            },
        )
    }

    fn preload_feedback_forms(&self, form_ids: Option<Vec<String>>) -> BridgeResult<()> {
        self.record("preload_feedback_forms", Call::PreloadFeedbackForms(form_ids))
    }

    fn remove_cached_forms(&self) -> BridgeResult<()> {
        self.record("remove_cached_forms", Call::RemoveCachedForms)
    }

    fn reset(&self) -> BridgeResult<()> {
        self.record("reset", Call::Reset)
    }

    fn dismiss(&self) -> BridgeResult<()> {
        self.record("dismiss", Call::Dismiss)
    }

    fn set_data_masking(&self, mask_list: &[String], mask_char: char) -> BridgeResult<()> {
        self.record(
            "set_data_masking",
            Call::SetDataMasking(mask_list.to_vec(), mask_char),
        )
    }

    fn set_command_context(&self, _context: Arc<dyn RemoteCommandContext>) {}

    fn lifecycle_observer(&self) -> Arc<dyn LifecycleObserver> {
        self.observer.clone()
    }

    fn passive_feedback_receiver(&self) -> Arc<dyn BroadcastReceiver> {
        self.passive.clone()
    }

    fn campaign_feedback_receiver(&self) -> Arc<dyn BroadcastReceiver> {
        self.campaign.clone()
    }
}

// ---------------------------------------------------------------------------
// Feedback SDK double
// ---------------------------------------------------------------------------

/// How [`RecordingSdk`] answers form loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormOutcome {
    #[default]
    Success,
    Failure,
    /// Keep the callback; the test completes it with [`RecordingSdk::complete_load`].
    Deferred,
}

/// Records SDK calls. Initialisation completes only when the test calls
/// [`RecordingSdk::complete_initialize`], like a real asynchronous start-up.
#[derive(Default)]
pub struct RecordingSdk {
    calls: Mutex<Vec<String>>,
    ready: Mutex<Option<Arc<dyn ReadyCallback>>>,
    pending_load: Mutex<Option<(String, Arc<dyn FormCallback>)>>,
    pub outcome: Mutex<FormOutcome>,
    pub custom_variables: Mutex<HashMap<String, String>>,
}

impl RecordingSdk {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_outcome(outcome: FormOutcome) -> Arc<Self> {
        let sdk = Self::default();
        *sdk.outcome.lock() = outcome;
        Arc::new(sdk)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().iter().filter(|c| *c == call).count()
    }

    /// Signal the ready callback handed over by the last `initialize`.
    pub fn complete_initialize(&self) {
        let ready = self.ready.lock().clone();
        if let Some(ready) = ready {
            ready.on_usabilla_initialized();
        }
    }

    /// Finish a deferred form load.
    pub fn complete_load(&self, success: bool) {
        let pending = self.pending_load.lock().take();
        if let Some((form_id, callback)) = pending {
            if success {
                callback.form_load_success(FormClient::new(form_id));
            } else {
                callback.form_load_fail();
            }
        }
    }

    fn record(&self, call: impl Into<String>) -> Result<(), SdkError> {
        self.calls.lock().push(call.into());
        Ok(())
    }
}

impl FeedbackSdk for RecordingSdk {
    fn initialize(&self, app_id: &str, ready: Arc<dyn ReadyCallback>) -> Result<(), SdkError> {
        *self.ready.lock() = Some(ready);
        self.record(format!("initialize:{app_id}"))
    }

    fn set_debug_enabled(&self, enabled: bool) -> Result<(), SdkError> {
        self.record(format!("set_debug_enabled:{enabled}"))
    }

    fn send_event(&self, event: &str) -> Result<(), SdkError> {
        self.record(format!("send_event:{event}"))
    }

    fn update_fragment_manager(&self, _manager: Arc<dyn FragmentManager>) -> Result<(), SdkError> {
        self.record("update_fragment_manager")
    }

    fn set_custom_variables(&self, variables: HashMap<String, String>) -> Result<(), SdkError> {
        *self.custom_variables.lock() = variables;
        self.record("set_custom_variables")
    }

    fn load_feedback_form(&self, form_id: &str, callback: Arc<dyn FormCallback>) -> Result<(), SdkError> {
        self.record(format!("load_feedback_form:{form_id}"))?;
        let outcome = *self.outcome.lock();
        match outcome {
            FormOutcome::Success => callback.form_load_success(FormClient::new(form_id)),
            FormOutcome::Failure => callback.form_load_fail(),
            FormOutcome::Deferred => *self.pending_load.lock() = Some((form_id.to_string(), callback)),
        }
        Ok(())
    }

    fn preload_feedback_forms(&self, form_ids: Vec<String>) -> Result<(), SdkError> {
        self.record(format!("preload_feedback_forms:{}", form_ids.join("|")))
    }

    fn remove_cached_forms(&self) -> Result<(), SdkError> {
        self.record("remove_cached_forms")
    }

    fn reset_campaign_data(&self) -> Result<(), SdkError> {
        self.record("reset_campaign_data")
    }

    fn dismiss(&self) -> Result<(), SdkError> {
        self.record("dismiss")
    }

    fn set_data_masking(&self, mask_list: Vec<String>, mask_char: char) -> Result<(), SdkError> {
        self.record(format!("set_data_masking:{}:{mask_char}", mask_list.join("|")))
    }
}

// ---------------------------------------------------------------------------
// Host doubles
// ---------------------------------------------------------------------------

/// Fragment manager whose commits stay pending until [`QueuedFragmentManager::settle`].
#[derive(Default)]
pub struct QueuedFragmentManager {
    pending: Mutex<Vec<FragmentTransaction>>,
    attached: Mutex<HashMap<String, (i32, FormFragment)>>,
}

impl QueuedFragmentManager {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    /// Apply every queued transaction in commit order.
    pub fn settle(&self) {
        let pending: Vec<_> = self.pending.lock().drain(..).collect();
        let mut attached = self.attached.lock();
        for transaction in pending {
            for op in transaction.into_ops() {
                match op {
                    FragmentOp::Replace {
                        container_id,
                        fragment,
                        tag,
                    } => {
                        attached.insert(tag, (container_id, fragment));
                    }
                    FragmentOp::Remove { fragment } => {
                        attached.retain(|_, (_, f)| f.id != fragment.id);
                    }
                }
            }
        }
    }

    pub fn attached(&self, tag: &str) -> Option<(i32, FormFragment)> {
        self.attached.lock().get(tag).cloned()
    }
}

impl FragmentManager for QueuedFragmentManager {
    fn find_fragment_by_tag(&self, tag: &str) -> Option<FormFragment> {
        self.attached.lock().get(tag).map(|(_, f)| f.clone())
    }

    fn commit(&self, transaction: FragmentTransaction) {
        self.pending.lock().push(transaction);
    }
}

pub struct TestScreen {
    name: String,
    fragments: Option<Arc<QueuedFragmentManager>>,
}

impl ScreenContainer for TestScreen {
    fn name(&self) -> &str {
        &self.name
    }

    fn fragment_manager(&self) -> Option<Arc<dyn FragmentManager>> {
        self.fragments
            .clone()
            .map(|f| f as Arc<dyn FragmentManager>)
    }
}

/// A screen able to host fragments, plus its manager.
pub fn fragment_screen(name: &str) -> (Arc<dyn ScreenContainer>, Arc<QueuedFragmentManager>) {
    let fragments = QueuedFragmentManager::new();
    let screen: Arc<dyn ScreenContainer> = Arc::new(TestScreen {
        name: name.to_string(),
        fragments: Some(fragments.clone()),
    });
    (screen, fragments)
}

/// A screen with no fragment manager.
pub fn plain_screen(name: &str) -> Arc<dyn ScreenContainer> {
    Arc::new(TestScreen {
        name: name.to_string(),
        fragments: None,
    })
}

// ---------------------------------------------------------------------------
// Misc
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct CountingSink(AtomicUsize);

impl CountingSink {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl ResponseSink for CountingSink {
    fn send(&self, _response: &Response) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct CountingReady(AtomicUsize);

impl CountingReady {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl ReadyCallback for CountingReady {
    fn on_usabilla_initialized(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Callback that only counts outcomes.
#[derive(Default)]
pub struct CountingFormCallback {
    pub successes: AtomicUsize,
    pub failures: AtomicUsize,
}

impl FormCallback for CountingFormCallback {
    fn form_load_success(&self, _form: FormClient) {
        self.successes.fetch_add(1, Ordering::SeqCst);
    }

    fn form_load_fail(&self) {
        self.failures.fetch_add(1, Ordering::SeqCst);
    }
}

/// Form callback that panics on every completion.
pub struct PanickingFormCallback;

impl FormCallback for PanickingFormCallback {
    fn form_load_success(&self, form: FormClient) {
        panic!("form callback blew up on {}", form.form_id);
    }

    fn form_load_fail(&self) {
        panic!("form callback blew up on failure");
    }
}
