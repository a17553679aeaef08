//! In-process host the CLI runs the bridge inside.

use std::sync::Arc;

use crate::domain::models::constants::FRAGMENT_TAG_NAME;
use crate::domain::models::RemoteCommandConfig;
use crate::domain::ports::{FeedbackSdk, RemoteCommand, ScreenContainer};
use crate::infrastructure::host::{AttachedFragment, HeadlessScreen};
use crate::infrastructure::sdk::TracingFeedbackSdk;
use crate::infrastructure::tracking::InMemoryTracker;
use crate::services::{LifecycleRegistry, LocalBroadcastManager, UsabillaRemoteCommand};

/// Everything a single CLI invocation needs, already wired together.
///
/// A `main` screen is created, started and resumed before the host is
/// returned, so the bridge already knows where to attach forms.
pub struct BridgeHost {
    pub application: Arc<LifecycleRegistry>,
    pub broadcasts: Arc<LocalBroadcastManager>,
    pub sdk: Arc<TracingFeedbackSdk>,
    pub tracker: Arc<InMemoryTracker>,
    pub screen: Arc<HeadlessScreen>,
    pub command: UsabillaRemoteCommand,
}

impl BridgeHost {
    pub fn new(config: &RemoteCommandConfig) -> Self {
        let application = Arc::new(LifecycleRegistry::new());
        let broadcasts = Arc::new(LocalBroadcastManager::new());
        let sdk = Arc::new(TracingFeedbackSdk::new());
        let tracker = Arc::new(InMemoryTracker::new());

        let feedback_sdk: Arc<dyn FeedbackSdk> = sdk.clone();
        let command = UsabillaRemoteCommand::new(
            config,
            Arc::clone(&application),
            Arc::clone(&broadcasts),
            feedback_sdk,
            None,
        );
        command.set_context(tracker.clone());

        let screen = Arc::new(HeadlessScreen::new("main"));
        let container: Arc<dyn ScreenContainer> = screen.clone();
        application.dispatch_created(&container);
        application.dispatch_started(&container);
        application.dispatch_resumed(&container);

        Self {
            application,
            broadcasts,
            sdk,
            tracker,
            screen,
            command,
        }
    }

    /// The passive feedback form currently attached to the screen, if any.
    pub fn attached_form(&self) -> Option<AttachedFragment> {
        self.screen.fragments().attached(FRAGMENT_TAG_NAME)
    }
}
