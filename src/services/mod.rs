//! Service layer: the command router, the tracking backend it drives, and
//! the in-process registries the host uses to notify them.

pub mod broadcast_manager;
pub mod feedback_receivers;
pub(crate) mod form_callback;
pub mod lifecycle_registry;
pub mod remote_command;
pub mod usabilla_instance;

pub use broadcast_manager::LocalBroadcastManager;
pub use feedback_receivers::{CampaignFeedbackReceiver, PassiveFeedbackReceiver};
pub use lifecycle_registry::LifecycleRegistry;
pub use remote_command::UsabillaRemoteCommand;
pub use usabilla_instance::{ContainerLifecycleObserver, InstanceReadyCallback, UsabillaInstance};
