//! Port trait definitions (Hexagonal Architecture)
//!
//! - `FeedbackSdk`: the third-party feedback SDK
//! - `RemoteCommandContext`: the analytics sink events are tracked into
//! - `ScreenContainer` / `FragmentManager` / `LifecycleObserver`: the host UI
//! - `BroadcastReceiver`: process-local broadcast delivery
//! - `UsabillaCommand`: the backend the command router dispatches into
//! - `RemoteCommand`: the invocation boundary with the tag management SDK

pub mod broadcast;
pub mod feedback_sdk;
pub mod remote_command;
pub mod screen;
pub mod tracking;
pub mod usabilla_command;

pub use broadcast::BroadcastReceiver;
pub use feedback_sdk::{FeedbackSdk, FormCallback, ReadyCallback};
pub use remote_command::{RemoteCommand, Response, ResponseSink};
pub use screen::{FragmentManager, FragmentOp, FragmentTransaction, LifecycleObserver, ScreenContainer};
pub use tracking::RemoteCommandContext;
pub use usabilla_command::UsabillaCommand;
