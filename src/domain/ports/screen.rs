//! Ports describing the host UI: visible screens, their fragment managers,
//! and the lifecycle notifications that announce them.

use std::sync::Arc;

use crate::domain::models::FormFragment;

/// A single change to the content hosted by a fragment manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentOp {
    /// Replace whatever occupies `container_id` with `fragment`, stored under `tag`.
    Replace {
        container_id: i32,
        fragment: FormFragment,
        tag: String,
    },
    /// Remove `fragment` from wherever it is attached.
    Remove { fragment: FormFragment },
}

/// An ordered batch of fragment changes, applied together on commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentTransaction {
    ops: Vec<FragmentOp>,
}

impl FragmentTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(mut self, container_id: i32, fragment: FormFragment, tag: impl Into<String>) -> Self {
        self.ops.push(FragmentOp::Replace {
            container_id,
            fragment,
            tag: tag.into(),
        });
        self
    }

    pub fn remove(mut self, fragment: FormFragment) -> Self {
        self.ops.push(FragmentOp::Remove { fragment });
        self
    }

    pub fn ops(&self) -> &[FragmentOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<FragmentOp> {
        self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Manages the fragments hosted by one screen.
///
/// `commit` schedules the transaction; the host applies it later on its UI
/// thread. Callers that need to observe the result must wait for the host.
pub trait FragmentManager: Send + Sync {
    fn find_fragment_by_tag(&self, tag: &str) -> Option<FormFragment>;

    fn commit(&self, transaction: FragmentTransaction);
}

/// A screen that can become the visible UI container.
pub trait ScreenContainer: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// The screen's fragment manager, if it can host fragments at all.
    fn fragment_manager(&self) -> Option<Arc<dyn FragmentManager>>;
}

/// Observer of screen lifecycle transitions, registered with the host application.
pub trait LifecycleObserver: Send + Sync {
    fn on_container_created(&self, container: &Arc<dyn ScreenContainer>);

    fn on_container_started(&self, container: &Arc<dyn ScreenContainer>);

    fn on_container_resumed(&self, container: &Arc<dyn ScreenContainer>);

    fn on_container_paused(&self, _container: &Arc<dyn ScreenContainer>) {}

    fn on_container_stopped(&self, _container: &Arc<dyn ScreenContainer>) {}

    fn on_container_destroyed(&self, _container: &Arc<dyn ScreenContainer>) {}
}
