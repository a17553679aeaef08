//! A screen with no UI whose fragment manager applies transactions at once.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::domain::models::constants::LOG_TARGET;
use crate::domain::models::FormFragment;
use crate::domain::ports::{FragmentManager, FragmentOp, FragmentTransaction, ScreenContainer};

/// Fragment placed in a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedFragment {
    pub container_id: i32,
    pub fragment: FormFragment,
}

/// Keeps attached fragments by tag.
#[derive(Debug, Default)]
pub struct HeadlessFragmentManager {
    attached: RwLock<HashMap<String, AttachedFragment>>,
    commits: RwLock<usize>,
}

impl HeadlessFragmentManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attached(&self, tag: &str) -> Option<AttachedFragment> {
        self.attached.read().get(tag).cloned()
    }

    /// Number of transactions committed so far.
    pub fn commit_count(&self) -> usize {
        *self.commits.read()
    }
}

impl FragmentManager for HeadlessFragmentManager {
    fn find_fragment_by_tag(&self, tag: &str) -> Option<FormFragment> {
        self.attached.read().get(tag).map(|a| a.fragment.clone())
    }

    fn commit(&self, transaction: FragmentTransaction) {
        let mut attached = self.attached.write();
        for op in transaction.into_ops() {
            match op {
                FragmentOp::Replace {
                    container_id,
                    fragment,
                    tag,
                } => {
                    debug!(target: LOG_TARGET, %tag, container_id, form_id = %fragment.form_id, "fragment attached");
                    attached.retain(|_, a| a.container_id != container_id);
                    attached.insert(
                        tag,
                        AttachedFragment {
                            container_id,
                            fragment,
                        },
                    );
                }
                FragmentOp::Remove { fragment } => {
                    attached.retain(|_, a| a.fragment.id != fragment.id);
                    debug!(target: LOG_TARGET, form_id = %fragment.form_id, "fragment removed");
                }
            }
        }
        *self.commits.write() += 1;
    }
}

/// Screen container backed by a [`HeadlessFragmentManager`].
pub struct HeadlessScreen {
    name: String,
    fragments: Arc<HeadlessFragmentManager>,
}

impl HeadlessScreen {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fragments: Arc::new(HeadlessFragmentManager::new()),
        }
    }

    pub fn fragments(&self) -> &Arc<HeadlessFragmentManager> {
        &self.fragments
    }
}

impl ScreenContainer for HeadlessScreen {
    fn name(&self) -> &str {
        &self.name
    }

    fn fragment_manager(&self) -> Option<Arc<dyn FragmentManager>> {
        let fragments: Arc<dyn FragmentManager> = self.fragments.clone();
        Some(fragments)
    }
}
