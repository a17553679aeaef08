use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::command::keys;

/// Outcome of a passive or campaign feedback form, as reported by the SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResult {
    pub rating: i32,
    pub abandoned_page_index: i32,
    #[serde(alias = "isSent")]
    pub sent: bool,
}

impl FeedbackResult {
    pub const fn new(rating: i32, abandoned_page_index: i32, sent: bool) -> Self {
        Self {
            rating,
            abandoned_page_index,
            sent,
        }
    }

    /// Analytics properties describing this result.
    pub fn to_properties(&self) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert(
            keys::USABILLA_ABANDONED_PAGE_INDEX.to_string(),
            Value::from(self.abandoned_page_index),
        );
        data.insert(keys::USABILLA_RATING.to_string(), Value::from(self.rating));
        data.insert(keys::USABILLA_SENT.to_string(), Value::from(self.sent));
        data
    }
}

/// Handle to renderable form content produced by the feedback SDK.
///
/// The bridge never looks inside; it only moves the handle between the SDK
/// and the host's fragment manager.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormFragment {
    pub id: Uuid,
    pub form_id: String,
}

impl FormFragment {
    pub fn new(form_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            form_id: form_id.into(),
        }
    }
}

/// A loaded form as handed to a form callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormClient {
    pub form_id: String,
    pub fragment: Option<FormFragment>,
}

impl FormClient {
    pub fn new(form_id: impl Into<String>) -> Self {
        let form_id = form_id.into();
        Self {
            fragment: Some(FormFragment::new(form_id.clone())),
            form_id,
        }
    }

    /// A form client with no renderable content.
    pub fn without_fragment(form_id: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            fragment: None,
        }
    }
}
