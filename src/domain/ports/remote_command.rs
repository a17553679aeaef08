//! Invocation boundary between the tag management SDK and a remote command.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::models::Payload;

use super::tracking::RemoteCommandContext;

/// Acknowledges that an invocation has been handled.
pub trait ResponseSink: Send + Sync {
    fn send(&self, response: &Response);
}

/// A single invocation: the request payload plus a way to acknowledge it.
pub struct Response {
    command_id: String,
    response_id: Uuid,
    payload: Payload,
    sink: Option<Arc<dyn ResponseSink>>,
    sent: AtomicBool,
}

impl Response {
    pub fn new(command_id: impl Into<String>, payload: Payload) -> Self {
        Self {
            command_id: command_id.into(),
            response_id: Uuid::new_v4(),
            payload,
            sink: None,
            sent: AtomicBool::new(false),
        }
    }

    /// Route acknowledgements to `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn ResponseSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn command_id(&self) -> &str {
        &self.command_id
    }

    pub fn response_id(&self) -> Uuid {
        self.response_id
    }

    pub fn request_payload(&self) -> &Payload {
        &self.payload
    }

    /// Acknowledge the invocation.
    pub fn send(&self) {
        self.sent.store(true, Ordering::SeqCst);
        if let Some(sink) = &self.sink {
            sink.send(self);
        }
    }

    pub fn is_sent(&self) -> bool {
        self.sent.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("command_id", &self.command_id)
            .field("response_id", &self.response_id)
            .field("payload", &self.payload)
            .field("sent", &self.is_sent())
            .finish_non_exhaustive()
    }
}

/// A command the tag management SDK can invoke by id.
pub trait RemoteCommand: Send + Sync {
    fn command_id(&self) -> &str;

    fn description(&self) -> &str;

    /// Handle one invocation. Must call [`Response::send`] exactly once.
    fn on_invoke(&self, response: &Response);

    /// Attach the analytics sink events should be tracked into.
    fn set_context(&self, context: Arc<dyn RemoteCommandContext>);
}
