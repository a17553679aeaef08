//! The `usabilla` remote command: routes invocations onto a [`UsabillaCommand`].
//!
//! One invocation may carry several comma separated commands. They run in
//! order; a command that fails or panics is logged and the rest still run. Tokens the
//! router does not recognise are skipped. The response is acknowledged once
//! every command has been attempted.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, instrument, warn};

use crate::domain::errors::BridgeResult;
use crate::domain::models::command::split_commands;
use crate::domain::models::constants::{LOG_TARGET, UNSPECIFIED_FRAGMENT_ID};
use crate::domain::models::{keys, Command, IntentFilter, Payload, RemoteCommandConfig};
use crate::domain::ports::{
    FeedbackSdk, FormCallback, ReadyCallback, RemoteCommand, RemoteCommandContext, Response,
    UsabillaCommand,
};

use super::broadcast_manager::LocalBroadcastManager;
use super::lifecycle_registry::LifecycleRegistry;
use super::usabilla_instance::UsabillaInstance;

/// Remote command bridging the tag management SDK to the feedback SDK.
pub struct UsabillaRemoteCommand {
    command_id: String,
    description: String,
    application: Arc<LifecycleRegistry>,
    broadcast_manager: Arc<LocalBroadcastManager>,
    instance: Arc<dyn UsabillaCommand>,
    form_callback: RwLock<Option<Arc<dyn FormCallback>>>,
}

impl UsabillaRemoteCommand {
    /// Build a router backed by a fresh [`UsabillaInstance`] around `sdk`.
    ///
    /// With the automatic flags set in `config` the backend's lifecycle
    /// observer and feedback receivers are registered immediately.
    pub fn new(
        config: &RemoteCommandConfig,
        application: Arc<LifecycleRegistry>,
        broadcast_manager: Arc<LocalBroadcastManager>,
        sdk: Arc<dyn FeedbackSdk>,
        ready_callback: Option<Arc<dyn ReadyCallback>>,
    ) -> Self {
        let instance = Arc::new(UsabillaInstance::new(sdk, ready_callback));
        Self::with_instance(config, application, broadcast_manager, instance)
    }

    /// Build a router over an existing backend.
    pub fn with_instance(
        config: &RemoteCommandConfig,
        application: Arc<LifecycleRegistry>,
        broadcast_manager: Arc<LocalBroadcastManager>,
        instance: Arc<dyn UsabillaCommand>,
    ) -> Self {
        let command = Self {
            command_id: config.command_id.clone(),
            description: config.description.clone(),
            application,
            broadcast_manager,
            instance,
            form_callback: RwLock::new(None),
        };

        if config.auto_fragment_manager {
            command.register_lifecycle_callbacks();
        }
        if config.auto_feedback_handler {
            command.register_broadcast_receivers();
        }
        command
    }

    pub fn instance(&self) -> &Arc<dyn UsabillaCommand> {
        &self.instance
    }

    /// Ordered, normalised command tokens from the payload's `command_name`.
    pub fn split_commands(&self, payload: &Payload) -> Vec<String> {
        split_commands(&payload.command_name())
    }

    /// Run every recognised token against the backend, in order.
    pub fn parse_commands(&self, commands: &[String], payload: &Payload) {
        for token in commands {
            let Some(command) = Command::from_token(token) else {
                debug!(target: LOG_TARGET, command = %token, "skipping unknown command");
                continue;
            };
            match panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(command, payload))) {
                Ok(Ok(())) => {}
                Ok(Err(error)) => warn!(target: LOG_TARGET, %command, %error, "command failed"),
                Err(cause) => warn!(
                    target: LOG_TARGET,
                    %command,
                    panic = panic_message(cause.as_ref()),
                    "command panicked"
                ),
            }
        }
    }

    /// Run a single command with its arguments taken from `payload`.
    ///
    /// Missing or malformed arguments make the command a no-op, except for
    /// data masking which needs both a non-empty list and a mask character.
    pub fn dispatch(&self, command: Command, payload: &Payload) -> BridgeResult<()> {
        match command {
            Command::Initialize => {
                let app_id = payload.opt_string(keys::APP_ID);
                self.instance.initialize(app_id.as_deref())
            }
            Command::SetDebugEnabled => {
                let enabled = payload.opt_bool(keys::DEBUG_ENABLED).unwrap_or(false);
                self.instance.set_debug_enabled(enabled)
            }
            Command::LoadFeedbackForm => {
                let Some(form_id) = payload.opt_string(keys::FORM_ID) else {
                    debug!(target: LOG_TARGET, "loadfeedbackform without a form id");
                    return Ok(());
                };
                let fragment_id = payload
                    .opt_int(keys::FRAGMENT_ID)
                    .unwrap_or(UNSPECIFIED_FRAGMENT_ID);
                let callback = self.form_callback.read().clone();
                self.instance.load_feedback_form(&form_id, callback, fragment_id)
            }
            Command::PreloadFeedbackForms => {
                match payload.opt_string_list(keys::FORM_ID) {
                    Some(form_ids) => self.instance.preload_feedback_forms(Some(form_ids)),
                    None => Ok(()),
                }
            }
            Command::RemoveCachedForms => self.instance.remove_cached_forms(),
            Command::Reset => self.instance.reset(),
            Command::SendEvent => {
                let event = payload.opt_string(keys::EVENT_NAME);
                self.instance.send_event(event.as_deref())
            }
            Command::SetCustomVariables => {
                if let Some(custom) = payload.opt_object(keys::CUSTOM) {
                    self.instance.set_custom_variables(Some(custom))?;
                }
                Ok(())
            }
            Command::SetDataMasking => {
                let mask_list = payload
                    .opt_string_list(keys::MASK_LIST)
                    .filter(|list| !list.is_empty());
                let mask_char = payload.opt_char(keys::MASK_CHAR);
                match (mask_list, mask_char) {
                    (Some(list), Some(mask_char)) => self.instance.set_data_masking(&list, mask_char),
                    _ => {
                        debug!(target: LOG_TARGET, "setdatamasking needs a mask list and a mask char");
                        Ok(())
                    }
                }
            }
            Command::Dismiss => self.instance.dismiss(),
            Command::DisplayCampaign => Ok(()),
        }
    }

    /// Use `callback` for every subsequent form load; `None` restores the default.
    pub fn set_usabilla_form_callback(&self, callback: Option<Arc<dyn FormCallback>>) {
        *self.form_callback.write() = callback;
    }

    pub fn register_lifecycle_callbacks(&self) {
        self.application.register(self.instance.lifecycle_observer());
    }

    pub fn unregister_lifecycle_callbacks(&self) {
        self.application.unregister(&self.instance.lifecycle_observer());
    }

    pub fn register_broadcast_receivers(&self) {
        self.broadcast_manager.register_receiver(
            self.instance.passive_feedback_receiver(),
            IntentFilter::closer_filter_passive(),
        );
        self.broadcast_manager.register_receiver(
            self.instance.campaign_feedback_receiver(),
            IntentFilter::closer_filter_campaign(),
        );
    }

    pub fn unregister_broadcast_receivers(&self) {
        self.broadcast_manager
            .unregister_receiver(&self.instance.passive_feedback_receiver());
        self.broadcast_manager
            .unregister_receiver(&self.instance.campaign_feedback_receiver());
    }

    /// Forward the SDK's ready notification to the backend.
    pub fn on_usabilla_initialized(&self) {
        self.instance.on_usabilla_initialized();
    }
}

fn panic_message(cause: &(dyn Any + Send)) -> &str {
    cause
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| cause.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

impl RemoteCommand for UsabillaRemoteCommand {
    fn command_id(&self) -> &str {
        &self.command_id
    }

    fn description(&self) -> &str {
        &self.description
    }

    #[instrument(skip_all, fields(command_id = %self.command_id, response_id = %response.response_id()))]
    fn on_invoke(&self, response: &Response) {
        let payload = response.request_payload();
        let commands = self.split_commands(payload);
        debug!(target: LOG_TARGET, ?commands, "invoked");
        self.parse_commands(&commands, payload);
        response.send();
    }

    fn set_context(&self, context: Arc<dyn RemoteCommandContext>) {
        self.instance.set_command_context(context);
    }
}
