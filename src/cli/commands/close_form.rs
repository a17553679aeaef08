//! `close-form`: broadcast a form closure as the feedback SDK would.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::host::BridgeHost;
use crate::cli::output::{output, CommandOutput};
use crate::cli::types::{CloseChannel, CloseFormArgs};
use crate::domain::models::{Config, FeedbackResult, Intent, Payload};
use crate::domain::ports::{RemoteCommand, Response};
use crate::infrastructure::tracking::TrackedEvent;

#[derive(Debug, Serialize)]
pub struct CloseFormOutput {
    pub action: String,
    pub receivers_reached: usize,
    pub form_detached: bool,
    pub tracked: Vec<TrackedEvent>,
}

impl CommandOutput for CloseFormOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "{} {} reached {} receiver(s)",
            console::style("Broadcast").green().bold(),
            self.action,
            self.receivers_reached
        )];
        if self.form_detached {
            lines.push("  Passive form detached".to_string());
        }
        for event in &self.tracked {
            lines.push(format!(
                "  Tracked: {} {}",
                event.name,
                serde_json::Value::Object(event.properties.clone())
            ));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: CloseFormArgs, config: &Config, json_mode: bool) -> Result<()> {
    let host = BridgeHost::new(&config.remote_command);
    let result = run(&host, &args).await?;
    output(&result, json_mode);
    Ok(())
}

/// Optionally load a form, then broadcast its closure and report the outcome.
pub async fn run(host: &BridgeHost, args: &CloseFormArgs) -> Result<CloseFormOutput> {
    if let Some(form_id) = &args.form_id {
        let payload = Payload::new()
            .with("command_name", "initialize,loadfeedbackform")
            .with("appId", "usabilla-bridge-cli")
            .with("formId", form_id.as_str());
        host.command
            .on_invoke(&Response::new(host.command.command_id(), payload));
    }
    let attached_before = host.attached_form().is_some();

    let result = FeedbackResult::new(args.rating, args.abandoned_page_index, args.sent);
    let intent = match args.channel {
        CloseChannel::Passive => Intent::passive_form_closed(result),
        CloseChannel::Campaign => Intent::campaign_form_closed(result),
    };
    let action = intent.action.clone();

    let receivers_reached = host
        .broadcasts
        .send_broadcast(intent)
        .await
        .context("Broadcast delivery task failed")?;

    Ok(CloseFormOutput {
        action,
        receivers_reached,
        form_detached: attached_before && host.attached_form().is_none(),
        tracked: host.tracker.events_named("usabilla_form_closed"),
    })
}
