//! `invoke`: run one remote command invocation.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use uuid::Uuid;

use crate::cli::host::BridgeHost;
use crate::cli::output::{output, CommandOutput};
use crate::cli::types::InvokeArgs;
use crate::domain::models::{Command, Config, Payload};
use crate::domain::ports::{RemoteCommand, Response, ResponseSink};
use crate::infrastructure::tracking::TrackedEvent;

#[derive(Debug, Serialize)]
pub struct InvokeOutput {
    pub command_id: String,
    pub response_id: Uuid,
    pub commands: Vec<String>,
    pub skipped: Vec<String>,
    pub acknowledged: usize,
    pub sdk_initialized: bool,
    pub attached_form: Option<String>,
    pub tracked: Vec<TrackedEvent>,
}

impl CommandOutput for InvokeOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "{} {} ({})",
            console::style("Invoked").green().bold(),
            self.command_id,
            self.response_id
        )];
        lines.push(format!("  Commands:      {}", self.commands.join(", ")));
        if !self.skipped.is_empty() {
            lines.push(format!("  Skipped:       {}", self.skipped.join(", ")));
        }
        lines.push(format!("  Acknowledged:  {}", self.acknowledged));
        lines.push(format!("  Initialized:   {}", self.sdk_initialized));
        if let Some(form_id) = &self.attached_form {
            lines.push(format!("  Attached form: {form_id}"));
        }
        for event in &self.tracked {
            lines.push(format!(
                "  Tracked:       {} {}",
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

#[derive(Default)]
struct CountingSink(parking_lot::Mutex<usize>);

impl ResponseSink for CountingSink {
    fn send(&self, _response: &Response) {
        *self.0.lock() += 1;
    }
}

pub async fn execute(args: InvokeArgs, config: &Config, json_mode: bool) -> Result<()> {
    let payload = match (args.payload, args.file) {
        (Some(inline), _) => Payload::from_json_str(&inline).context("Invalid payload")?,
        (None, Some(path)) => read_payload_file(&path).await?,
        (None, None) => anyhow::bail!("either --payload or --file is required"),
    };

    let result = run(&BridgeHost::new(&config.remote_command), payload);
    output(&result, json_mode);
    Ok(())
}

/// Read a payload from a `.json`, `.yaml` or `.yml` file.
async fn read_payload_file(path: &Path) -> Result<Payload> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read payload from {}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    if is_yaml {
        let value: serde_json::Value = serde_yaml::from_str(&raw)
            .with_context(|| format!("Invalid YAML payload in {}", path.display()))?;
        Payload::try_from(value).with_context(|| format!("Payload in {} is not a mapping", path.display()))
    } else {
        Payload::from_json_str(&raw).with_context(|| format!("Invalid payload in {}", path.display()))
    }
}

/// Invoke the host's command with `payload` and summarise what happened.
pub fn run(host: &BridgeHost, payload: Payload) -> InvokeOutput {
    let sink = Arc::new(CountingSink::default());
    let response = Response::new(host.command.command_id(), payload).with_sink(sink.clone());

    host.command.on_invoke(&response);

    let commands = host.command.split_commands(response.request_payload());
    let skipped = commands
        .iter()
        .filter(|token| Command::from_token(token).is_none())
        .cloned()
        .collect();
    let acknowledged = *sink.0.lock();

    InvokeOutput {
        command_id: response.command_id().to_string(),
        response_id: response.response_id(),
        commands,
        skipped,
        acknowledged,
        sdk_initialized: host.sdk.is_initialized(),
        attached_form: host.attached_form().map(|a| a.fragment.form_id),
        tracked: host.tracker.events(),
    }
}
