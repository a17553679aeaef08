//! `commands`: list the command vocabulary.

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{list_table, output, CommandOutput};
use crate::domain::models::Command;

#[derive(Debug, Serialize)]
pub struct CommandEntry {
    pub token: &'static str,
    pub payload_keys: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct CatalogOutput {
    pub commands: Vec<CommandEntry>,
}

impl CatalogOutput {
    pub fn new() -> Self {
        Self {
            commands: Command::ALL
                .iter()
                .map(|command| CommandEntry {
                    token: command.as_str(),
                    payload_keys: command.payload_keys().to_vec(),
                })
                .collect(),
        }
    }
}

impl Default for CatalogOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandOutput for CatalogOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["command", "payload keys"]);
        for entry in &self.commands {
            let keys = if entry.payload_keys.is_empty() {
                "-".to_string()
            } else {
                entry.payload_keys.join(", ")
            };
            table.add_row(vec![entry.token.to_string(), keys]);
        }
        format!(
            "{} commands (join several with \",\"):\n{table}",
            console::style(self.commands.len()).bold()
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(json_mode: bool) -> Result<()> {
    output(&CatalogOutput::new(), json_mode);
    Ok(())
}
