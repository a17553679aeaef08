//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "usabilla-bridge")]
#[command(about = "Drive the Usabilla remote command against a logging feedback SDK", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to .usabilla/config.yaml plus overrides)
    #[arg(short, long, global = true, env = "USABILLA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Invoke the remote command with a JSON payload
    Invoke(InvokeArgs),

    /// Simulate the feedback SDK closing a form
    CloseForm(CloseFormArgs),

    /// List the commands the bridge understands
    Commands,
}

#[derive(clap::Args, Debug)]
#[group(required = true, multiple = false)]
pub struct InvokeArgs {
    /// Payload as inline JSON, e.g. '{"command_name":"initialize","appId":"..."}'
    #[arg(short, long)]
    pub payload: Option<String>,

    /// Read the payload from a JSON file
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CloseChannel {
    /// A passive form injected into the screen
    Passive,
    /// A campaign form shown by the SDK
    Campaign,
}

#[derive(clap::Args, Debug)]
pub struct CloseFormArgs {
    /// Which kind of form closed
    #[arg(long, value_enum, default_value_t = CloseChannel::Passive)]
    pub channel: CloseChannel,

    /// Rating the user gave
    #[arg(long, default_value = "0")]
    pub rating: i32,

    /// Page the user left the form on
    #[arg(long, default_value = "0")]
    pub abandoned_page_index: i32,

    /// Whether the feedback was submitted
    #[arg(long)]
    pub sent: bool,

    /// Load this form into the screen before closing it (passive only)
    #[arg(long)]
    pub form_id: Option<String>,
}
