//! Command-line interface for driving the bridge by hand.
//!
//! Every invocation builds a fresh in-process host (lifecycle registry,
//! broadcast manager, headless screen) around the logging feedback SDK.

pub mod commands;
pub mod host;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

/// Print `err` in the requested mode and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({
            "error": err.to_string(),
            "causes": err.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>(),
        });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", console::style("error:").red().bold());
    }
    std::process::exit(1);
}
