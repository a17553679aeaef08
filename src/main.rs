//! usabilla-bridge CLI entry point.

use anyhow::Result;
use clap::Parser;

use usabilla_remote_command::cli::{handle_error, Cli, Commands};
use usabilla_remote_command::domain::models::Config;
use usabilla_remote_command::infrastructure::config::ConfigLoader;
use usabilla_remote_command::infrastructure::logging::{LogConfig, LoggerImpl};

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Invoke(args) => {
            usabilla_remote_command::cli::commands::invoke::execute(args, &config, cli.json).await
        }
        Commands::CloseForm(args) => {
            usabilla_remote_command::cli::commands::close_form::execute(args, &config, cli.json)
                .await
        }
        Commands::Commands => usabilla_remote_command::cli::commands::catalog::execute(cli.json),
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
