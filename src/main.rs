use anyhow::{Context, Result};
use clap::Parser;
use mirror_package::{
    cli::commands::{CommandHandler, ConfigureCommand, UpdateCommand},
    cli::{Cli, LogLevel},
    executor::{ProcessRunner, TokioProcessRunner},
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn initialize_tracing(log_level: LogLevel) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level.to_filter_directive()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_tracing(cli.log_level);

    let settings = cli
        .into_settings()
        .context("Failed to resolve the current directory")?;
    let runner: Arc<dyn ProcessRunner> = Arc::new(TokioProcessRunner);

    let command: Box<dyn CommandHandler + Send + Sync> = if settings.update {
        Box::new(UpdateCommand::new(settings, runner))
    } else {
        Box::new(ConfigureCommand::new(settings, runner))
    };

    command
        .execute()
        .await
        .with_context(|| format!("{} failed", command.name()))
}
