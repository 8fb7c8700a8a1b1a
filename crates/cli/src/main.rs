//! # lidar-view CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Configuration and metadata loading with validation
//! - Ingestion and render thread orchestration
//! - Graceful shutdown handling

mod cli;
mod commands;
mod error;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use contracts::AppConfig;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{load_run_config, run_info, run_pipeline, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Run(args) => {
            // Config is read first so logging can honor it
            let config = load_run_config(args)?;
            init_logging(&cli, Some(&config))?;
            run_pipeline(args, config).await
        }
        Commands::Validate(args) => {
            init_logging(&cli, None)?;
            run_validate(args)
        }
        Commands::Info(args) => {
            init_logging(&cli, None)?;
            run_info(args)
        }
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging and the optional metrics exporter
fn init_logging(cli: &Cli, config: Option<&AppConfig>) -> Result<()> {
    let default_log_level = if cli.quiet {
        "warn".to_string()
    } else {
        match cli.verbose {
            0 => config
                .map(|c| c.observability.log_level.clone())
                .unwrap_or_else(|| "info".to_string()),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    observability::init_with_config(ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: config.and_then(|c| c.observability.metrics_port),
        default_log_level,
    })?;

    info!(version = env!("CARGO_PKG_VERSION"), "lidar-view starting");
    Ok(())
}
