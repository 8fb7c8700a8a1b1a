//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// lidar-view - real-time lidar scan viewer
#[derive(Parser, Debug)]
#[command(
    name = "lidar-view",
    author,
    version,
    about = "Real-time lidar scan viewer",
    long_about = "Receives lidar packets from a sensor (or a synthetic mock), assembles \n\
                  them into frames, and presents a grayscale image and point cloud \n\
                  of every completed scan."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "LIDAR_VIEW_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "LIDAR_VIEW_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the viewer
    Run(RunArgs),

    /// Validate configuration and sensor metadata without running
    Validate(ValidateArgs),

    /// Display sensor metadata
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "viewer.toml",
        env = "LIDAR_VIEW_CONFIG"
    )]
    pub config: PathBuf,

    /// Override the sensor metadata path from configuration
    #[arg(long, env = "LIDAR_VIEW_METADATA")]
    pub metadata: Option<PathBuf>,

    /// Use the synthetic mock sensor instead of UDP
    #[arg(long)]
    pub mock: bool,

    /// Stop after this many published frames (0 = unlimited)
    #[arg(long, default_value = "0", env = "LIDAR_VIEW_MAX_FRAMES")]
    pub max_frames: u64,

    /// Run timeout in seconds (0 = no timeout)
    #[arg(long, default_value = "0", env = "LIDAR_VIEW_TIMEOUT")]
    pub timeout: u64,

    /// Override the metrics server port (0 = disabled)
    #[arg(long, env = "LIDAR_VIEW_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    /// Validate configuration and metadata, then exit
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "viewer.toml")]
    pub config: PathBuf,

    /// Validate this metadata file instead of the configured one
    #[arg(long)]
    pub metadata: Option<PathBuf>,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to the sensor metadata JSON
    #[arg(short, long, default_value = "metadata.json")]
    pub metadata: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show per-beam intrinsics
    #[arg(long)]
    pub beams: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_overrides() {
        let cli = Cli::try_parse_from([
            "lidar-view",
            "-vv",
            "run",
            "--config",
            "viewer.json",
            "--mock",
            "--max-frames",
            "5",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.config, PathBuf::from("viewer.json"));
                assert!(args.mock);
                assert_eq!(args.max_frames, 5);
                assert_eq!(args.metrics_port, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["lidar-view", "-q", "-v", "info"]).is_err());
    }
}
