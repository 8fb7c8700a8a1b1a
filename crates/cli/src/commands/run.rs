//! `run` command implementation.

use anyhow::{Context, Result};
use contracts::{AppConfig, SensorInfo, SourceKind};
use std::time::Duration;
use tracing::{info, warn};

use super::resolve_metadata_path;
use crate::cli::RunArgs;
use crate::error::CliError;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Load the configuration and apply CLI overrides
///
/// Runs before logging is initialized, so it reports through its result
/// only.
pub fn load_run_config(args: &RunArgs) -> Result<AppConfig> {
    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let mut config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    config.sensor.metadata_path = match &args.metadata {
        Some(path) => path.clone(),
        None => resolve_metadata_path(&args.config, &config),
    };
    if args.mock {
        config.sensor.source = SourceKind::Mock;
    }
    if let Some(port) = args.metrics_port {
        config.observability.metrics_port = Some(port);
    }

    config_loader::ConfigLoader::validate(&config)
        .context("Configuration invalid after CLI overrides")?;
    Ok(config)
}

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs, config: AppConfig) -> Result<()> {
    let metadata_path = config.sensor.metadata_path.clone();
    if !metadata_path.exists() {
        return Err(CliError::metadata_not_found(metadata_path.display().to_string()).into());
    }

    let info = config_loader::MetadataLoader::load_from_path(&metadata_path)
        .with_context(|| format!("Failed to load metadata from {}", metadata_path.display()))?;

    info!(
        config = %args.config.display(),
        metadata = %metadata_path.display(),
        source = ?config.sensor.source,
        hostname = config.sensor.hostname.as_deref().unwrap_or("-"),
        presenter = ?config.view.presenter,
        field = %config.view.field,
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&config, &info);
        return Ok(());
    }

    let pipeline = Pipeline::new(PipelineConfig {
        app: config,
        info,
        max_frames: (args.max_frames > 0).then_some(args.max_frames),
        timeout: (args.timeout > 0).then(|| Duration::from_secs(args.timeout)),
    });

    info!("Starting viewer...");
    let stats = pipeline
        .run(shutdown_signal())
        .await
        .context("Viewer failed")?;

    info!(
        frames_published = stats.frames_published,
        frames_presented = stats.frames_presented,
        duration_secs = stats.duration.as_secs_f64(),
        fps = format!("{:.2}", stats.fps()),
        "Viewer completed"
    );
    stats.print_summary();

    info!("lidar-view finished");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(config: &AppConfig, info: &SensorInfo) {
    let window = info.column_window();

    println!("\n=== Configuration Summary ===\n");
    println!("Sensor:");
    println!("  Product: {} (sn {})", info.prod_line, info.prod_sn);
    println!("  Firmware: {}", info.build_rev);
    println!("  Mode: {}", info.lidar_mode);
    println!("  Frame: {} x {}", info.width(), info.height());
    println!(
        "  Column window: [{}, {}] ({} columns)",
        window.start,
        window.end,
        window.len(info.width())
    );

    println!("\nSource: {:?}", config.sensor.source);
    match config.sensor.source {
        SourceKind::Udp => {
            println!(
                "  Ports: lidar {}, imu {}",
                config.sensor.lidar_port, config.sensor.imu_port
            );
            if let Some(ref host) = config.sensor.hostname {
                println!("  Host: {}", host);
            }
        }
        SourceKind::Mock => {
            println!(
                "  Frames: {}",
                if config.mock.frames == 0 {
                    "unlimited".to_string()
                } else {
                    config.mock.frames.to_string()
                }
            );
            println!("  Realtime: {}", config.mock.realtime);
        }
    }

    println!("\nView:");
    println!("  Field: {}", config.view.field);
    println!("  Presenter: {:?}", config.view.presenter);
    println!("  Render interval: {} ms", config.view.render_interval_ms);
    if let Some(ref dir) = config.view.snapshot_dir {
        println!(
            "  Snapshots: {} (every {} frames)",
            dir.display(),
            config.view.snapshot_every
        );
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args(config: PathBuf) -> RunArgs {
        RunArgs {
            config,
            metadata: None,
            mock: false,
            max_frames: 0,
            timeout: 0,
            metrics_port: None,
            dry_run: false,
        }
    }

    #[test]
    fn test_load_run_config_applies_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.toml");
        std::fs::write(
            &path,
            "[sensor]\nmetadata_path = \"meta.json\"\n\n[observability]\nmetrics_port = 9100\n",
        )
        .unwrap();

        let config = load_run_config(&RunArgs {
            mock: true,
            metrics_port: Some(0),
            ..args(path)
        })
        .unwrap();

        assert_eq!(config.sensor.source, SourceKind::Mock);
        assert_eq!(config.sensor.metadata_path, dir.path().join("meta.json"));
        assert_eq!(config.observability.metrics_port, Some(0));
    }

    #[test]
    fn test_metadata_flag_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.toml");
        std::fs::write(&path, "[sensor]\nmetadata_path = \"meta.json\"\n").unwrap();

        let config = load_run_config(&RunArgs {
            metadata: Some(PathBuf::from("/data/os1.json")),
            ..args(path)
        })
        .unwrap();
        assert_eq!(config.sensor.metadata_path, PathBuf::from("/data/os1.json"));
    }

    #[test]
    fn test_missing_config_is_reported() {
        let err = load_run_config(&args(PathBuf::from("/nonexistent/viewer.toml"))).unwrap_err();
        assert!(err.to_string().contains("Configuration file not found"));
    }
}
