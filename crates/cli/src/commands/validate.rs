//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{AppConfig, PresenterKind, SensorInfo, SourceKind};
use serde::Serialize;
use tracing::info;

use super::resolve_metadata_path;
use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    source: String,
    lidar_mode: String,
    columns: usize,
    rows: usize,
    window: [usize; 2],
    field: String,
    presenter: String,
}

impl ValidationResult {
    fn invalid(config_path: String, metadata_path: Option<String>, error: String) -> Self {
        Self {
            valid: false,
            config_path,
            metadata_path,
            error: Some(error),
            warnings: None,
            summary: None,
        }
    }
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        let error = format!("File not found: {}", args.config.display());
        return ValidationResult::invalid(config_path, None, error);
    }

    let config = match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => config,
        Err(e) => return ValidationResult::invalid(config_path, None, e.to_string()),
    };

    let metadata = args
        .metadata
        .clone()
        .unwrap_or_else(|| resolve_metadata_path(&args.config, &config));
    let metadata_path = Some(metadata.display().to_string());

    match config_loader::MetadataLoader::load_from_path(&metadata) {
        Ok(info) => {
            let warnings = collect_warnings(&config, &info);
            let window = info.column_window();

            ValidationResult {
                valid: true,
                config_path,
                metadata_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    source: format!("{:?}", config.sensor.source),
                    lidar_mode: info.lidar_mode.clone(),
                    columns: info.width(),
                    rows: info.height(),
                    window: window.into(),
                    field: config.view.field.to_string(),
                    presenter: format!("{:?}", config.view.presenter),
                }),
            }
        }
        Err(e) => ValidationResult::invalid(config_path, metadata_path, e.to_string()),
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &AppConfig, info: &SensorInfo) -> Vec<String> {
    let mut warnings = Vec::new();

    let window = info.column_window();
    if !window.is_full(info.width()) {
        warnings.push(format!(
            "Column window [{}, {}] covers {} of {} columns",
            window.start,
            window.end,
            window.len(info.width()),
            info.width()
        ));
    }

    if config.view.presenter == PresenterKind::Log && config.view.snapshot_dir.is_some() {
        warnings.push("view.snapshot_dir is set but the log presenter ignores it".to_string());
    }

    if config.sensor.source == SourceKind::Mock && config.mock.frames == 0 && !config.mock.realtime
    {
        warnings.push("Unlimited mock frames without realtime pacing will spin a core".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            if let Some(ref metadata) = result.metadata_path {
                println!("\n  Metadata: {}", metadata);
            }
            println!("  Source: {}", summary.source);
            println!("  Lidar mode: {}", summary.lidar_mode);
            println!("  Frame: {} x {}", summary.columns, summary.rows);
            println!("  Window: [{}, {}]", summary.window[0], summary.window[1]);
            println!("  Field: {}", summary.field);
            println!("  Presenter: {}", summary.presenter);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::ColumnWindow;

    #[test]
    fn test_partial_window_warns() {
        let config = AppConfig::default();
        let mut info = SensorInfo::synthetic(16, 2, 20.0);
        assert!(collect_warnings(&config, &info).is_empty());

        info.data_format.column_window = ColumnWindow::new(0, 7);
        let warnings = collect_warnings(&config, &info);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("8 of 16"));
    }

    #[test]
    fn test_missing_file_is_invalid() {
        let result = validate_config(&ValidateArgs {
            config: "/nonexistent/viewer.toml".into(),
            metadata: None,
            json: false,
        });
        assert!(!result.valid);
        assert!(result.summary.is_none());
    }
}
