//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON application configuration files
//! - Load the sensor metadata JSON document
//! - Validate both before anything is started
//!
//! # Example
//!
//! ```no_run
//! use config_loader::{ConfigLoader, MetadataLoader};
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("viewer.toml")).unwrap();
//! let info = MetadataLoader::load_from_path(&config.sensor.metadata_path).unwrap();
//! println!("{} x {}", info.width(), info.height());
//! ```

mod parser;
mod validator;

pub use contracts::{AppConfig, SensorInfo};
pub use parser::ConfigFormat;
pub use validator::validate_metadata;

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<AppConfig, ContractError> {
        let format = detect_format(path)?;
        let content = read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<AppConfig, ContractError> {
        let config: AppConfig = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Re-run validation, e.g. after CLI overrides were applied
    pub fn validate(config: &AppConfig) -> Result<(), ContractError> {
        validator::validate(config)
    }

    /// Serialize AppConfig to TOML string
    pub fn to_toml(config: &AppConfig) -> Result<String, ContractError> {
        toml::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize AppConfig to JSON string
    pub fn to_json(config: &AppConfig) -> Result<String, ContractError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

/// Sensor metadata loader
pub struct MetadataLoader;

impl MetadataLoader {
    /// Load and validate the metadata JSON document at `path`
    pub fn load_from_path(path: &Path) -> Result<SensorInfo, ContractError> {
        let content = read_file(path)?;
        Self::load_from_str(&content)
    }

    /// Parse and validate a metadata JSON document
    pub fn load_from_str(content: &str) -> Result<SensorInfo, ContractError> {
        let info: SensorInfo = parser::parse_json(content)?;
        validator::validate_metadata(&info)?;
        Ok(info)
    }
}

/// Infer configuration format from file extension
fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
    let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
        ContractError::config_parse("cannot determine file format from extension")
    })?;

    ConfigFormat::from_extension(ext)
        .ok_or_else(|| ContractError::config_parse(format!("unsupported config format: .{ext}")))
}

fn read_file(path: &Path) -> Result<String, ContractError> {
    std::fs::read_to_string(path).map_err(|e| ContractError::ConfigParse {
        message: format!("cannot read {}: {e}", path.display()),
        source: Some(Box::new(e)),
    })
}
