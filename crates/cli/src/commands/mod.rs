//! Command implementations.

mod info;
mod run;
mod validate;

use std::path::{Path, PathBuf};

use contracts::AppConfig;

pub use info::run_info;
pub use run::{load_run_config, run_pipeline};
pub use validate::run_validate;

/// Resolve a relative metadata path against the config file's directory
fn resolve_metadata_path(config_path: &Path, config: &AppConfig) -> PathBuf {
    let metadata = &config.sensor.metadata_path;
    match config_path.parent() {
        Some(dir) if metadata.is_relative() => dir.join(metadata),
        _ => metadata.clone(),
    }
}
