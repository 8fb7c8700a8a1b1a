//! AppConfig - Config Loader output
//!
//! Describes where packets come from, which channel is viewed, how products
//! are presented, and observability settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ChanField;

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Sensor connection
    pub sensor: SensorConfig,

    /// Mock sensor settings (used when `sensor.source = "mock"`)
    #[serde(default)]
    pub mock: MockConfig,

    /// View and presenter settings
    #[serde(default)]
    pub view: ViewConfig,

    /// Logging and metrics
    #[serde(default)]
    pub observability: ObservabilitySettings,
}

/// Packet source kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    Udp,
    Mock,
}

/// Sensor connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Path to the metadata JSON served by the sensor
    pub metadata_path: PathBuf,

    #[serde(default)]
    pub source: SourceKind,

    /// Sensor hostname (informational, used in the startup banner)
    #[serde(default)]
    pub hostname: Option<String>,

    #[serde(default = "default_lidar_port")]
    pub lidar_port: u16,

    #[serde(default = "default_imu_port")]
    pub imu_port: u16,

    /// Poll timeout (ms)
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            metadata_path: PathBuf::from("metadata.json"),
            source: SourceKind::default(),
            hostname: None,
            lidar_port: default_lidar_port(),
            imu_port: default_imu_port(),
            poll_timeout_ms: default_poll_timeout_ms(),
        }
    }
}

fn default_lidar_port() -> u16 {
    7502
}

fn default_imu_port() -> u16 {
    7503
}

fn default_poll_timeout_ms() -> u64 {
    1000
}

/// Mock sensor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    /// Frames to emit before reporting exit (0 = unlimited)
    #[serde(default)]
    pub frames: u64,

    /// Pace frames at the lidar-mode rotation rate
    #[serde(default = "default_true")]
    pub realtime: bool,

    /// Invalidate one column every N packets (0 = off)
    #[serde(default)]
    pub dropout_every: u64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            frames: 0,
            realtime: true,
            dropout_every: 0,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Presenter kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenterKind {
    #[default]
    Log,
    Snapshot,
}

/// View configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Channel normalized into the grayscale image
    #[serde(default)]
    pub field: ChanField,

    /// Render tick (ms)
    #[serde(default = "default_render_interval_ms")]
    pub render_interval_ms: u64,

    #[serde(default)]
    pub presenter: PresenterKind,

    /// Output directory for the snapshot presenter
    #[serde(default)]
    pub snapshot_dir: Option<PathBuf>,

    /// Write every N-th presented frame
    #[serde(default = "default_snapshot_every")]
    pub snapshot_every: u64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            field: ChanField::default(),
            render_interval_ms: default_render_interval_ms(),
            presenter: PresenterKind::default(),
            snapshot_dir: None,
            snapshot_every: default_snapshot_every(),
        }
    }
}

fn default_render_interval_ms() -> u64 {
    16
}

fn default_snapshot_every() -> u64 {
    10
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilitySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Prometheus exporter port (absent or 0 = disabled)
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            metrics_port: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
