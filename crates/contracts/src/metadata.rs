//! SensorInfo - parsed sensor metadata
//!
//! Mirrors the JSON document served by the sensor. Retrieval is handled by
//! the sensor client; this crate only describes the parsed shape.

use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{ColumnWindow, ContractError};

/// Parsed sensor metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorInfo {
    /// Product line (e.g. "OS-1-64")
    #[serde(default)]
    pub prod_line: String,

    /// Serial number
    #[serde(default)]
    pub prod_sn: String,

    /// Firmware revision
    #[serde(default, alias = "fw_rev")]
    pub build_rev: String,

    /// Lidar mode string, `<columns>x<rate_hz>` (e.g. "1024x10")
    pub lidar_mode: String,

    /// Packet and frame layout
    pub data_format: DataFormat,

    /// Per-beam intrinsic calibration
    #[serde(flatten)]
    pub beam_intrinsics: BeamIntrinsics,

    /// Row-major 4x4 lidar-to-sensor transform, translation in millimeters
    #[serde(default)]
    pub lidar_to_sensor_transform: Option<Vec<f64>>,
}

/// Frame and packet layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataFormat {
    /// Frame width `W` (azimuth steps per rotation)
    pub columns_per_frame: usize,

    /// Frame height `H` (beams)
    pub pixels_per_column: usize,

    /// Column blocks per lidar packet
    #[serde(default = "default_columns_per_packet")]
    pub columns_per_packet: usize,

    /// Configured azimuth window
    pub column_window: ColumnWindow,

    /// UDP lidar packet profile
    #[serde(default)]
    pub udp_profile_lidar: UdpProfile,
}

fn default_columns_per_packet() -> usize {
    16
}

/// Beam intrinsics used to build the geometry table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BeamIntrinsics {
    /// Beam elevation angles (degrees), one per row
    pub beam_altitude_angles: Vec<f64>,

    /// Beam azimuth offsets (degrees), one per row
    pub beam_azimuth_angles: Vec<f64>,

    /// Distance between the lidar origin and the beam origin (mm)
    pub lidar_origin_to_beam_origin_mm: f64,
}

/// UDP lidar packet profile
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UdpProfile {
    /// Legacy fixed column layout
    #[default]
    Legacy,
    /// Any profile this crate does not decode
    Other(String),
}

impl From<String> for UdpProfile {
    fn from(name: String) -> Self {
        if name.eq_ignore_ascii_case("LEGACY") {
            Self::Legacy
        } else {
            Self::Other(name)
        }
    }
}

impl From<UdpProfile> for String {
    fn from(profile: UdpProfile) -> Self {
        profile.to_string()
    }
}

impl fmt::Display for UdpProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UdpProfile::Legacy => f.write_str("LEGACY"),
            UdpProfile::Other(name) => f.write_str(name),
        }
    }
}

/// Lidar mode parsed from `<columns>x<rate_hz>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LidarMode {
    /// Columns per rotation
    pub columns: usize,
    /// Rotation rate (Hz)
    pub frequency_hz: u32,
}

impl LidarMode {
    /// Parse a lidar mode string
    pub fn parse(mode: &str) -> Result<Self, ContractError> {
        let (columns, rate) = mode.split_once('x').ok_or_else(|| {
            ContractError::config_validation("lidar_mode", format!("malformed mode '{mode}'"))
        })?;
        let columns = columns.trim().parse().map_err(|_| {
            ContractError::config_validation("lidar_mode", format!("bad column count in '{mode}'"))
        })?;
        let frequency_hz = rate.trim().parse().map_err(|_| {
            ContractError::config_validation("lidar_mode", format!("bad rate in '{mode}'"))
        })?;
        Ok(Self {
            columns,
            frequency_hz,
        })
    }
}

impl SensorInfo {
    /// Frame width `W`
    #[inline]
    pub fn width(&self) -> usize {
        self.data_format.columns_per_frame
    }

    /// Frame height `H`
    #[inline]
    pub fn height(&self) -> usize {
        self.data_format.pixels_per_column
    }

    /// Configured column window
    #[inline]
    pub fn column_window(&self) -> ColumnWindow {
        self.data_format.column_window
    }

    /// Parsed lidar mode
    pub fn mode(&self) -> Result<LidarMode, ContractError> {
        LidarMode::parse(&self.lidar_mode)
    }

    /// Lidar-to-sensor transform, identity when the metadata omits it
    pub fn lidar_to_sensor(&self) -> Matrix4<f64> {
        match &self.lidar_to_sensor_transform {
            Some(values) if values.len() == 16 => Matrix4::from_row_slice(values),
            _ => Matrix4::identity(),
        }
    }

    /// Minimal metadata for a `width x height` sensor with evenly spread beams
    ///
    /// Beams span +/- `fov_deg / 2` in elevation with zero azimuth offsets.
    pub fn synthetic(width: usize, height: usize, fov_deg: f64) -> Self {
        let step = if height > 1 {
            fov_deg / (height - 1) as f64
        } else {
            0.0
        };
        let beam_altitude_angles = (0..height)
            .map(|row| fov_deg / 2.0 - row as f64 * step)
            .collect();

        Self {
            prod_line: "synthetic".to_string(),
            prod_sn: "0".to_string(),
            build_rev: "v0.0.0".to_string(),
            lidar_mode: format!("{width}x10"),
            data_format: DataFormat {
                columns_per_frame: width,
                pixels_per_column: height,
                columns_per_packet: default_columns_per_packet().min(width),
                column_window: ColumnWindow::full(width),
                udp_profile_lidar: UdpProfile::Legacy,
            },
            beam_intrinsics: BeamIntrinsics {
                beam_altitude_angles,
                beam_azimuth_angles: vec![0.0; height],
                lidar_origin_to_beam_origin_mm: 0.0,
            },
            lidar_to_sensor_transform: None,
        }
    }
}
