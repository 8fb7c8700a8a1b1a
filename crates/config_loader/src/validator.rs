//! Configuration validation module
//!
//! Application config rules:
//! - UDP ports non-zero and distinct
//! - poll timeout and render interval > 0
//! - snapshot presenter has an output directory and a non-zero cadence
//!
//! Sensor metadata rules:
//! - frame width / height > 0
//! - beam intrinsic arrays have one entry per row
//! - columns_per_packet within 1..=W
//! - column window bounds < W
//! - lidar mode agrees with W
//! - only the LEGACY lidar profile is decoded

use contracts::{
    AppConfig, ContractError, LidarMode, PresenterKind, SensorInfo, SourceKind, UdpProfile,
};

/// Validate AppConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &AppConfig) -> Result<(), ContractError> {
    validate_sensor(config)?;
    validate_view(config)?;
    Ok(())
}

fn validate_sensor(config: &AppConfig) -> Result<(), ContractError> {
    let sensor = &config.sensor;

    if sensor.metadata_path.as_os_str().is_empty() {
        return Err(ContractError::config_validation(
            "sensor.metadata_path",
            "metadata_path cannot be empty",
        ));
    }

    if sensor.poll_timeout_ms == 0 {
        return Err(ContractError::config_validation(
            "sensor.poll_timeout_ms",
            "poll_timeout_ms must be > 0",
        ));
    }

    if sensor.source == SourceKind::Udp {
        if sensor.lidar_port == 0 {
            return Err(ContractError::config_validation(
                "sensor.lidar_port",
                "lidar_port must be > 0",
            ));
        }
        if sensor.imu_port == 0 {
            return Err(ContractError::config_validation(
                "sensor.imu_port",
                "imu_port must be > 0",
            ));
        }
        if sensor.lidar_port == sensor.imu_port {
            return Err(ContractError::config_validation(
                "sensor.lidar_port / sensor.imu_port",
                format!("lidar and imu ports must differ, both are {}", sensor.lidar_port),
            ));
        }
    }

    Ok(())
}

fn validate_view(config: &AppConfig) -> Result<(), ContractError> {
    let view = &config.view;

    if view.render_interval_ms == 0 {
        return Err(ContractError::config_validation(
            "view.render_interval_ms",
            "render_interval_ms must be > 0",
        ));
    }

    if view.presenter == PresenterKind::Snapshot {
        if view.snapshot_dir.is_none() {
            return Err(ContractError::config_validation(
                "view.snapshot_dir",
                "snapshot presenter requires snapshot_dir",
            ));
        }
        if view.snapshot_every == 0 {
            return Err(ContractError::config_validation(
                "view.snapshot_every",
                "snapshot_every must be > 0",
            ));
        }
    }

    Ok(())
}

/// Validate sensor metadata
///
/// Returns the first error encountered, or Ok(()).
pub fn validate_metadata(info: &SensorInfo) -> Result<(), ContractError> {
    validate_dimensions(info)?;
    validate_beam_intrinsics(info)?;
    validate_packet_layout(info)?;
    validate_column_window(info)?;
    validate_lidar_mode(info)?;
    validate_transform(info)?;
    Ok(())
}

fn validate_dimensions(info: &SensorInfo) -> Result<(), ContractError> {
    if info.width() == 0 {
        return Err(ContractError::config_validation(
            "data_format.columns_per_frame",
            "columns_per_frame must be > 0",
        ));
    }
    if info.height() == 0 {
        return Err(ContractError::config_validation(
            "data_format.pixels_per_column",
            "pixels_per_column must be > 0",
        ));
    }
    Ok(())
}

fn validate_beam_intrinsics(info: &SensorInfo) -> Result<(), ContractError> {
    let beams = &info.beam_intrinsics;
    let height = info.height();

    if beams.beam_altitude_angles.len() != height {
        return Err(ContractError::config_validation(
            "beam_altitude_angles",
            format!(
                "expected {} entries (one per row), got {}",
                height,
                beams.beam_altitude_angles.len()
            ),
        ));
    }
    if beams.beam_azimuth_angles.len() != height {
        return Err(ContractError::config_validation(
            "beam_azimuth_angles",
            format!(
                "expected {} entries (one per row), got {}",
                height,
                beams.beam_azimuth_angles.len()
            ),
        ));
    }
    Ok(())
}

fn validate_packet_layout(info: &SensorInfo) -> Result<(), ContractError> {
    let format = &info.data_format;

    if format.columns_per_packet == 0 || format.columns_per_packet > format.columns_per_frame {
        return Err(ContractError::config_validation(
            "data_format.columns_per_packet",
            format!(
                "columns_per_packet must be within 1..={}, got {}",
                format.columns_per_frame, format.columns_per_packet
            ),
        ));
    }

    if let UdpProfile::Other(name) = &format.udp_profile_lidar {
        return Err(ContractError::config_validation(
            "data_format.udp_profile_lidar",
            format!("unsupported lidar profile '{name}', only LEGACY is decoded"),
        ));
    }

    Ok(())
}

fn validate_column_window(info: &SensorInfo) -> Result<(), ContractError> {
    let window = info.column_window();
    let width = info.width();

    if window.start >= width || window.end >= width {
        return Err(ContractError::config_validation(
            "data_format.column_window",
            format!(
                "window [{}, {}] out of range for {} columns",
                window.start, window.end, width
            ),
        ));
    }
    Ok(())
}

fn validate_lidar_mode(info: &SensorInfo) -> Result<(), ContractError> {
    let mode = LidarMode::parse(&info.lidar_mode)?;

    if mode.columns != info.width() {
        return Err(ContractError::config_validation(
            "lidar_mode",
            format!(
                "mode '{}' disagrees with columns_per_frame {}",
                info.lidar_mode,
                info.width()
            ),
        ));
    }
    if mode.frequency_hz == 0 {
        return Err(ContractError::config_validation(
            "lidar_mode",
            "rotation rate must be > 0",
        ));
    }
    Ok(())
}

fn validate_transform(info: &SensorInfo) -> Result<(), ContractError> {
    if let Some(values) = &info.lidar_to_sensor_transform {
        if values.len() != 16 {
            return Err(ContractError::config_validation(
                "lidar_to_sensor_transform",
                format!("expected 16 values (row-major 4x4), got {}", values.len()),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::ColumnWindow;
    use std::path::PathBuf;

    fn minimal_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.sensor.metadata_path = PathBuf::from("metadata.json");
        config
    }

    fn field_of(err: ContractError) -> String {
        match err {
            ContractError::ConfigValidation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&minimal_config()).is_ok());
    }

    #[test]
    fn test_same_ports_rejected_for_udp() {
        let mut config = minimal_config();
        config.sensor.imu_port = config.sensor.lidar_port;
        let field = field_of(validate(&config).unwrap_err());
        assert_eq!(field, "sensor.lidar_port / sensor.imu_port");
    }

    #[test]
    fn test_ports_ignored_for_mock() {
        let mut config = minimal_config();
        config.sensor.source = SourceKind::Mock;
        config.sensor.lidar_port = 0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_render_interval() {
        let mut config = minimal_config();
        config.view.render_interval_ms = 0;
        assert_eq!(
            field_of(validate(&config).unwrap_err()),
            "view.render_interval_ms"
        );
    }

    #[test]
    fn test_snapshot_requires_dir() {
        let mut config = minimal_config();
        config.view.presenter = PresenterKind::Snapshot;
        assert_eq!(field_of(validate(&config).unwrap_err()), "view.snapshot_dir");

        config.view.snapshot_dir = Some(PathBuf::from("/tmp/out"));
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_valid_metadata() {
        let info = SensorInfo::synthetic(1024, 16, 33.2);
        assert!(validate_metadata(&info).is_ok());
    }

    #[test]
    fn test_beam_count_mismatch() {
        let mut info = SensorInfo::synthetic(512, 16, 33.2);
        info.beam_intrinsics.beam_azimuth_angles.pop();
        assert_eq!(
            field_of(validate_metadata(&info).unwrap_err()),
            "beam_azimuth_angles"
        );
    }

    #[test]
    fn test_window_out_of_range() {
        let mut info = SensorInfo::synthetic(512, 16, 33.2);
        info.data_format.column_window = ColumnWindow::new(100, 512);
        assert_eq!(
            field_of(validate_metadata(&info).unwrap_err()),
            "data_format.column_window"
        );
    }

    #[test]
    fn test_wrapping_window_accepted() {
        let mut info = SensorInfo::synthetic(512, 16, 33.2);
        info.data_format.column_window = ColumnWindow::new(400, 100);
        assert!(validate_metadata(&info).is_ok());
    }

    #[test]
    fn test_columns_per_packet_bounds() {
        let mut info = SensorInfo::synthetic(512, 16, 33.2);
        info.data_format.columns_per_packet = 0;
        assert_eq!(
            field_of(validate_metadata(&info).unwrap_err()),
            "data_format.columns_per_packet"
        );
    }

    #[test]
    fn test_lidar_mode_mismatch() {
        let mut info = SensorInfo::synthetic(512, 16, 33.2);
        info.lidar_mode = "1024x10".to_string();
        assert_eq!(field_of(validate_metadata(&info).unwrap_err()), "lidar_mode");
    }

    #[test]
    fn test_unsupported_profile() {
        let mut info = SensorInfo::synthetic(512, 16, 33.2);
        info.data_format.udp_profile_lidar = UdpProfile::Other("RNG15_RFL8_NIR8".into());
        assert_eq!(
            field_of(validate_metadata(&info).unwrap_err()),
            "data_format.udp_profile_lidar"
        );
    }

    #[test]
    fn test_transform_length() {
        let mut info = SensorInfo::synthetic(512, 16, 33.2);
        info.lidar_to_sensor_transform = Some(vec![1.0; 12]);
        assert_eq!(
            field_of(validate_metadata(&info).unwrap_err()),
            "lidar_to_sensor_transform"
        );
    }
}
