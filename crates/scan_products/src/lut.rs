//! Sensor geometry table
//!
//! Per-pixel unit direction and origin offset, built once from the beam
//! intrinsics and shared by every scan of a session.

use std::f64::consts::PI;

use contracts::SensorInfo;
use nalgebra::{Matrix4, Vector3, Vector4};

/// Millimeters to meters
pub const RANGE_UNIT: f64 = 0.001;

/// Per-pixel geometry lookup table
///
/// Entries are row-major (`row * width + col`). Directions are unit vectors
/// in the sensor frame; offsets are in meters.
#[derive(Debug, Clone)]
pub struct XyzLut {
    width: usize,
    height: usize,
    direction: Vec<Vector3<f64>>,
    offset: Vec<Vector3<f64>>,
}

impl XyzLut {
    /// Build the table for the sensor described by `info`
    pub fn new(info: &SensorInfo) -> Self {
        let beams = &info.beam_intrinsics;
        Self::from_intrinsics(
            info.width(),
            info.height(),
            &beams.beam_altitude_angles,
            &beams.beam_azimuth_angles,
            beams.lidar_origin_to_beam_origin_mm,
            &info.lidar_to_sensor(),
        )
    }

    /// Build the table from raw intrinsics
    ///
    /// `altitude_deg` and `azimuth_deg` carry one entry per row; missing
    /// entries are treated as `0`.
    pub fn from_intrinsics(
        width: usize,
        height: usize,
        altitude_deg: &[f64],
        azimuth_deg: &[f64],
        beam_origin_mm: f64,
        transform: &Matrix4<f64>,
    ) -> Self {
        let rotation = transform.fixed_view::<3, 3>(0, 0).into_owned();
        let n = beam_origin_mm;

        let mut direction = Vec::with_capacity(width * height);
        let mut offset = Vec::with_capacity(width * height);

        for row in 0..height {
            let azimuth = -azimuth_deg.get(row).copied().unwrap_or(0.0) * PI / 180.0;
            let altitude = altitude_deg.get(row).copied().unwrap_or(0.0) * PI / 180.0;

            for col in 0..width {
                let encoder = 2.0 * PI * (1.0 - col as f64 / width as f64);

                let dir = Vector3::new(
                    (encoder + azimuth).cos() * altitude.cos(),
                    (encoder + azimuth).sin() * altitude.cos(),
                    altitude.sin(),
                );
                let beam_offset = Vector3::new(n * encoder.cos(), n * encoder.sin(), 0.0) - dir * n;

                let moved = transform * Vector4::new(beam_offset.x, beam_offset.y, beam_offset.z, 1.0);

                direction.push(rotation * dir);
                offset.push(moved.xyz() * RANGE_UNIT);
            }
        }

        Self {
            width,
            height,
            direction,
            offset,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Unit direction of pixel `(row, col)`
    #[inline]
    pub fn direction(&self, row: usize, col: usize) -> &Vector3<f64> {
        &self.direction[row * self.width + col]
    }

    /// Origin offset of pixel `(row, col)` in meters
    #[inline]
    pub fn offset(&self, row: usize, col: usize) -> &Vector3<f64> {
        &self.offset[row * self.width + col]
    }

    /// Directions and offsets of one row, indexed by column
    pub fn row(&self, row: usize) -> (&[Vector3<f64>], &[Vector3<f64>]) {
        let span = row * self.width..(row + 1) * self.width;
        (&self.direction[span.clone()], &self.offset[span])
    }
}
