//! ScanBatcher - assembles packets into frames
//!
//! Writes each valid column of a packet into the shared `LidarScan` and
//! reports when the configured column window becomes fully covered.
//! Frames are never merged across frame ids: a new id, or any packet after
//! a frame completed, resets the scan in place.

use contracts::{ChanField, ColumnWindow, LidarScan, SensorInfo};
use tracing::{debug, trace, warn};

use crate::completeness::WindowCoverage;
use crate::error::{IngestionError, Result};
use crate::packet::PacketFormat;

/// Outcome of feeding one packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEvent {
    /// The current frame still misses window columns
    InProgress,
    /// The packet completed the current frame
    Completed,
}

/// Frame assembler for one sensor
#[derive(Debug)]
pub struct ScanBatcher {
    format: PacketFormat,
    coverage: WindowCoverage,
    completed: bool,
    superseded_frames: u64,
}

impl ScanBatcher {
    /// Window bounds past the last column are clamped to it
    pub fn new(format: PacketFormat, window: ColumnWindow) -> Self {
        let clamped = window.clamped(format.columns_per_frame);
        if clamped != window {
            warn!(
                start = window.start,
                end = window.end,
                columns = format.columns_per_frame,
                "column window exceeds frame width, clamping"
            );
        }
        Self {
            coverage: WindowCoverage::new(window, format.columns_per_frame),
            format,
            completed: false,
            superseded_frames: 0,
        }
    }

    pub fn from_info(info: &SensorInfo) -> Self {
        Self::new(PacketFormat::from_info(info), info.column_window())
    }

    pub fn format(&self) -> &PacketFormat {
        &self.format
    }

    pub fn window(&self) -> ColumnWindow {
        self.coverage.window()
    }

    /// Frames abandoned before their window was covered
    pub fn superseded_frames(&self) -> u64 {
        self.superseded_frames
    }

    /// Feed one lidar packet into `scan`
    ///
    /// # Errors
    /// - `Decode` when the packet length does not match the layout
    /// - `InvalidColumn` when a valid column reports `measurement_id >= W`
    pub fn ingest(&mut self, packet: &[u8], scan: &mut LidarScan) -> Result<FrameEvent> {
        self.format.check_size(packet)?;

        let frame_id = self.format.frame_id(packet);
        if scan.frame_id() != Some(frame_id) || self.completed {
            self.rollover(frame_id, scan);
        }

        let columns = self.format.columns_per_frame;
        for column in self.format.columns(packet) {
            if !column.is_valid() {
                trace!(
                    measurement_id = column.header.measurement_id,
                    "skipping invalid column"
                );
                continue;
            }

            let col = usize::from(column.header.measurement_id);
            if col >= columns {
                return Err(IngestionError::InvalidColumn {
                    measurement_id: column.header.measurement_id,
                    columns,
                });
            }

            for (row, px) in column.pixels().enumerate() {
                scan.field_mut(ChanField::Range)[(row, col)] = px.range;
                scan.field_mut(ChanField::Signal)[(row, col)] = u32::from(px.signal);
                scan.field_mut(ChanField::Reflectivity)[(row, col)] = u32::from(px.reflectivity);
                scan.field_mut(ChanField::NearIr)[(row, col)] = u32::from(px.near_ir);
            }
            scan.mark_column(col, column.header);
            self.coverage.mark(col);
        }

        if !self.completed && self.coverage.is_complete() {
            self.completed = true;
            trace!(frame_id, "frame complete");
            return Ok(FrameEvent::Completed);
        }
        Ok(FrameEvent::InProgress)
    }

    fn rollover(&mut self, frame_id: u16, scan: &mut LidarScan) {
        // Tails of a completed frame never cover window columns
        if let Some(previous) = scan.frame_id() {
            if !self.completed && self.coverage.covered() > 0 {
                self.superseded_frames += 1;
                debug!(
                    previous,
                    frame_id,
                    covered = self.coverage.covered(),
                    required = self.coverage.required(),
                    "frame superseded before its window completed"
                );
            }
        }
        scan.reset(Some(frame_id));
        self.coverage.reset();
        self.completed = false;
    }
}
