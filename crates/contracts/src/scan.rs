//! LidarScan - reusable frame buffer
//!
//! One buffer is allocated per session and reset in place on every frame
//! rollover. Channels are stored as `H x W` matrices (row = beam,
//! column = azimuth step). Unwritten cells hold `0`.

use nalgebra::DMatrix;

use crate::{ChanField, ColumnWindow};

/// Per-column header values recorded when a column is written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnHeader {
    /// Column timestamp (ns)
    pub timestamp: u64,
    /// Azimuth step index
    pub measurement_id: u16,
    /// Encoder count
    pub encoder_count: u32,
    /// Raw column status word
    pub status: u32,
}

/// Frame-sized buffer of per-pixel measurements
#[derive(Debug, Clone)]
pub struct LidarScan {
    width: usize,
    height: usize,
    frame_id: Option<u16>,
    channels: [DMatrix<u32>; 4],
    headers: Vec<ColumnHeader>,
    written: Vec<bool>,
}

impl LidarScan {
    /// Allocate a zeroed `width x height` scan
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            frame_id: None,
            channels: std::array::from_fn(|_| DMatrix::zeros(height, width)),
            headers: vec![ColumnHeader::default(); width],
            written: vec![false; width],
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

    /// Frame id currently being assembled, `None` before the first packet
    #[inline]
    pub fn frame_id(&self) -> Option<u16> {
        self.frame_id
    }

    /// Zero every channel, clear column marks and adopt `frame_id`
    pub fn reset(&mut self, frame_id: Option<u16>) {
        for channel in &mut self.channels {
            channel.fill(0);
        }
        self.headers.fill(ColumnHeader::default());
        self.written.fill(false);
        self.frame_id = frame_id;
    }

    /// Channel matrix (`H x W`)
    #[inline]
    pub fn field(&self, field: ChanField) -> &DMatrix<u32> {
        &self.channels[field.index()]
    }

    #[inline]
    pub fn field_mut(&mut self, field: ChanField) -> &mut DMatrix<u32> {
        &mut self.channels[field.index()]
    }

    /// Record a column header and mark the column as written
    ///
    /// Panics if `col >= width`; callers validate the index first.
    pub fn mark_column(&mut self, col: usize, header: ColumnHeader) {
        self.headers[col] = header;
        self.written[col] = true;
    }

    /// Header of column `col`
    pub fn header(&self, col: usize) -> Option<&ColumnHeader> {
        self.headers.get(col)
    }

    /// Per-column written marks, indexed by column
    #[inline]
    pub fn written(&self) -> &[bool] {
        &self.written
    }

    /// Number of written columns
    pub fn written_columns(&self) -> usize {
        self.written.iter().filter(|w| **w).count()
    }

    /// Number of written columns inside `window`
    pub fn written_in(&self, window: ColumnWindow) -> usize {
        window
            .clamped(self.width)
            .columns(self.width)
            .filter(|col| self.written[*col])
            .count()
    }

    /// Timestamp of the first written column, if any
    pub fn first_timestamp(&self) -> Option<u64> {
        self.written
            .iter()
            .zip(&self.headers)
            .find(|(w, _)| **w)
            .map(|(_, h)| h.timestamp)
    }
}
