//! ColumnWindow - active azimuth arc of a frame
//!
//! An inclusive pair of column indices. When `start > end` the arc wraps
//! across the `W` boundary.

use serde::{Deserialize, Serialize};

/// Inclusive column window `[start, end]`
///
/// Serialized as a two-element array, matching the sensor metadata layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct ColumnWindow {
    /// First column of the arc
    pub start: usize,
    /// Last column of the arc (inclusive)
    pub end: usize,
}

impl ColumnWindow {
    /// Create a window from its inclusive bounds
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Window covering every column of a `columns`-wide frame
    pub fn full(columns: usize) -> Self {
        Self {
            start: 0,
            end: columns.saturating_sub(1),
        }
    }

    /// Whether the arc wraps across the frame boundary
    pub fn wraps(&self) -> bool {
        self.start > self.end
    }

    /// Window with both bounds pulled inside a `columns`-wide frame
    pub fn clamped(&self, columns: usize) -> Self {
        let last = columns.saturating_sub(1);
        Self::new(self.start.min(last), self.end.min(last))
    }

    /// Number of columns covered in a `columns`-wide frame
    pub fn len(&self, columns: usize) -> usize {
        if self.wraps() {
            columns.saturating_sub(self.start) + self.end + 1
        } else {
            self.end - self.start + 1
        }
    }

    /// Whether the window covers the whole ring
    pub fn is_full(&self, columns: usize) -> bool {
        self.len(columns) >= columns
    }

    /// Whether `col` lies inside the arc
    #[inline]
    pub fn contains(&self, col: usize) -> bool {
        if self.wraps() {
            col >= self.start || col <= self.end
        } else {
            col >= self.start && col <= self.end
        }
    }

    /// Iterate the covered columns in azimuth order starting at `start`
    pub fn columns(&self, columns: usize) -> impl Iterator<Item = usize> + '_ {
        let start = self.start;
        (0..self.len(columns)).map(move |i| (start + i) % columns)
    }
}

impl From<[usize; 2]> for ColumnWindow {
    fn from(bounds: [usize; 2]) -> Self {
        Self::new(bounds[0], bounds[1])
    }
}

impl From<ColumnWindow> for [usize; 2] {
    fn from(window: ColumnWindow) -> Self {
        [window.start, window.end]
    }
}
