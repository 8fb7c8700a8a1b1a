//! Column-window completeness
//!
//! A frame is complete once every column of the configured window has been
//! written. Columns outside the window never count. Window bounds past
//! the last column are clamped to it.

use contracts::ColumnWindow;

/// Full-scan completeness check over per-column written marks
///
/// `written` is indexed by column; its length is the frame width.
pub fn is_complete(written: &[bool], window: ColumnWindow) -> bool {
    let width = written.len();
    if width == 0 {
        return false;
    }
    window.clamped(width).columns(width).all(|col| written[col])
}

/// Incremental completeness tracker
///
/// Counts distinct in-window columns as they are marked, so the check
/// after each packet is O(1).
#[derive(Debug, Clone)]
pub struct WindowCoverage {
    window: ColumnWindow,
    seen: Vec<bool>,
    covered: usize,
    required: usize,
}

impl WindowCoverage {
    pub fn new(window: ColumnWindow, width: usize) -> Self {
        let window = window.clamped(width);
        Self {
            window,
            seen: vec![false; width],
            covered: 0,
            required: if width == 0 { 0 } else { window.len(width) },
        }
    }

    /// Mark `col` written; returns `true` the first time an in-window column
    /// is marked
    pub fn mark(&mut self, col: usize) -> bool {
        if !self.window.contains(col) {
            return false;
        }
        match self.seen.get_mut(col) {
            Some(seen) if !*seen => {
                *seen = true;
                self.covered += 1;
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.required > 0 && self.covered == self.required
    }

    /// In-window columns written so far
    #[inline]
    pub fn covered(&self) -> usize {
        self.covered
    }

    /// In-window columns needed for completion
    #[inline]
    pub fn required(&self) -> usize {
        self.required
    }

    pub fn window(&self) -> ColumnWindow {
        self.window
    }

    pub fn reset(&mut self) {
        self.seen.fill(false);
        self.covered = 0;
    }
}
