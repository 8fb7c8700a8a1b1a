//! Derived products exchanged between the ingestion and render threads

use crate::ChanField;

/// Value of the probed pixel under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelProbe {
    /// Column
    pub x: usize,
    /// Row
    pub y: usize,
    /// Raw channel value at `(y, x)`
    pub value: u32,
}

/// Pointer state reported by the presentation side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub x: i32,
    pub y: i32,
    pub button: bool,
}

impl InputSnapshot {
    /// Pointer position as `(col, row)` when the button is held inside a
    /// `width x height` grid
    pub fn probe_target(&self, width: usize, height: usize) -> Option<(usize, usize)> {
        if !self.button || self.x < 0 || self.y < 0 {
            return None;
        }
        let (x, y) = (self.x as usize, self.y as usize);
        (x < width && y < height).then_some((x, y))
    }
}

/// Grayscale image and point cloud derived from one completed scan
///
/// Immutable once built; shared as `Arc<FrameProducts>`.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameProducts {
    /// Publish count; `0` only for the placeholder
    pub sequence: u64,
    /// Frame id of the source scan
    pub frame_id: Option<u16>,
    pub width: usize,
    pub height: usize,
    /// Channel the image was normalized from
    pub field: ChanField,
    /// Row-major luminance, `width * height` bytes
    pub image: Vec<u8>,
    /// Row-major points in meters, `width * height` entries
    pub points: Vec<[f32; 3]>,
    /// Probed pixel, if the pointer was held over the scan
    pub probe: Option<PixelProbe>,
}

impl FrameProducts {
    /// Defined placeholder returned before the first publish
    pub fn placeholder(width: usize, height: usize) -> Self {
        Self {
            sequence: 0,
            frame_id: None,
            width,
            height,
            field: ChanField::default(),
            image: vec![0; width * height],
            points: vec![[0.0; 3]; width * height],
            probe: None,
        }
    }

    #[inline]
    pub fn is_placeholder(&self) -> bool {
        self.sequence == 0
    }

    /// Luminance at `(row, col)`
    pub fn luminance(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.image.get(row * self.width + col).copied()
    }

    /// Points that are not the range-0 origin sentinel
    pub fn valid_points(&self) -> impl Iterator<Item = &[f32; 3]> {
        self.points.iter().filter(|p| **p != [0.0; 3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_shape() {
        let products = FrameProducts::placeholder(4, 2);
        assert!(products.is_placeholder());
        assert_eq!(products.image.len(), 8);
        assert_eq!(products.points.len(), 8);
        assert_eq!(products.valid_points().count(), 0);
        assert_eq!(products.luminance(1, 3), Some(0));
        assert_eq!(products.luminance(2, 0), None);
    }

    #[test]
    fn test_probe_target_bounds() {
        let input = InputSnapshot {
            x: 3,
            y: 1,
            button: true,
        };
        assert_eq!(input.probe_target(4, 2), Some((3, 1)));
        assert_eq!(input.probe_target(3, 2), None);
        assert_eq!(
            InputSnapshot { x: -1, ..input }.probe_target(4, 2),
            None
        );
        assert_eq!(
            InputSnapshot {
                button: false,
                ..input
            }
            .probe_target(4, 2),
            None
        );
    }
}
