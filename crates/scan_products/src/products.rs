//! Product computation for completed scans

use std::sync::Arc;

use contracts::{ChanField, FrameProducts, LidarScan, PixelProbe};
use tracing::trace;

use crate::error::{ProductsError, Result};
use crate::{cartesian, normalize, XyzLut};

/// Derive the grayscale image and point cloud from a completed scan
///
/// Runs entirely on the caller's thread; no shared state is touched.
pub fn compute_products(
    scan: &LidarScan,
    lut: &XyzLut,
    field: ChanField,
    sequence: u64,
    probe: Option<PixelProbe>,
) -> Result<FrameProducts> {
    if scan.width() != lut.width() || scan.height() != lut.height() {
        return Err(ProductsError::ShapeMismatch {
            scan_width: scan.width(),
            scan_height: scan.height(),
            lut_width: lut.width(),
            lut_height: lut.height(),
        });
    }

    let image = normalize(scan.field(field));
    let points = cartesian(scan.field(ChanField::Range), lut);

    trace!(
        frame_id = ?scan.frame_id(),
        sequence,
        field = %field,
        "products computed"
    );

    Ok(FrameProducts {
        sequence,
        frame_id: scan.frame_id(),
        width: scan.width(),
        height: scan.height(),
        field,
        image,
        points,
        probe,
    })
}

/// Product computer bound to one sensor's geometry
#[derive(Debug, Clone)]
pub struct ProductComputer {
    lut: Arc<XyzLut>,
    field: ChanField,
}

impl ProductComputer {
    pub fn new(lut: Arc<XyzLut>, field: ChanField) -> Self {
        Self { lut, field }
    }

    /// Channel rendered into the grayscale image
    pub fn field(&self) -> ChanField {
        self.field
    }

    pub fn lut(&self) -> &Arc<XyzLut> {
        &self.lut
    }

    /// Read the probe channel at the pointer position `(col, row)`
    pub fn probe(&self, scan: &LidarScan, target: Option<(usize, usize)>) -> Option<PixelProbe> {
        let (x, y) = target?;
        let value = *scan.field(self.field).get((y, x))?;
        Some(PixelProbe { x, y, value })
    }

    pub fn compute(
        &self,
        scan: &LidarScan,
        sequence: u64,
        probe: Option<PixelProbe>,
    ) -> Result<FrameProducts> {
        compute_products(scan, &self.lut, self.field, sequence, probe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{ColumnHeader, SensorInfo};

    fn filled_scan(width: usize, height: usize) -> LidarScan {
        let mut scan = LidarScan::new(width, height);
        scan.reset(Some(3));
        for col in 0..width {
            for row in 0..height {
                scan.field_mut(ChanField::Range)[(row, col)] = 1000 + (row * width + col) as u32;
                scan.field_mut(ChanField::Signal)[(row, col)] = 7;
            }
            scan.mark_column(col, ColumnHeader::default());
        }
        scan
    }

    #[test]
    fn test_compute_products_shapes() {
        let info = SensorInfo::synthetic(8, 2, 10.0);
        let computer = ProductComputer::new(Arc::new(XyzLut::new(&info)), ChanField::Range);
        let products = computer.compute(&filled_scan(8, 2), 1, None).unwrap();

        assert_eq!(products.sequence, 1);
        assert_eq!(products.frame_id, Some(3));
        assert_eq!(products.image.len(), 16);
        assert_eq!(products.points.len(), 16);
        assert_eq!(products.image[0], 0);
        assert_eq!(products.image[15], 255);
        assert_eq!(products.valid_points().count(), 16);
    }

    #[test]
    fn test_flat_field_gives_black_image() {
        let info = SensorInfo::synthetic(8, 2, 10.0);
        let lut = XyzLut::new(&info);
        let products = compute_products(&filled_scan(8, 2), &lut, ChanField::Signal, 4, None).unwrap();
        assert!(products.image.iter().all(|v| *v == 0));
        assert_eq!(products.field, ChanField::Signal);
    }

    #[test]
    fn test_same_scan_gives_same_products() {
        let info = SensorInfo::synthetic(8, 2, 10.0);
        let lut = XyzLut::new(&info);
        let scan = filled_scan(8, 2);

        let first = compute_products(&scan, &lut, ChanField::Range, 1, None).unwrap();
        let second = compute_products(&scan, &lut, ChanField::Range, 1, None).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            normalize(scan.field(ChanField::Range)),
            normalize(scan.field(ChanField::Range))
        );
    }

    #[test]
    fn test_shape_mismatch() {
        let lut = XyzLut::new(&SensorInfo::synthetic(16, 2, 10.0));
        let err = compute_products(&LidarScan::new(8, 2), &lut, ChanField::Range, 1, None);
        assert!(matches!(err, Err(ProductsError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_probe_reads_field() {
        let info = SensorInfo::synthetic(8, 2, 10.0);
        let computer = ProductComputer::new(Arc::new(XyzLut::new(&info)), ChanField::Range);
        let scan = filled_scan(8, 2);
        assert_eq!(
            computer.probe(&scan, Some((5, 1))),
            Some(PixelProbe {
                x: 5,
                y: 1,
                value: 1013
            })
        );
        assert_eq!(computer.probe(&scan, Some((8, 0))), None);
        assert_eq!(computer.probe(&scan, None), None);
    }
}
