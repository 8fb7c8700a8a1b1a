//! Range image to point cloud projection

use nalgebra::DMatrix;

use crate::lut::{XyzLut, RANGE_UNIT};

/// Project a range channel (mm) through `lut` into row-major points (m)
///
/// A pixel with range `0` yields `[0.0, 0.0, 0.0]` regardless of its
/// geometry entry. The caller guarantees `range` and `lut` share a shape.
pub fn cartesian(range: &DMatrix<u32>, lut: &XyzLut) -> Vec<[f32; 3]> {
    let (rows, cols) = range.shape();
    let mut points = Vec::with_capacity(rows * cols);

    for row in 0..rows {
        let (directions, offsets) = lut.row(row);
        for col in 0..cols {
            let raw = range[(row, col)];
            if raw == 0 {
                points.push([0.0; 3]);
                continue;
            }
            let p = directions[col] * (f64::from(raw) * RANGE_UNIT) + offsets[col];
            points.push([p.x as f32, p.y as f32, p.z as f32]);
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Matrix4;

    fn lut_with_offsets(width: usize, height: usize) -> XyzLut {
        let mut transform = Matrix4::identity();
        transform[(0, 3)] = 5.0;
        transform[(2, 3)] = 40.0;
        let altitude: Vec<f64> = (0..height).map(|r| 10.0 - r as f64 * 5.0).collect();
        let azimuth: Vec<f64> = (0..height).map(|r| r as f64).collect();
        XyzLut::from_intrinsics(width, height, &altitude, &azimuth, 12.0, &transform)
    }

    #[test]
    fn test_zero_range_is_origin_sentinel() {
        let lut = lut_with_offsets(8, 4);
        let range = DMatrix::<u32>::zeros(4, 8);
        let points = cartesian(&range, &lut);
        assert_eq!(points.len(), 32);
        assert!(points.iter().all(|p| *p == [0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_point_along_direction() {
        let lut = XyzLut::from_intrinsics(4, 1, &[0.0], &[0.0], 0.0, &Matrix4::identity());
        let range = DMatrix::from_row_slice(1, 4, &[2500, 0, 1000, 0]);
        let points = cartesian(&range, &lut);
        assert!((points[0][0] - 2.5).abs() < 1e-6);
        assert!(points[0][1].abs() < 1e-6);
        assert_eq!(points[1], [0.0; 3]);
        assert!((points[2][0] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_offset_added() {
        let lut = lut_with_offsets(8, 4);
        let range = DMatrix::from_element(4, 8, 10_000u32);
        let points = cartesian(&range, &lut);
        for row in 0..4 {
            for col in 0..8 {
                let expected = lut.direction(row, col) * 10.0 + lut.offset(row, col);
                let p = points[row * 8 + col];
                assert!((f64::from(p[0]) - expected.x).abs() < 1e-4);
                assert!((f64::from(p[1]) - expected.y).abs() < 1e-4);
                assert!((f64::from(p[2]) - expected.z).abs() < 1e-4);
            }
        }
    }
}
