//! Grayscale normalization of one channel

use nalgebra::DMatrix;

/// Stretch `channel` onto `0..=255`, returning row-major luminance
///
/// Uses the channel's own min/max; a flat channel maps to all zeros.
pub fn normalize(channel: &DMatrix<u32>) -> Vec<u8> {
    let (rows, cols) = channel.shape();
    let mut image = Vec::with_capacity(rows * cols);

    let Some((min, max)) = min_max(channel.iter().copied()) else {
        return image;
    };
    let span = u64::from(max - min);

    for row in 0..rows {
        for col in 0..cols {
            let value = if span == 0 {
                0
            } else {
                (u64::from(channel[(row, col)] - min) * 255 / span) as u8
            };
            image.push(value);
        }
    }
    image
}

fn min_max(values: impl Iterator<Item = u32>) -> Option<(u32, u32)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_stretch() {
        let channel = DMatrix::from_row_slice(1, 3, &[100, 110, 120]);
        assert_eq!(normalize(&channel), vec![0, 127, 255]);
    }

    #[test]
    fn test_row_major_output() {
        let channel = DMatrix::from_row_slice(2, 2, &[0, 255, 510, 1020]);
        assert_eq!(normalize(&channel), vec![0, 63, 127, 255]);
    }

    #[test]
    fn test_flat_channel_is_black() {
        let channel = DMatrix::from_element(4, 8, 4242u32);
        assert!(normalize(&channel).iter().all(|v| *v == 0));
    }

    #[test]
    fn test_full_20_bit_range_does_not_overflow() {
        let channel = DMatrix::from_row_slice(1, 2, &[0, (1 << 20) - 1]);
        assert_eq!(normalize(&channel), vec![0, 255]);
    }

    #[test]
    fn test_idempotent() {
        let channel = DMatrix::from_fn(16, 32, |r, c| ((r * 37 + c * 101) % 4000) as u32);
        let once = normalize(&channel);
        let widened: Vec<u32> = once.iter().map(|v| u32::from(*v)).collect();
        let again = normalize(&DMatrix::from_row_slice(16, 32, &widened));
        assert_eq!(once, again);
    }

    #[test]
    fn test_empty_channel() {
        let channel = DMatrix::<u32>::zeros(0, 0);
        assert!(normalize(&channel).is_empty());
    }
}
