//! Grayscale to RGBA expansion for display surfaces

use contracts::FrameProducts;
use image::{Rgba, RgbaImage};

/// Color used to mark the probed pixel
pub const PROBE_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Expand the luminance image into opaque gray RGBA, marking the probe
/// pixel red
pub fn to_rgba_image(products: &FrameProducts) -> RgbaImage {
    let width = products.width as u32;
    let height = products.height as u32;

    let mut rgba = RgbaImage::from_fn(width, height, |x, y| {
        let v = products
            .luminance(y as usize, x as usize)
            .unwrap_or_default();
        Rgba([v, v, v, 255])
    });

    if let Some(probe) = products.probe {
        if probe.x < products.width && probe.y < products.height {
            rgba.put_pixel(probe.x as u32, probe.y as u32, PROBE_COLOR);
        }
    }
    rgba
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::PixelProbe;

    #[test]
    fn test_gray_expansion() {
        let products = FrameProducts {
            sequence: 1,
            image: vec![0, 64, 128, 255],
            ..FrameProducts::placeholder(2, 2)
        };
        let rgba = to_rgba_image(&products);
        assert_eq!(rgba.dimensions(), (2, 2));
        assert_eq!(rgba.get_pixel(1, 0), &Rgba([64, 64, 64, 255]));
        assert_eq!(rgba.get_pixel(0, 1), &Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn test_probe_pixel_is_red() {
        let products = FrameProducts {
            sequence: 1,
            image: vec![10; 6],
            probe: Some(PixelProbe {
                x: 2,
                y: 1,
                value: 4000,
            }),
            ..FrameProducts::placeholder(3, 2)
        };
        let rgba = to_rgba_image(&products);
        assert_eq!(rgba.get_pixel(2, 1), &PROBE_COLOR);
        assert_eq!(rgba.get_pixel(1, 1), &Rgba([10, 10, 10, 255]));
    }
}
