//! Image output for synthesized lensing images
//!
//! Converts floating point images to 8-bit grayscale and writes them as PNG.
//! Row 0 of a simulation image is the bottom of the field (smallest y), so
//! rows are flipped on output to put +y at the top of the picture.

use image::{ImageBuffer, Luma};
use ndarray::Array2;
use std::path::Path;

use crate::error::Result;

/// Scale a non-negative image to the full 8-bit range.
///
/// With `log_scale` the stretch is applied to `ln(1 + v / v_max · 1000)`,
/// which keeps faint arcs visible next to a bright lens centre. A blank or
/// non-finite image maps to all zeros.
pub fn to_u8_auto_scale(image: &Array2<f64>, log_scale: bool) -> Array2<u8> {
    let max_value = image
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);

    if max_value <= 0.0 {
        return Array2::zeros(image.dim());
    }

    let stretch = |v: f64| -> f64 {
        let v = if v.is_finite() { v.max(0.0) } else { 0.0 };
        if log_scale {
            (1.0 + 1000.0 * v / max_value).ln() / 1001.0_f64.ln()
        } else {
            v / max_value
        }
    };

    image.mapv(|v| (stretch(v) * 255.0).round().clamp(0.0, 255.0) as u8)
}

/// Save an 8-bit image to a file, +y up
pub fn save_u8_image<P: AsRef<Path>>(image: &Array2<u8>, path: P) -> Result<()> {
    let (height, width) = image.dim();

    let mut img_buffer = ImageBuffer::new(width as u32, height as u32);
    for (x, y, pixel) in img_buffer.enumerate_pixels_mut() {
        let row = height - 1 - y as usize;
        *pixel = Luma([image[[row, x as usize]]]);
    }

    img_buffer.save(path)?;
    Ok(())
}

/// Scale and save a simulated image as PNG
pub fn save_image_png<P: AsRef<Path>>(image: &Array2<f64>, path: P, log_scale: bool) -> Result<()> {
    save_u8_image(&to_u8_auto_scale(image, log_scale), path)
}
