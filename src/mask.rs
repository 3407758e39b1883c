//! Inpainting masks built from a natural-space selection.
//!
//! The mask has the image's natural size: black where the image is kept,
//! white over the region to inpaint.

use std::io::Cursor;

use base64::Engine;
use image::{GrayImage, ImageFormat, Luma};

use crate::error::Result;
use crate::geometry::{Natural, Rect};

/// Pixel value for the region to keep.
pub const KEEP: Luma<u8> = Luma([0]);
/// Pixel value for the region to inpaint.
pub const INPAINT: Luma<u8> = Luma([255]);

/// Half-open pixel span `[start, end)` covered by `[lo, hi)`, clamped to `0..limit`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixel_span(lo: f64, hi: f64, limit: u32) -> (u32, u32) {
    let limit_f = f64::from(limit);
    let start = lo.floor().clamp(0.0, limit_f) as u32;
    let end = hi.ceil().clamp(0.0, limit_f) as u32;
    (start, end.max(start))
}

/// Pixel bounds `(x0, y0, x1, y1)` the selection touches, clamped to the image.
#[must_use]
pub fn covered_pixels(width: u32, height: u32, rect: &Rect<Natural>) -> (u32, u32, u32, u32) {
    let (x0, x1) = pixel_span(rect.x, rect.right(), width);
    let (y0, y1) = pixel_span(rect.y, rect.bottom(), height);
    (x0, y0, x1, y1)
}

/// Render a `width`x`height` mask with `rect` filled white.
///
/// Every pixel the rectangle touches is marked; parts outside the image are dropped.
#[must_use]
pub fn render_mask(width: u32, height: u32, rect: &Rect<Natural>) -> GrayImage {
    let mut mask = GrayImage::from_pixel(width, height, KEEP);
    if rect.is_degenerate() {
        return mask;
    }
    let (x0, y0, x1, y1) = covered_pixels(width, height, rect);
    for y in y0..y1 {
        for x in x0..x1 {
            mask.put_pixel(x, y, INPAINT);
        }
    }
    mask
}

/// Encode a mask as PNG bytes.
///
/// # Errors
///
/// Returns an error if PNG encoding fails.
pub fn encode_png(mask: &GrayImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    mask.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Encode a mask as base64 PNG data, without a `data:` URL prefix.
///
/// # Errors
///
/// Returns an error if PNG encoding fails.
pub fn encode_png_base64(mask: &GrayImage) -> Result<String> {
    let png = encode_png(mask)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(png))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_white(mask: &GrayImage) -> usize {
        mask.pixels().filter(|p| **p == INPAINT).count()
    }

    #[test]
    fn integer_rect_fills_exact_pixels() {
        let rect = Rect::new(2.0, 3.0, 4.0, 5.0).unwrap();
        let mask = render_mask(10, 10, &rect);
        assert_eq!(count_white(&mask), 20);
        assert_eq!(*mask.get_pixel(2, 3), INPAINT);
        assert_eq!(*mask.get_pixel(5, 7), INPAINT);
        assert_eq!(*mask.get_pixel(6, 7), KEEP);
        assert_eq!(*mask.get_pixel(1, 3), KEEP);
    }

    #[test]
    fn fractional_rect_covers_touched_pixels() {
        let rect = Rect::new(1.5, 1.5, 1.0, 1.0).unwrap();
        assert_eq!(covered_pixels(10, 10, &rect), (1, 1, 3, 3));
        assert_eq!(count_white(&render_mask(10, 10, &rect)), 4);
    }

    #[test]
    fn rect_past_edges_is_clamped() {
        let rect = Rect::new(8.0, -5.0, 50.0, 7.0).unwrap();
        let mask = render_mask(10, 10, &rect);
        assert_eq!(covered_pixels(10, 10, &rect), (8, 0, 10, 2));
        assert_eq!(count_white(&mask), 4);
    }

    #[test]
    fn degenerate_rect_leaves_mask_black() {
        let rect = Rect::new(3.0, 3.0, 0.0, 4.0).unwrap();
        assert_eq!(count_white(&render_mask(10, 10, &rect)), 0);
    }

    #[test]
    fn base64_png_decodes_back_to_mask() {
        let rect = Rect::new(0.0, 0.0, 2.0, 2.0).unwrap();
        let mask = render_mask(4, 4, &rect);
        let b64 = encode_png_base64(&mask).unwrap();
        assert!(!b64.starts_with("data:"));

        let bytes = base64::engine::general_purpose::STANDARD.decode(b64).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_luma8();
        assert_eq!(decoded, mask);
    }
}
