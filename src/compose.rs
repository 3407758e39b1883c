//! Still rendering of what the compare slider shows.
//!
//! Both images are resized into the same centered "contain" box, derived from
//! the "before" image, so they stay aligned at every slider position. An
//! "after" image with a different aspect ratio is stretched to that box. The
//! sources are only read.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::compare::SliderPosition;
use crate::error::{Error, Result};
use crate::geometry::ImageGeometry;

/// Filter used when fitting images into the container.
const FIT_FILTER: FilterType = FilterType::Triangle;

/// Placement of the fitted image box inside the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitBox {
    /// Left offset inside the container.
    pub x: u32,
    /// Top offset inside the container.
    pub y: u32,
    /// Fitted width.
    pub width: u32,
    /// Fitted height.
    pub height: u32,
}

/// Centered contain-fit box for a `natural` image in a `container` box.
///
/// # Errors
///
/// Returns [`Error::InvalidGeometry`] if any dimension is zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn fit_box(natural: (u32, u32), container: (u32, u32)) -> Result<FitBox> {
    let (cw, ch) = container;
    let g = ImageGeometry::contain(natural.0, natural.1, f64::from(cw), f64::from(ch))?;
    let width = (g.display_width().round() as u32).clamp(1, cw);
    let height = (g.display_height().round() as u32).clamp(1, ch);
    Ok(FitBox {
        x: (cw - width) / 2,
        y: (ch - height) / 2,
        width,
        height,
    })
}

/// Render the comparison at `position` into a `container_width`x`container_height` canvas.
///
/// "Before" is drawn everywhere; "after" only left of the reveal boundary.
/// "After" is stretched to the box fitted for "before". Pixels outside the
/// fitted box are transparent.
///
/// # Errors
///
/// Returns [`Error::InvalidGeometry`] if the container or either image is empty.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn render_snapshot(
    before: &RgbaImage,
    after: &RgbaImage,
    container_width: u32,
    container_height: u32,
    position: SliderPosition,
) -> Result<RgbaImage> {
    if after.width() == 0 || after.height() == 0 {
        return Err(Error::InvalidGeometry {
            natural_width: f64::from(after.width()),
            natural_height: f64::from(after.height()),
            display_width: f64::from(container_width),
            display_height: f64::from(container_height),
        });
    }
    let fit = fit_box(before.dimensions(), (container_width, container_height))?;
    log::debug!(
        "snapshot: {}x{} box at ({}, {}), boundary {:.2}%",
        fit.width,
        fit.height,
        fit.x,
        fit.y,
        position.percent()
    );

    let before_fit = imageops::resize(before, fit.width, fit.height, FIT_FILTER);
    let after_fit = imageops::resize(after, fit.width, fit.height, FIT_FILTER);

    let mut canvas = RgbaImage::from_pixel(container_width, container_height, Rgba([0, 0, 0, 0]));
    imageops::replace(&mut canvas, &before_fit, i64::from(fit.x), i64::from(fit.y));

    let boundary = (f64::from(container_width) * position.percent() / 100.0).round() as u32;
    let reveal_end = boundary.saturating_sub(fit.x).min(fit.width);
    for y in 0..fit.height {
        for x in 0..reveal_end {
            canvas.put_pixel(fit.x + x, fit.y + y, *after_fit.get_pixel(x, y));
        }
    }
    Ok(canvas)
}
