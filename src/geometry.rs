//! Rectangles, points and the display/natural coordinate conversion.
//!
//! A rectangle carries its coordinate space in its type: `Rect<Display>` is
//! measured against the rendered image element, `Rect<Natural>` against the
//! image's intrinsic pixels. The only way to go from one to the other is
//! [`ImageGeometry::to_natural`], which scales each axis independently:
//!
//! ```text
//! natural = (x * NW/DW, y * NH/DH, w * NW/DW, h * NH/DH)
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Coordinates relative to the rendered (possibly scaled) image element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Display;

/// Coordinates relative to the image's intrinsic resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Natural;

/// A pointer position in display space, relative to the container's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal offset in pixels.
    pub x: f64,
    /// Vertical offset in pixels.
    pub y: f64,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle tagged with its coordinate space `S`.
///
/// `width` and `height` are never negative. A rectangle with zero area is
/// treated as "no selection" by the selection tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect<S> {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent, `>= 0`.
    pub width: f64,
    /// Vertical extent, `>= 0`.
    pub height: f64,
    space: PhantomData<S>,
}

impl<S> Rect<S> {
    /// Create a rectangle from its origin and size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRect`] if any component is not finite or the size is negative.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        if ![x, y, width, height].iter().all(|v| v.is_finite()) {
            return Err(Error::InvalidRect(format!(
                "non-finite component in ({x}, {y}, {width}, {height})"
            )));
        }
        if width < 0.0 || height < 0.0 {
            return Err(Error::InvalidRect(format!(
                "negative size {width}x{height}"
            )));
        }
        Ok(Self::from_parts(x, y, width, height))
    }

    const fn from_parts(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            space: PhantomData,
        }
    }

    /// Axis-aligned bounding box of two corner points, in either order.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::from_parts(
            a.x.min(b.x),
            a.y.min(b.y),
            (a.x - b.x).abs(),
            (a.y - b.y).abs(),
        )
    }

    /// Right edge (`x + width`).
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether the rectangle covers no area.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

impl<S> fmt::Display for Rect<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Parses `x,y,width,height`.
impl<S> FromStr for Rect<S> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(Error::InvalidRect(format!(
                "expected x,y,width,height but got {s:?}"
            )));
        }
        let mut values = [0.0_f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|e| Error::InvalidRect(format!("{part:?}: {e}")))?;
        }
        Self::new(values[0], values[1], values[2], values[3])
    }
}

/// Intrinsic and rendered size of an image element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageGeometry {
    natural_width: f64,
    natural_height: f64,
    display_width: f64,
    display_height: f64,
}

impl ImageGeometry {
    /// Create a geometry from the image's natural and displayed sizes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] if any dimension is zero, negative or not finite.
    pub fn new(
        natural_width: f64,
        natural_height: f64,
        display_width: f64,
        display_height: f64,
    ) -> Result<Self> {
        let valid = [natural_width, natural_height, display_width, display_height]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0);
        if !valid {
            return Err(Error::InvalidGeometry {
                natural_width,
                natural_height,
                display_width,
                display_height,
            });
        }
        Ok(Self {
            natural_width,
            natural_height,
            display_width,
            display_height,
        })
    }

    /// Geometry of an image shown at its intrinsic size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] if either dimension is zero.
    pub fn identity(width: u32, height: u32) -> Result<Self> {
        let (w, h) = (f64::from(width), f64::from(height));
        Self::new(w, h, w, h)
    }

    /// Geometry of an image fitted into a container with uniform "contain" scaling.
    ///
    /// The displayed size keeps the natural aspect ratio and touches the
    /// container on at least one axis.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] if any dimension is zero.
    pub fn contain(
        natural_width: u32,
        natural_height: u32,
        container_width: f64,
        container_height: f64,
    ) -> Result<Self> {
        let (nw, nh) = (f64::from(natural_width), f64::from(natural_height));
        if nw <= 0.0 || nh <= 0.0 {
            return Self::new(nw, nh, container_width, container_height);
        }
        let scale = (container_width / nw).min(container_height / nh);
        Self::new(nw, nh, nw * scale, nh * scale)
    }

    /// Intrinsic width in pixels.
    #[must_use]
    pub fn natural_width(&self) -> f64 {
        self.natural_width
    }

    /// Intrinsic height in pixels.
    #[must_use]
    pub fn natural_height(&self) -> f64 {
        self.natural_height
    }

    /// Rendered width in pixels.
    #[must_use]
    pub fn display_width(&self) -> f64 {
        self.display_width
    }

    /// Rendered height in pixels.
    #[must_use]
    pub fn display_height(&self) -> f64 {
        self.display_height
    }

    /// Horizontal display-to-natural factor, `NW / DW`.
    #[must_use]
    pub fn scale_x(&self) -> f64 {
        self.natural_width / self.display_width
    }

    /// Vertical display-to-natural factor, `NH / DH`.
    #[must_use]
    pub fn scale_y(&self) -> f64 {
        self.natural_height / self.display_height
    }

    /// Clamp a display-space point onto the rendered image area.
    #[must_use]
    pub fn clamp_to_display(&self, p: Point) -> Point {
        Point::new(
            p.x.clamp(0.0, self.display_width),
            p.y.clamp(0.0, self.display_height),
        )
    }

    /// Map a display-space rectangle into natural space.
    #[must_use]
    pub fn to_natural(&self, rect: &Rect<Display>) -> Rect<Natural> {
        let (sx, sy) = (self.scale_x(), self.scale_y());
        Rect::from_parts(
            rect.x * sx,
            rect.y * sy,
            rect.width * sx,
            rect.height * sy,
        )
    }
}
