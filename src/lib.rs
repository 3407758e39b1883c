//! Selection and before/after comparison core for AI image tools.
//!
//! Two independent widgets drive the interactive part of the tools:
//!
//! - [`SelectionTool`]: drag a rectangle over a displayed image and receive it
//!   in the image's natural pixel space, compensating for display scaling.
//! - [`CompareSlider`]: drag a vertical reveal boundary between a "before"
//!   and an "after" image.
//!
//! [`ToolView`] owns which of them is live and routes pointer events.
//!
//! # Quick Start
//!
//! ```
//! use image_select_compare::{ImageGeometry, PointerCapture, PointerKind, Point, SelectionTool};
//!
//! let geometry = ImageGeometry::new(1000.0, 800.0, 500.0, 400.0).unwrap();
//! let mut tool = SelectionTool::new(geometry, PointerCapture::new(), |sel| {
//!     if let Some(rect) = sel {
//!         println!("selected {rect}");
//!     }
//! });
//! tool.pointer_down(Point::new(100.0, 100.0), PointerKind::Mouse);
//! tool.pointer_move(Point::new(150.0, 150.0));
//! tool.pointer_up();
//! assert_eq!(tool.selection().unwrap().width, 100.0);
//! ```
//!
//! # Masks
//!
//! The watermark remover sends an inpainting mask next to the image:
//!
//! ```
//! use image_select_compare::{mask, Rect};
//!
//! let rect = Rect::new(200.0, 200.0, 100.0, 100.0).unwrap();
//! let png_b64 = mask::encode_png_base64(&mask::render_mask(1000, 800, &rect)).unwrap();
//! assert!(!png_b64.is_empty());
//! ```

#![deny(missing_docs)]

pub mod batch;
pub mod capture;
pub mod compare;
pub mod compose;
pub mod error;
pub mod geometry;
pub mod mask;
pub mod request;
pub mod selection;
pub mod tools;
pub mod view;

pub use capture::{CaptureGuard, CaptureOwner, PointerCapture, PointerKind};
pub use compare::{CompareSlider, ContainerBounds, SliderPosition};
pub use error::{Error, Result};
pub use geometry::{Display, ImageGeometry, Natural, Point, Rect};
pub use request::{ProxyRequest, ProxyResponse};
pub use selection::{SelectionState, SelectionTool};
pub use tools::ToolKind;
pub use view::{Container, PointerEvent, ToolView, ViewState};
