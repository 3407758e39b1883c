//! Caller-owned presentation state for one tool.
//!
//! [`ToolView`] decides which widget is live: the selection tool (or a plain
//! preview) before a result exists, the compare slider (or a side-by-side
//! display) after. Pointer events from the page are routed through
//! [`ToolView::route`] to whichever widget is active.

use std::cell::RefCell;
use std::rc::Rc;

use crate::capture::{CaptureOwner, PointerCapture, PointerKind};
use crate::compare::{CompareSlider, ContainerBounds};
use crate::error::{Error, Result};
use crate::geometry::{ImageGeometry, Natural, Point, Rect};
use crate::selection::SelectionTool;
use crate::tools::ToolKind;

/// Page-space box of the interactive container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Container {
    /// Page x of the left edge.
    pub left: f64,
    /// Page y of the top edge.
    pub top: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Container {
    /// Convert a page position to container-local coordinates.
    #[must_use]
    pub fn local(&self, client: Point) -> Point {
        Point::new(client.x - self.left, client.y - self.top)
    }

    /// Whether a page position falls inside the container.
    #[must_use]
    pub fn contains(&self, client: Point) -> bool {
        let p = self.local(client);
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }

    fn bounds(&self) -> ContainerBounds {
        ContainerBounds::new(self.left, self.width)
    }
}

/// A pointer event in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Button pressed or touch started.
    Down {
        /// Page position.
        client: Point,
        /// Input device.
        kind: PointerKind,
    },
    /// Pointer moved anywhere on the page.
    Move {
        /// Page position.
        client: Point,
    },
    /// Button released or touch ended, anywhere on the page.
    Up,
    /// Pointer left the container.
    Leave,
}

/// What is shown while no result exists.
#[derive(Debug)]
pub enum EditingView {
    /// Drag-to-select over the image.
    Selecting(SelectionTool),
    /// The uploaded image alone.
    Preview,
}

/// What is shown once a result exists.
#[derive(Debug)]
pub enum ResultView {
    /// Before/after slider.
    Comparing(CompareSlider),
    /// Original and result next to each other.
    SideBySide,
}

/// Presentation mode of a tool view.
#[derive(Debug)]
pub enum ViewState {
    /// Nothing uploaded yet.
    Empty,
    /// Image loaded, no result yet.
    Editing {
        /// Size of the loaded image.
        geometry: ImageGeometry,
        /// Active widget.
        view: EditingView,
    },
    /// A processed result exists.
    Result {
        /// Size of the original image, if one was uploaded.
        geometry: Option<ImageGeometry>,
        /// Active widget.
        view: ResultView,
    },
}

/// Presentation controller for a single tool.
#[derive(Debug)]
pub struct ToolView {
    tool: ToolKind,
    container: Container,
    capture: PointerCapture,
    selection: Rc<RefCell<Option<Rect<Natural>>>>,
    state: ViewState,
}

impl ToolView {
    /// Create an empty view for `tool` laid out in `container`.
    #[must_use]
    pub fn new(tool: ToolKind, container: Container) -> Self {
        Self {
            tool,
            container,
            capture: PointerCapture::new(),
            selection: Rc::default(),
            state: ViewState::Empty,
        }
    }

    /// The tool this view drives.
    #[must_use]
    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Current presentation mode.
    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Shared pointer-capture registry used by the widgets.
    #[must_use]
    pub fn capture(&self) -> &PointerCapture {
        &self.capture
    }

    /// The latest natural-space selection reported by the selection tool.
    #[must_use]
    pub fn selection(&self) -> Option<Rect<Natural>> {
        *self.selection.borrow()
    }

    /// Move or resize the container (layout change).
    pub fn set_container(&mut self, container: Container) {
        self.container = container;
    }

    /// Load a new image: clears any selection and result.
    pub fn load_image(&mut self, geometry: ImageGeometry) {
        *self.selection.borrow_mut() = None;
        let view = if self.tool.requires_selection() {
            let sink = Rc::clone(&self.selection);
            EditingView::Selecting(SelectionTool::new(
                geometry,
                self.capture.clone(),
                move |rect| *sink.borrow_mut() = rect,
            ))
        } else {
            EditingView::Preview
        };
        log::debug!("{}: image loaded, {view:?}", self.tool.id());
        self.state = ViewState::Editing { geometry, view };
    }

    /// Check that everything processing needs is present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotReady`] when no image is loaded for an upload tool,
    /// or no area is selected for the watermark remover.
    pub fn ensure_ready(&self) -> Result<()> {
        if self.tool.takes_upload() && matches!(self.state, ViewState::Empty) {
            return Err(Error::NotReady("Please select an image first."));
        }
        if self.tool.requires_selection() && self.selection().is_none() {
            return Err(Error::NotReady(
                "Please select the watermark area on the image.",
            ));
        }
        Ok(())
    }

    /// Whether the process action should be enabled.
    #[must_use]
    pub fn can_process(&self) -> bool {
        self.ensure_ready().is_ok()
    }

    /// A processed result arrived; switch to the result presentation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotReady`] if an upload tool has no image loaded.
    pub fn set_result(&mut self) -> Result<()> {
        let geometry = match &self.state {
            ViewState::Editing { geometry, .. } => Some(*geometry),
            ViewState::Result { geometry, .. } => *geometry,
            ViewState::Empty if !self.tool.takes_upload() => None,
            ViewState::Empty => return Err(Error::NotReady("Please select an image first.")),
        };
        let view = if self.tool.compares_result() {
            ResultView::Comparing(CompareSlider::new(self.capture.clone()))
        } else {
            ResultView::SideBySide
        };
        log::debug!("{}: result ready, {view:?}", self.tool.id());
        self.state = ViewState::Result { geometry, view };
        Ok(())
    }

    /// Discard the result and return to editing the same image.
    pub fn clear_result(&mut self) {
        if let ViewState::Result { geometry, .. } = self.state {
            match geometry {
                Some(g) => self.load_image(g),
                None => self.state = ViewState::Empty,
            }
        }
    }

    /// The live compare slider, if the result is shown in one.
    #[must_use]
    pub fn slider(&self) -> Option<&CompareSlider> {
        match &self.state {
            ViewState::Result {
                view: ResultView::Comparing(s),
                ..
            } => Some(s),
            _ => None,
        }
    }

    /// The live selection tool, if the image is being selected on.
    #[must_use]
    pub fn selection_tool(&self) -> Option<&SelectionTool> {
        match &self.state {
            ViewState::Editing {
                view: EditingView::Selecting(t),
                ..
            } => Some(t),
            _ => None,
        }
    }

    /// Dispatch a page pointer event to the active widget.
    ///
    /// Downs start an interaction only inside the container. Once a widget
    /// holds a capture, moves and ups reach it wherever they happen.
    pub fn route(&mut self, event: PointerEvent) {
        let container = self.container;
        match &mut self.state {
            ViewState::Editing {
                view: EditingView::Selecting(tool),
                ..
            } => match event {
                PointerEvent::Down { client, kind } if container.contains(client) => {
                    tool.pointer_down(container.local(client), kind);
                }
                PointerEvent::Move { client }
                    if self.capture.is_captured(CaptureOwner::Selection) =>
                {
                    tool.pointer_move(container.local(client));
                }
                PointerEvent::Up => tool.pointer_up(),
                PointerEvent::Leave => tool.pointer_leave(),
                _ => {}
            },
            ViewState::Result {
                view: ResultView::Comparing(slider),
                ..
            } => match event {
                PointerEvent::Down { client, kind } if container.contains(client) => {
                    slider.drag_start(client.x, container.bounds(), kind);
                }
                PointerEvent::Move { client } if self.capture.is_captured(CaptureOwner::Slider) => {
                    slider.drag_move(client.x);
                }
                PointerEvent::Up => slider.drag_end(),
                _ => {}
            },
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container() -> Container {
        Container {
            left: 100.0,
            top: 50.0,
            width: 400.0,
            height: 400.0,
        }
    }

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            client: Point::new(x, y),
            kind: PointerKind::Mouse,
        }
    }

    fn mv(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move {
            client: Point::new(x, y),
        }
    }

    #[test]
    fn watermark_tool_selects_then_compares_side_by_side() {
        let mut view = ToolView::new(ToolKind::WatermarkRemover, container());
        assert!(matches!(view.state(), ViewState::Empty));
        assert!(!view.can_process());

        view.load_image(ImageGeometry::new(800.0, 800.0, 400.0, 400.0).unwrap());
        assert!(view.selection_tool().is_some());
        assert!(!view.can_process());

        view.route(down(110.0, 60.0));
        view.route(mv(160.0, 110.0));
        view.route(PointerEvent::Up);

        let sel = view.selection().unwrap();
        assert!((sel.x - 20.0).abs() < 1e-9);
        assert!((sel.y - 20.0).abs() < 1e-9);
        assert!((sel.width - 100.0).abs() < 1e-9);
        assert!(view.can_process());

        view.set_result().unwrap();
        assert!(matches!(
            view.state(),
            ViewState::Result {
                view: ResultView::SideBySide,
                ..
            }
        ));
    }

    #[test]
    fn loading_new_image_clears_selection() {
        let mut view = ToolView::new(ToolKind::WatermarkRemover, container());
        let g = ImageGeometry::new(400.0, 400.0, 400.0, 400.0).unwrap();
        view.load_image(g);
        view.route(down(110.0, 60.0));
        view.route(mv(200.0, 200.0));
        view.route(PointerEvent::Leave);
        assert!(view.selection().is_some());

        view.load_image(g);
        assert!(view.selection().is_none());
    }

    #[test]
    fn selection_dragged_out_of_container_stays_inside_image() {
        let mut view = ToolView::new(ToolKind::WatermarkRemover, container());
        view.load_image(ImageGeometry::new(800.0, 800.0, 400.0, 400.0).unwrap());
        view.route(down(110.0, 60.0));
        view.route(mv(50.0, 20.0));
        view.route(PointerEvent::Up);

        let sel = view.selection().unwrap();
        assert!(sel.x.abs() < 1e-9);
        assert!(sel.y.abs() < 1e-9);
        assert!((sel.width - 20.0).abs() < 1e-9);
        assert!((sel.height - 20.0).abs() < 1e-9);

        view.route(down(400.0, 300.0));
        view.route(mv(2000.0, 2000.0));
        view.route(PointerEvent::Up);
        let sel = view.selection().unwrap();
        assert!((sel.right() - 800.0).abs() < 1e-9);
        assert!((sel.bottom() - 800.0).abs() < 1e-9);
    }

    #[test]
    fn down_outside_container_is_ignored() {
        let mut view = ToolView::new(ToolKind::WatermarkRemover, container());
        view.load_image(ImageGeometry::new(400.0, 400.0, 400.0, 400.0).unwrap());
        view.route(down(10.0, 10.0));
        assert!(!view.selection_tool().unwrap().is_drawing());
        assert_eq!(view.capture().active_count(), 0);
    }

    #[test]
    fn enhancer_slider_follows_global_drag() {
        let mut view = ToolView::new(ToolKind::ImageEnhancer, container());
        view.load_image(ImageGeometry::new(400.0, 400.0, 400.0, 400.0).unwrap());
        assert!(view.selection_tool().is_none());
        view.set_result().unwrap();

        view.route(down(150.0, 200.0));
        // Far outside the container, still tracked.
        view.route(mv(900.0, 2000.0));
        assert!((view.slider().unwrap().reveal_boundary() - 100.0).abs() < 1e-9);
        view.route(mv(450.0, 2000.0));
        view.route(PointerEvent::Up);
        assert!((view.slider().unwrap().reveal_boundary() - 87.5).abs() < 1e-9);
        assert_eq!(view.capture().active_count(), 0);

        // After release, moves no longer reach the slider.
        view.route(mv(100.0, 200.0));
        assert!((view.slider().unwrap().reveal_boundary() - 87.5).abs() < 1e-9);
    }

    #[test]
    fn clearing_result_returns_to_editing() {
        let mut view = ToolView::new(ToolKind::ImageEnhancer, container());
        assert!(view.set_result().is_err());
        view.load_image(ImageGeometry::new(400.0, 400.0, 400.0, 400.0).unwrap());
        view.set_result().unwrap();
        view.route(down(150.0, 200.0));
        view.clear_result();
        assert!(matches!(view.state(), ViewState::Editing { .. }));
        assert_eq!(view.capture().active_count(), 0);
    }

    #[test]
    fn icon_generator_needs_no_upload() {
        let mut view = ToolView::new(ToolKind::IconGenerator, container());
        assert!(view.can_process());
        view.set_result().unwrap();
        view.clear_result();
        assert!(matches!(view.state(), ViewState::Empty));
    }
}
