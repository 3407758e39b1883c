//! Drag-to-select rectangle over a displayed image.
//!
//! The tool is a three-state machine:
//!
//! ```text
//! Idle --down--> Drawing --move--> Drawing
//! Drawing --up/leave--> Selected   (non-degenerate, emits Some(natural rect))
//! Drawing --up/leave--> Idle       (degenerate, emits None)
//! Selected --down--> Drawing       (emits None, old selection discarded)
//! ```
//!
//! Only pointer-down and finalize notify the caller; intermediate moves update
//! the overlay rectangle alone.

use crate::capture::{CaptureGuard, CaptureOwner, PointerCapture, PointerKind};
use crate::geometry::{Display, ImageGeometry, Natural, Point, Rect};

/// Callback receiving the natural-space selection, or `None` when cleared.
pub type SelectionCallback = Box<dyn FnMut(Option<Rect<Natural>>)>;

/// Where the selection tool is in its drag lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionState {
    /// No drag in progress and no selection.
    Idle,
    /// A drag is in progress from `anchor`.
    Drawing {
        /// Point where the drag started.
        anchor: Point,
    },
    /// A completed selection exists.
    Selected,
}

/// Single-rectangle selection over an image element.
pub struct SelectionTool {
    geometry: ImageGeometry,
    state: SelectionState,
    overlay: Option<Rect<Display>>,
    selection: Option<Rect<Natural>>,
    capture: PointerCapture,
    guard: Option<CaptureGuard>,
    on_change: SelectionCallback,
}

impl std::fmt::Debug for SelectionTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionTool")
            .field("geometry", &self.geometry)
            .field("state", &self.state)
            .field("overlay", &self.overlay)
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}

impl SelectionTool {
    /// Create an idle selection tool for an image with the given geometry.
    pub fn new(
        geometry: ImageGeometry,
        capture: PointerCapture,
        on_change: impl FnMut(Option<Rect<Natural>>) + 'static,
    ) -> Self {
        Self {
            geometry,
            state: SelectionState::Idle,
            overlay: None,
            selection: None,
            capture,
            guard: None,
            on_change: Box::new(on_change),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self.state, SelectionState::Drawing { .. })
    }

    /// The display-space rectangle to draw over the image, if any.
    #[must_use]
    pub fn overlay(&self) -> Option<Rect<Display>> {
        self.overlay
    }

    /// The last emitted natural-space selection.
    #[must_use]
    pub fn selection(&self) -> Option<Rect<Natural>> {
        self.selection
    }

    /// Geometry used to convert the next finalized selection.
    #[must_use]
    pub fn geometry(&self) -> ImageGeometry {
        self.geometry
    }

    /// Update the image's rendered or intrinsic size (e.g. after a resize).
    pub fn set_geometry(&mut self, geometry: ImageGeometry) {
        self.geometry = geometry;
    }

    /// Start a new drag at `pos`, discarding any previous selection.
    pub fn pointer_down(&mut self, pos: Point, kind: PointerKind) {
        let pos = self.geometry.clamp_to_display(pos);
        log::debug!("selection: down at ({}, {})", pos.x, pos.y);
        self.state = SelectionState::Drawing { anchor: pos };
        self.overlay = None;
        self.selection = None;
        self.guard = Some(self.capture.acquire(CaptureOwner::Selection, kind));
        (self.on_change)(None);
    }

    /// Extend the in-progress drag to `pos`. Ignored unless drawing.
    ///
    /// Points outside the rendered image are pinned to its edges.
    pub fn pointer_move(&mut self, pos: Point) {
        if let SelectionState::Drawing { anchor } = self.state {
            let pos = self.geometry.clamp_to_display(pos);
            self.overlay = Some(Rect::from_corners(anchor, pos));
        }
    }

    /// Finish the drag and report the result. Ignored unless drawing.
    pub fn pointer_up(&mut self) {
        if !self.is_drawing() {
            return;
        }
        self.guard = None;

        match self.overlay.filter(|r| !r.is_degenerate()) {
            Some(display) => {
                let natural = self.geometry.to_natural(&display);
                log::info!("selection: {display} display -> {natural} natural");
                self.state = SelectionState::Selected;
                self.selection = Some(natural);
                (self.on_change)(Some(natural));
            }
            None => {
                log::debug!("selection: degenerate drag, no selection");
                self.state = SelectionState::Idle;
                self.overlay = None;
                (self.on_change)(None);
            }
        }
    }

    /// The pointer left the container; finalizes an in-progress drag.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// Drop any drag or selection without notifying the caller.
    pub fn reset(&mut self) {
        self.state = SelectionState::Idle;
        self.overlay = None;
        self.selection = None;
        self.guard = None;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    type Log = Rc<RefCell<Vec<Option<Rect<Natural>>>>>;

    fn tool(geometry: ImageGeometry) -> (SelectionTool, Log, PointerCapture) {
        let log: Log = Rc::default();
        let sink = Rc::clone(&log);
        let capture = PointerCapture::new();
        let tool = SelectionTool::new(geometry, capture.clone(), move |r| {
            sink.borrow_mut().push(r);
        });
        (tool, log, capture)
    }

    fn half_scale() -> ImageGeometry {
        ImageGeometry::new(1000.0, 800.0, 500.0, 400.0).unwrap()
    }

    #[test]
    fn click_without_drag_emits_none() {
        let (mut t, log, _) = tool(half_scale());
        t.pointer_down(Point::new(40.0, 40.0), PointerKind::Mouse);
        t.pointer_up();

        assert_eq!(*log.borrow(), vec![None, None]);
        assert_eq!(t.state(), SelectionState::Idle);
        assert!(t.overlay().is_none());
    }

    #[test]
    fn move_updates_overlay_without_notifying() {
        let (mut t, log, _) = tool(half_scale());
        t.pointer_down(Point::new(150.0, 150.0), PointerKind::Mouse);
        t.pointer_move(Point::new(100.0, 120.0));

        assert_eq!(log.borrow().len(), 1);
        let overlay = t.overlay().unwrap();
        assert!((overlay.x - 100.0).abs() < 1e-9);
        assert!((overlay.y - 120.0).abs() < 1e-9);
        assert!((overlay.width - 50.0).abs() < 1e-9);
        assert!((overlay.height - 30.0).abs() < 1e-9);
    }

    #[test]
    fn completed_drag_emits_natural_rect() {
        let (mut t, log, _) = tool(half_scale());
        t.pointer_down(Point::new(100.0, 100.0), PointerKind::Mouse);
        t.pointer_move(Point::new(150.0, 150.0));
        t.pointer_up();

        let emitted = log.borrow().last().copied().flatten().unwrap();
        assert!((emitted.x - 200.0).abs() < 1e-9);
        assert!((emitted.y - 200.0).abs() < 1e-9);
        assert!((emitted.width - 100.0).abs() < 1e-9);
        assert!((emitted.height - 100.0).abs() < 1e-9);
        assert_eq!(t.state(), SelectionState::Selected);
        assert_eq!(t.selection(), Some(emitted));
    }

    #[test]
    fn new_drag_clears_previous_selection_first() {
        let (mut t, log, _) = tool(half_scale());
        t.pointer_down(Point::new(10.0, 10.0), PointerKind::Mouse);
        t.pointer_move(Point::new(20.0, 20.0));
        t.pointer_up();
        assert!(t.selection().is_some());

        t.pointer_down(Point::new(30.0, 30.0), PointerKind::Mouse);
        assert_eq!(log.borrow().len(), 3);
        assert_eq!(log.borrow()[2], None);
        assert!(t.selection().is_none());
        assert!(t.is_drawing());
    }

    #[test]
    fn leaving_container_finalizes_drag() {
        let (mut t, log, capture) = tool(half_scale());
        t.pointer_down(Point::new(0.0, 0.0), PointerKind::Touch);
        t.pointer_move(Point::new(60.0, 40.0));
        assert!(capture.is_captured(CaptureOwner::Selection));

        t.pointer_leave();
        assert!(!t.is_drawing());
        assert!(log.borrow().last().copied().flatten().is_some());
        assert_eq!(capture.active_count(), 0);
    }

    #[test]
    fn drag_past_image_edges_is_clamped() {
        let (mut t, log, _) = tool(half_scale());
        t.pointer_down(Point::new(450.0, 350.0), PointerKind::Mouse);
        t.pointer_move(Point::new(900.0, -80.0));
        let overlay = t.overlay().unwrap();
        assert!((overlay.x - 450.0).abs() < 1e-9);
        assert!(overlay.y.abs() < 1e-9);
        assert!((overlay.right() - 500.0).abs() < 1e-9);
        assert!((overlay.bottom() - 350.0).abs() < 1e-9);

        t.pointer_up();
        let emitted = log.borrow().last().copied().flatten().unwrap();
        assert!(emitted.x >= 0.0 && emitted.y >= 0.0);
        assert!(emitted.right() <= 1000.0 + 1e-9);
        assert!(emitted.bottom() <= 800.0 + 1e-9);
    }

    #[test]
    fn up_and_leave_outside_drag_are_ignored() {
        let (mut t, log, _) = tool(half_scale());
        t.pointer_up();
        t.pointer_leave();
        t.pointer_move(Point::new(10.0, 10.0));
        assert!(log.borrow().is_empty());
        assert!(t.overlay().is_none());
    }

    #[test]
    fn reset_releases_capture_silently() {
        let (mut t, log, capture) = tool(half_scale());
        t.pointer_down(Point::new(5.0, 5.0), PointerKind::Mouse);
        t.reset();
        assert_eq!(capture.active_count(), 0);
        assert_eq!(t.state(), SelectionState::Idle);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn geometry_change_applies_to_next_finalize() {
        let (mut t, log, _) = tool(half_scale());
        t.set_geometry(ImageGeometry::new(300.0, 300.0, 100.0, 100.0).unwrap());
        t.pointer_down(Point::new(10.0, 10.0), PointerKind::Mouse);
        t.pointer_move(Point::new(20.0, 30.0));
        t.pointer_up();

        let emitted = log.borrow().last().copied().flatten().unwrap();
        assert!((emitted.x - 30.0).abs() < 1e-9);
        assert!((emitted.height - 60.0).abs() < 1e-9);
    }
}
