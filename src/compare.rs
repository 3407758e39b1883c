//! Before/after comparison slider.
//!
//! The slider never touches pixel data. Its whole output is a reveal
//! boundary: the "after" image is shown from the left edge up to
//! `position`% of the container width, the "before" image everywhere else.

use crate::capture::{CaptureGuard, CaptureOwner, PointerCapture, PointerKind};

/// Default boundary, halfway across.
pub const DEFAULT_POSITION: f64 = 50.0;

/// A reveal percentage, always within `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SliderPosition(f64);

impl SliderPosition {
    /// Clamp `percent` into `[0, 100]`. `NaN` becomes 0.
    #[must_use]
    pub fn new(percent: f64) -> Self {
        if percent.is_nan() {
            return Self(0.0);
        }
        Self(percent.clamp(0.0, 100.0))
    }

    /// The percentage value.
    #[must_use]
    pub fn percent(self) -> f64 {
        self.0
    }
}

impl Default for SliderPosition {
    fn default() -> Self {
        Self(DEFAULT_POSITION)
    }
}

/// Horizontal placement of the slider container in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerBounds {
    /// Page x of the container's left edge.
    pub left: f64,
    /// Container width in pixels.
    pub width: f64,
}

impl ContainerBounds {
    /// Create bounds from the container's left edge and width.
    #[must_use]
    pub const fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Percentage of the width covered by `client_x`, clamped to the container.
    ///
    /// Returns `None` for a container with no usable width.
    #[must_use]
    pub fn percent_at(&self, client_x: f64) -> Option<SliderPosition> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return None;
        }
        let fraction = ((client_x - self.left) / self.width).clamp(0.0, 1.0);
        Some(SliderPosition::new(fraction * 100.0))
    }
}

/// Visible horizontal span of the "after" image, in container pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AfterClip {
    /// Left edge, always 0.
    pub left: f64,
    /// Right edge of the revealed region.
    pub right: f64,
}

/// Comparison slider state.
#[derive(Debug)]
pub struct CompareSlider {
    position: SliderPosition,
    capture: PointerCapture,
    drag: Option<(ContainerBounds, CaptureGuard)>,
}

impl CompareSlider {
    /// Create a slider at the default position.
    #[must_use]
    pub fn new(capture: PointerCapture) -> Self {
        Self {
            position: SliderPosition::default(),
            capture,
            drag: None,
        }
    }

    /// Current boundary.
    #[must_use]
    pub fn position(&self) -> SliderPosition {
        self.position
    }

    /// Move the boundary to `percent`, clamped into `[0, 100]`.
    pub fn set_position(&mut self, percent: f64) {
        self.position = SliderPosition::new(percent);
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Begin dragging from `client_x`; registers global move/up listeners.
    pub fn drag_start(&mut self, client_x: f64, bounds: ContainerBounds, kind: PointerKind) {
        let guard = self.capture.acquire(CaptureOwner::Slider, kind);
        self.drag = Some((bounds, guard));
        self.track(client_x);
    }

    /// Follow the pointer. Ignored unless dragging.
    pub fn drag_move(&mut self, client_x: f64) {
        self.track(client_x);
    }

    /// Finish the drag and deregister the global listeners.
    pub fn drag_end(&mut self) {
        if self.drag.take().is_some() {
            log::debug!("slider: drag ended at {:.2}%", self.position.percent());
        }
    }

    fn track(&mut self, client_x: f64) {
        if let Some(pos) = self.drag.as_ref().and_then(|(b, _)| b.percent_at(client_x)) {
            self.position = pos;
        }
    }

    /// Percent of the container width left of which "after" is visible.
    #[must_use]
    pub fn reveal_boundary(&self) -> f64 {
        self.position.percent()
    }

    /// Right inset of the "after" layer's clip, as a percentage.
    #[must_use]
    pub fn clip_inset_right(&self) -> f64 {
        100.0 - self.position.percent()
    }

    /// Pixel span of the "after" image inside a container `container_width` wide.
    #[must_use]
    pub fn after_clip(&self, container_width: f64) -> AfterClip {
        AfterClip {
            left: 0.0,
            right: container_width * self.position.percent() / 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slider() -> (CompareSlider, PointerCapture) {
        let capture = PointerCapture::new();
        (CompareSlider::new(capture.clone()), capture)
    }

    #[test]
    fn starts_halfway() {
        let (s, _) = slider();
        assert!((s.reveal_boundary() - 50.0).abs() < 1e-9);
        assert!((s.clip_inset_right() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn set_position_clamps_out_of_range() {
        let (mut s, _) = slider();
        s.set_position(-10.0);
        assert!(s.reveal_boundary().abs() < 1e-9);
        s.set_position(150.0);
        assert!((s.reveal_boundary() - 100.0).abs() < 1e-9);
        s.set_position(f64::NAN);
        assert!(s.reveal_boundary().abs() < 1e-9);
        s.set_position(33.3);
        s.set_position(33.3);
        assert!((s.reveal_boundary() - 33.3).abs() < 1e-9);
    }

    #[test]
    fn drag_edges_map_to_zero_and_hundred() {
        let (mut s, _) = slider();
        let bounds = ContainerBounds::new(120.0, 400.0);
        s.drag_start(120.0, bounds, PointerKind::Mouse);
        assert!(s.reveal_boundary().abs() < 1e-9);
        s.drag_move(520.0);
        assert!((s.reveal_boundary() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn drag_across_container_reports_fraction() {
        let (mut s, capture) = slider();
        let bounds = ContainerBounds::new(0.0, 400.0);
        s.drag_start(50.0, bounds, PointerKind::Mouse);
        assert!((s.reveal_boundary() - 12.5).abs() < 1e-9);
        for x in (60..=350).step_by(10) {
            s.drag_move(f64::from(x));
        }
        s.drag_end();
        assert!((s.reveal_boundary() - 87.5).abs() < 1e-9);
        assert_eq!(capture.active_count(), 0);
    }

    #[test]
    fn moves_outside_container_clamp_while_dragging() {
        let (mut s, capture) = slider();
        s.drag_start(200.0, ContainerBounds::new(100.0, 200.0), PointerKind::Touch);
        assert!(capture.is_captured(CaptureOwner::Slider));
        s.drag_move(-500.0);
        assert!(s.reveal_boundary().abs() < 1e-9);
        s.drag_move(10_000.0);
        assert!((s.reveal_boundary() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn moves_without_drag_are_ignored() {
        let (mut s, _) = slider();
        s.drag_move(0.0);
        assert!((s.reveal_boundary() - 50.0).abs() < 1e-9);
        s.drag_end();
    }

    #[test]
    fn zero_width_container_keeps_position() {
        let (mut s, _) = slider();
        s.drag_start(10.0, ContainerBounds::new(0.0, 0.0), PointerKind::Mouse);
        assert!((s.reveal_boundary() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn dropping_slider_mid_drag_deregisters() {
        let (mut s, capture) = slider();
        s.drag_start(10.0, ContainerBounds::new(0.0, 100.0), PointerKind::Mouse);
        assert_eq!(capture.active_count(), 1);
        drop(s);
        assert_eq!(capture.active_count(), 0);
    }

    #[test]
    fn after_clip_tracks_boundary() {
        let (mut s, _) = slider();
        s.set_position(25.0);
        let clip = s.after_clip(400.0);
        assert!(clip.left.abs() < 1e-9);
        assert!((clip.right - 100.0).abs() < 1e-9);
    }
}
