//! Input adapters — turning raw pointer and hand-tracking samples into a
//! canvas-local x coordinate.
//!
//! Both adapters implement [`InputAdapter`], so the controller treats a
//! mouse click and a tracked fingertip the same way: locate → map → draw →
//! schedule revert.  Only the locating step and the revert delay differ.
//!
//! Hand frames use camera-image coordinates: `x` grows to the right of the
//! image as the camera sees it.  A front camera shows the user mirrored, so
//! the tracking adapter flips `x` before use.

use std::time::Duration;

use crate::geometry::{CanvasRect, KeyboardGeometry};

/// Landmark index of the index-finger tip.
pub const INDEX_FINGERTIP: usize = 8;

/// Landmarks per hand in the 21-point hand model.
pub const HAND_LANDMARKS: usize = 21;

pub const POINTER_REVERT: Duration  = Duration::from_millis(150);
pub const TRACKING_REVERT: Duration = Duration::from_millis(100);

// ════════════════════════════════════════════════════════════════════════════
// Samples
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource { Pointer, Tracking }

/// A press from a mouse, pen or touch screen, in viewport pixels.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointerEvent {
    pub client_x: f32,
    pub client_y: f32,
    /// Active touch points; the first one wins when present.
    pub touches:  Vec<(f32, f32)>,
}

impl PointerEvent {
    pub fn at(x: f32, y: f32) -> Self {
        PointerEvent { client_x: x, client_y: y, touches: Vec::new() }
    }

    pub fn touch(points: Vec<(f32, f32)>) -> Self {
        let (client_x, client_y) = points.first().copied().unwrap_or_default();
        PointerEvent { client_x, client_y, touches: points }
    }

    /// Viewport position this event refers to.
    pub fn position(&self) -> (f32, f32) {
        self.touches.first().copied().unwrap_or((self.client_x, self.client_y))
    }
}

/// One hand-model point, normalized to `[0, 1]` in camera-image space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self { Landmark { x, y } }
}

/// Result of one processed video frame: zero or more detected hands.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HandFrame {
    pub hands: Vec<Vec<Landmark>>,
}

impl HandFrame {
    /// A frame in which no hand was found.
    pub fn empty() -> Self { HandFrame { hands: Vec::new() } }

    pub fn single(hand: Vec<Landmark>) -> Self { HandFrame { hands: vec![hand] } }

    /// Landmark `index` of the first hand, if both exist.
    pub fn first_hand_landmark(&self, index: usize) -> Option<Landmark> {
        self.hands.first()?.get(index).copied()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// InputAdapter
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can place a sample on the strip.
pub trait InputAdapter {
    type Sample;

    fn source(&self) -> InputSource;

    /// How long a highlight caused by this adapter stays lit.
    fn revert_after(&self) -> Duration;

    /// Canvas-local pixel x of `sample`, or `None` if the sample carries no
    /// usable position.  An x outside the strip is still returned; deciding
    /// that it hits no key is the mapper's job.
    fn locate(&self, sample: &Self::Sample, geometry: &KeyboardGeometry) -> Option<f32>;
}

// ── pointer ───────────────────────────────────────────────────────────────

/// Pointer presses on the strip's canvas.
#[derive(Debug, Clone)]
pub struct PointerAdapter {
    canvas:       CanvasRect,
    revert_after: Duration,
}

impl PointerAdapter {
    pub fn new(revert_after: Duration) -> Self {
        PointerAdapter { canvas: CanvasRect::default(), revert_after }
    }

    /// Update the canvas placement after a resize.
    pub fn set_canvas(&mut self, canvas: CanvasRect) { self.canvas = canvas; }

    pub fn canvas(&self) -> CanvasRect { self.canvas }
}

impl Default for PointerAdapter {
    fn default() -> Self { PointerAdapter::new(POINTER_REVERT) }
}

impl InputAdapter for PointerAdapter {
    type Sample = PointerEvent;

    fn source(&self) -> InputSource { InputSource::Pointer }

    fn revert_after(&self) -> Duration { self.revert_after }

    fn locate(&self, sample: &PointerEvent, _geometry: &KeyboardGeometry) -> Option<f32> {
        let (x, y) = sample.position();
        // Presses above or below the canvas never reach it
        if !self.canvas.contains_y(y) {
            return None;
        }
        Some(x - self.canvas.left as f32)
    }
}

// ── hand tracking ─────────────────────────────────────────────────────────

/// Index-fingertip position from hand-tracking frames.
#[derive(Debug, Clone)]
pub struct HandTrackingAdapter {
    mirror:       bool,
    landmark:     usize,
    revert_after: Duration,
}

impl HandTrackingAdapter {
    pub fn new(mirror: bool, revert_after: Duration) -> Self {
        HandTrackingAdapter { mirror, landmark: INDEX_FINGERTIP, revert_after }
    }

    pub fn mirrored(&self) -> bool { self.mirror }

    /// Fingertip in normalized screen space (mirrored if configured), or
    /// `None` when the frame has no hand or the hand is too short.
    pub fn screen_position(&self, frame: &HandFrame) -> Option<(f32, f32)> {
        let tip = frame.first_hand_landmark(self.landmark)?;
        if !tip.x.is_finite() || !tip.y.is_finite() {
            return None;
        }
        let x = if self.mirror { 1.0 - tip.x } else { tip.x };
        Some((x, tip.y))
    }
}

impl Default for HandTrackingAdapter {
    fn default() -> Self { HandTrackingAdapter::new(true, TRACKING_REVERT) }
}

impl InputAdapter for HandTrackingAdapter {
    type Sample = HandFrame;

    fn source(&self) -> InputSource { InputSource::Tracking }

    fn revert_after(&self) -> Duration { self.revert_after }

    fn locate(&self, frame: &HandFrame, geometry: &KeyboardGeometry) -> Option<f32> {
        let (x, _) = self.screen_position(frame)?;
        Some(x * geometry.surface_width as f32)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_with_tip(x: f32, y: f32) -> Vec<Landmark> {
        let mut hand = vec![Landmark::new(0.5, 0.5); HAND_LANDMARKS];
        hand[INDEX_FINGERTIP] = Landmark::new(x, y);
        hand
    }

    fn geometry() -> KeyboardGeometry { KeyboardGeometry::new(700, 200) }

    #[test]
    fn touch_uses_first_point() {
        let e = PointerEvent {
            client_x: 1.0,
            client_y: 1.0,
            touches: vec![(30.0, 40.0), (90.0, 90.0)],
        };
        assert_eq!(e.position(), (30.0, 40.0));
        assert_eq!(PointerEvent::at(5.0, 6.0).position(), (5.0, 6.0));
    }

    #[test]
    fn pointer_is_canvas_local() {
        let mut a = PointerAdapter::default();
        a.set_canvas(CanvasRect { left: 20, top: 300, width: 700, height: 200 });
        let x = a.locate(&PointerEvent::at(145.0, 350.0), &geometry());
        assert_eq!(x, Some(125.0));
    }

    #[test]
    fn pointer_above_canvas_is_ignored() {
        let mut a = PointerAdapter::default();
        a.set_canvas(CanvasRect { left: 0, top: 300, width: 700, height: 200 });
        assert_eq!(a.locate(&PointerEvent::at(100.0, 10.0), &geometry()), None);
    }

    #[test]
    fn tracking_mirrors_fingertip() {
        let a = HandTrackingAdapter::default();
        let frame = HandFrame::single(hand_with_tip(0.2, 0.6));
        let x = a.locate(&frame, &geometry()).unwrap();
        // 1 - 0.2 = 0.8 → 0.8 * 700
        assert!((x - 560.0).abs() < 1e-3);
    }

    #[test]
    fn tracking_without_mirror_passes_through() {
        let a = HandTrackingAdapter::new(false, TRACKING_REVERT);
        let frame = HandFrame::single(hand_with_tip(0.2, 0.6));
        let x = a.locate(&frame, &geometry()).unwrap();
        assert!((x - 140.0).abs() < 1e-3);
    }

    #[test]
    fn no_hand_means_no_position() {
        let a = HandTrackingAdapter::default();
        assert_eq!(a.locate(&HandFrame::empty(), &geometry()), None);
    }

    #[test]
    fn short_hand_means_no_position() {
        let a = HandTrackingAdapter::default();
        let frame = HandFrame::single(vec![Landmark::new(0.1, 0.1); 8]);
        assert_eq!(a.locate(&frame, &geometry()), None);
    }

    #[test]
    fn only_first_hand_counts() {
        let a = HandTrackingAdapter::default();
        let frame = HandFrame {
            hands: vec![hand_with_tip(0.9, 0.5), hand_with_tip(0.1, 0.5)],
        };
        let (x, _) = a.screen_position(&frame).unwrap();
        assert!((x - 0.1).abs() < 1e-6);
    }

    #[test]
    fn adapters_report_their_delays() {
        assert_eq!(PointerAdapter::default().revert_after(), Duration::from_millis(150));
        assert_eq!(HandTrackingAdapter::default().revert_after(), Duration::from_millis(100));
        assert_eq!(PointerAdapter::default().source(), InputSource::Pointer);
        assert_eq!(HandTrackingAdapter::default().source(), InputSource::Tracking);
    }
}
