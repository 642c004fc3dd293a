//! `KeyboardController` — owns all strip state and reacts to events.
//!
//! The controller is the single owner of the geometry, the canvas surface,
//! the current highlight and the pending reverts.  Hosts feed it
//! [`StripEvent`]s and call [`KeyboardController::tick`] once per frame,
//! always passing the current time so behaviour is reproducible.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::geometry::{CanvasRect, KeyboardGeometry, Orientation, Viewport, DEFAULT_HEIGHT_RATIO};
use crate::highlight::{RevertPolicy, RevertSchedule};
use crate::input::{
    HandFrame, HandTrackingAdapter, InputAdapter, InputSource, PointerAdapter, PointerEvent,
    POINTER_REVERT, TRACKING_REVERT,
};
use crate::mapper::{map_to_key, KeyIndex};
use crate::render::{draw_keyboard, Palette};
use crate::surface::Surface;

// ════════════════════════════════════════════════════════════════════════════
// Events / options
// ════════════════════════════════════════════════════════════════════════════

/// Everything that can happen to the strip.
#[derive(Debug, Clone, PartialEq)]
pub enum StripEvent {
    /// The viewport changed size or orientation.
    Resize { width: usize, height: usize },
    /// A pointer or touch press.
    Pointer(PointerEvent),
    /// One processed tracking frame.
    Tracking(HandFrame),
}

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub height_ratio:    f32,
    pub pointer_revert:  Duration,
    pub tracking_revert: Duration,
    pub revert_policy:   RevertPolicy,
    pub mirror_tracking: bool,
    pub palette:         Palette,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        ControllerOptions {
            height_ratio:    DEFAULT_HEIGHT_RATIO,
            pointer_revert:  POINTER_REVERT,
            tracking_revert: TRACKING_REVERT,
            revert_policy:   RevertPolicy::Independent,
            mirror_tracking: true,
            palette:         Palette::default(),
        }
    }
}

/// A located sample that landed on a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Strike {
    key:    KeyIndex,
    delay:  Duration,
    source: InputSource,
}

fn strike_with<A: InputAdapter>(
    adapter:  &A,
    sample:   &A::Sample,
    geometry: &KeyboardGeometry,
) -> Option<Strike> {
    let x = adapter.locate(sample, geometry)?;
    let key = map_to_key(x, geometry)?;
    Some(Strike { key, delay: adapter.revert_after(), source: adapter.source() })
}

// ════════════════════════════════════════════════════════════════════════════
// KeyboardController
// ════════════════════════════════════════════════════════════════════════════

pub struct KeyboardController<S: Surface> {
    geometry:     KeyboardGeometry,
    viewport:     Viewport,
    canvas:       S,
    palette:      Palette,
    height_ratio: f32,

    highlight:    Option<KeyIndex>,
    reverts:      RevertSchedule,

    pointer:      PointerAdapter,
    tracking:     HandTrackingAdapter,
    /// Last tracked fingertip in normalized screen space.
    fingertip:    Option<(f32, f32)>,
}

impl<S: Surface> KeyboardController<S> {
    pub fn new(canvas: S, options: ControllerOptions) -> Self {
        let geometry = KeyboardGeometry::new(canvas.width(), canvas.height());
        KeyboardController {
            geometry,
            viewport:     Viewport::default(),
            canvas,
            palette:      options.palette,
            height_ratio: options.height_ratio,
            highlight:    None,
            reverts:      RevertSchedule::new(options.revert_policy),
            pointer:      PointerAdapter::new(options.pointer_revert),
            tracking:     HandTrackingAdapter::new(options.mirror_tracking, options.tracking_revert),
            fingertip:    None,
        }
    }

    // ── events ────────────────────────────────────────────────────────────

    /// Process one event.  Returns the key that was struck, if any.
    pub fn handle(&mut self, event: StripEvent, now: Instant) -> Option<KeyIndex> {
        match event {
            StripEvent::Resize { width, height } => {
                self.resize(width, height);
                None
            }
            StripEvent::Pointer(e) => {
                let strike = strike_with(&self.pointer, &e, &self.geometry)?;
                debug!(key = strike.key, "pointer on key");
                Some(self.light(strike, now))
            }
            StripEvent::Tracking(frame) => {
                self.fingertip = self.tracking.screen_position(&frame);
                let strike = strike_with(&self.tracking, &frame, &self.geometry)?;
                debug!(key = strike.key, "finger over key");
                Some(self.light(strike, now))
            }
        }
    }

    /// Recompute geometry for a new viewport and redraw with no highlight.
    pub fn resize(&mut self, width: usize, height: usize) -> KeyboardGeometry {
        self.viewport = Viewport::new(width, height);
        self.geometry = KeyboardGeometry::resize_with_ratio(width, height, self.height_ratio);
        self.canvas.resize(self.geometry.surface_width, self.geometry.surface_height);
        self.pointer.set_canvas(CanvasRect::docked_bottom(self.viewport, &self.geometry));
        self.highlight = None;
        self.redraw();
        info!(
            width, height,
            key_width = self.geometry.key_width,
            orientation = ?self.viewport.orientation(),
            "strip resized"
        );
        self.geometry
    }

    /// Fire due reverts.  Returns true if the strip went back to unlit.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.reverts.fire_due(now) == 0 {
            return false;
        }
        self.highlight = None;
        self.redraw();
        true
    }

    fn light(&mut self, strike: Strike, now: Instant) -> KeyIndex {
        self.highlight = Some(strike.key);
        self.redraw();
        self.reverts.schedule(now, strike.delay);
        strike.key
    }

    /// Draw the strip for the current highlight.
    pub fn redraw(&mut self) {
        draw_keyboard(&mut self.canvas, &self.geometry, self.highlight, &self.palette);
    }

    // ── accessors ─────────────────────────────────────────────────────────

    pub fn geometry(&self)     -> &KeyboardGeometry { &self.geometry }
    pub fn viewport(&self)     -> Viewport          { self.viewport }
    pub fn orientation(&self)  -> Orientation       { self.viewport.orientation() }
    pub fn canvas_rect(&self)  -> CanvasRect        { self.pointer.canvas() }
    pub fn surface(&self)      -> &S                { &self.canvas }
    pub fn palette(&self)      -> &Palette          { &self.palette }
    pub fn highlight(&self)    -> Option<KeyIndex>  { self.highlight }
    pub fn fingertip(&self)    -> Option<(f32, f32)> { self.fingertip }
    pub fn pending_reverts(&self) -> usize          { self.reverts.pending() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
