//! Strip geometry — how wide each key is for the current viewport.
//!
//! The strip always spans the full viewport width and a fixed fraction of
//! its height.  Geometry is recomputed from scratch on every resize; there
//! is no incremental state.

// ════════════════════════════════════════════════════════════════════════════
// Constants
// ════════════════════════════════════════════════════════════════════════════

/// Number of keys on the strip.
pub const KEY_COUNT: usize = 14;

/// Fraction of the viewport height given to the strip.
pub const DEFAULT_HEIGHT_RATIO: f32 = 0.4;

// ════════════════════════════════════════════════════════════════════════════
// KeyboardGeometry
// ════════════════════════════════════════════════════════════════════════════

/// Pixel dimensions of the strip and its keys.
///
/// Invariant: `key_width == surface_width as f32 / key_count as f32`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyboardGeometry {
    pub surface_width:  usize,
    pub surface_height: usize,
    pub key_count:      usize,
    pub key_width:      f32,
}

impl KeyboardGeometry {
    /// Geometry for a surface of exactly `width` × `height` pixels.
    pub fn new(width: usize, height: usize) -> Self {
        KeyboardGeometry {
            surface_width:  width,
            surface_height: height,
            key_count:      KEY_COUNT,
            key_width:      width as f32 / KEY_COUNT as f32,
        }
    }

    /// Recompute geometry for a viewport, pinning the strip height to 40 %.
    pub fn resize(viewport_width: usize, viewport_height: usize) -> Self {
        Self::resize_with_ratio(viewport_width, viewport_height, DEFAULT_HEIGHT_RATIO)
    }

    /// Like [`resize`](Self::resize) with a custom height fraction.
    pub fn resize_with_ratio(viewport_width: usize, viewport_height: usize, ratio: f32) -> Self {
        let height = (viewport_height as f32 * ratio).round().max(0.0) as usize;
        Self::new(viewport_width, height)
    }

    /// Left edge of key `i` in surface pixels.
    pub fn key_left(&self, i: usize) -> f32 {
        i as f32 * self.key_width
    }
}

impl Default for KeyboardGeometry {
    fn default() -> Self { KeyboardGeometry::new(0, 0) }
}

// ════════════════════════════════════════════════════════════════════════════
// Viewport / orientation
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation { Landscape, Portrait }

/// Size of the host window or screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width:  usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self { Viewport { width, height } }

    /// Landscape only when strictly wider than tall.
    pub fn orientation(&self) -> Orientation {
        if self.width > self.height { Orientation::Landscape } else { Orientation::Portrait }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CanvasRect — where the strip sits inside the viewport
// ════════════════════════════════════════════════════════════════════════════

/// Placement of the strip in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CanvasRect {
    pub left:   usize,
    pub top:    usize,
    pub width:  usize,
    pub height: usize,
}

impl CanvasRect {
    /// The strip docked to the bottom edge of `viewport`.
    pub fn docked_bottom(viewport: Viewport, geometry: &KeyboardGeometry) -> Self {
        let height = geometry.surface_height.min(viewport.height);
        CanvasRect {
            left:   0,
            top:    viewport.height - height,
            width:  geometry.surface_width,
            height,
        }
    }

    /// True if viewport row `y` falls on the strip.
    pub fn contains_y(&self, y: f32) -> bool {
        y >= self.top as f32 && y < (self.top + self.height) as f32
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_700_gives_key_width_50() {
        let g = KeyboardGeometry::resize(700, 500);
        assert_eq!(g.key_width, 50.0);
        assert_eq!(g.key_count, 14);
    }

    #[test]
    fn height_pinned_to_forty_percent() {
        let g = KeyboardGeometry::resize(1280, 720);
        assert_eq!(g.surface_height, 288);
        // 0.4 * 333 = 133.2 → rounds down
        assert_eq!(KeyboardGeometry::resize(800, 333).surface_height, 133);
    }

    #[test]
    fn resize_recomputes_from_scratch() {
        let a = KeyboardGeometry::resize(700, 500);
        let b = KeyboardGeometry::resize(1400, 500);
        assert_eq!(a.key_width * 2.0, b.key_width);
    }

    #[test]
    fn zero_width_has_zero_key_width() {
        assert_eq!(KeyboardGeometry::resize(0, 100).key_width, 0.0);
    }

    #[test]
    fn orientation_requires_strictly_wider() {
        assert_eq!(Viewport::new(800, 600).orientation(), Orientation::Landscape);
        assert_eq!(Viewport::new(600, 600).orientation(), Orientation::Portrait);
        assert_eq!(Viewport::new(400, 900).orientation(), Orientation::Portrait);
    }

    #[test]
    fn canvas_docks_to_bottom() {
        let vp = Viewport::new(700, 500);
        let g = KeyboardGeometry::resize(vp.width, vp.height);
        let rect = CanvasRect::docked_bottom(vp, &g);
        assert_eq!(rect.top, 300);
        assert_eq!(rect.height, 200);
        assert!(rect.contains_y(300.0));
        assert!(rect.contains_y(499.5));
        assert!(!rect.contains_y(299.9));
        assert!(!rect.contains_y(500.0));
    }
}
