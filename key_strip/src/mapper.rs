//! Horizontal position → key index.
//!
//! A position outside the strip is not an error; it simply maps to no key.

use crate::geometry::KeyboardGeometry;

/// Zero-based key position, `0..key_count`.
pub type KeyIndex = usize;

/// Map a canvas-local pixel x to the key under it.
///
/// Returns `floor(x / key_width)` for `0 <= x < surface_width`, `None`
/// otherwise.  Non-finite input and a zero-width strip also give `None`.
pub fn map_to_key(x_pixel: f32, geometry: &KeyboardGeometry) -> Option<KeyIndex> {
    if !x_pixel.is_finite() || geometry.key_width <= 0.0 {
        return None;
    }
    if x_pixel < 0.0 || x_pixel >= geometry.surface_width as f32 {
        return None;
    }
    let index = (x_pixel / geometry.key_width).floor() as usize;
    // x just below the right edge can round up to key_count
    Some(index.min(geometry.key_count.saturating_sub(1)))
}

/// Map a normalized x in `[0, 1)` by scaling it to the surface width first.
pub fn map_normalized(x_norm: f32, geometry: &KeyboardGeometry) -> Option<KeyIndex> {
    map_to_key(x_norm * geometry.surface_width as f32, geometry)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
