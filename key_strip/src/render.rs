//! Keyboard strip renderer.
//!
//! Each call redraws the whole strip from nothing, so output depends only on
//! the geometry and the highlighted key: drawing the same state twice gives
//! the same pixels.

use crate::geometry::KeyboardGeometry;
use crate::mapper::KeyIndex;
use crate::surface::{Framebuffer, Surface, label_width};

// ════════════════════════════════════════════════════════════════════════════
// Palette
// ════════════════════════════════════════════════════════════════════════════

/// Colors used for the strip and the rotate overlay (ARGB).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub key:          u32,
    pub highlight:    u32,
    pub outline:      u32,
    pub overlay_bg:   u32,
    pub overlay_text: u32,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            key:          0xFFFFFFFF,
            highlight:    0xFF44AA88,
            outline:      0xFF000000,
            overlay_bg:   0xFF111111,
            overlay_text: 0xFFEEEEEE,
        }
    }
}

/// Key outline thickness in pixels.
pub const OUTLINE_WIDTH: f32 = 2.0;

// ════════════════════════════════════════════════════════════════════════════
// Strip
// ════════════════════════════════════════════════════════════════════════════

/// Clear `surface` and draw every key, filling `highlight` (if any) with the
/// highlight color.
///
/// Keys are one pixel narrower than their slot so neighbours stay visually
/// separate.
pub fn draw_keyboard<S: Surface>(
    surface:   &mut S,
    geometry:  &KeyboardGeometry,
    highlight: Option<KeyIndex>,
    palette:   &Palette,
) {
    surface.clear();

    let h = geometry.surface_height as f32;
    let w = geometry.key_width - 1.0;

    for i in 0..geometry.key_count {
        let x = geometry.key_left(i);
        let fill = if highlight == Some(i) { palette.highlight } else { palette.key };
        surface.fill_rect(x, 0.0, w, h, fill);
        surface.stroke_rect(x, 0.0, w, h, OUTLINE_WIDTH, palette.outline);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Rotate overlay
// ════════════════════════════════════════════════════════════════════════════

const ROTATE_MESSAGE: &str = "ROTATE TO LANDSCAPE";

/// Full-surface prompt shown while the viewport is portrait.
pub fn draw_rotate_overlay(fb: &mut Framebuffer, palette: &Palette) {
    fb.fill(palette.overlay_bg);

    // Largest scale that still fits, at most 4
    let scale = (1..=4)
        .rev()
        .find(|&s| label_width(ROTATE_MESSAGE, s) + 8 <= fb.width())
        .unwrap_or(1);
    let tw = label_width(ROTATE_MESSAGE, scale);
    let x = fb.width().saturating_sub(tw) / 2;
    let y = fb.height().saturating_sub(5 * scale) / 2;
    fb.draw_label(ROTATE_MESSAGE, x, y, scale, palette.overlay_text);
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn strip() -> (Framebuffer, KeyboardGeometry) {
        let g = KeyboardGeometry::new(700, 200);
        (Framebuffer::new(700, 200), g)
    }

    fn render(h: Option<KeyIndex>) -> Framebuffer {
        let (mut fb, g) = strip();
        draw_keyboard(&mut fb, &g, h, &Palette::default());
        fb
    }

    #[test]
    fn highlighted_key_uses_highlight_fill() {
        let fb = render(Some(2));
        let p = Palette::default();
        assert_eq!(fb.pixel(125, 100), Some(p.highlight));
        assert_eq!(fb.pixel(175, 100), Some(p.key));
        assert_eq!(fb.pixel(75, 100), Some(p.key));
    }

    #[test]
    fn no_highlight_is_all_white_keys() {
        let fb = render(None);
        let p = Palette::default();
        for i in 0..14 {
            assert_eq!(fb.pixel(i * 50 + 25, 100), Some(p.key), "key {}", i);
        }
    }

    #[test]
    fn key_edges_are_outlined() {
        let fb = render(None);
        assert_eq!(fb.pixel(100, 100), Some(Palette::default().outline));
        assert_eq!(fb.pixel(125, 0), Some(Palette::default().outline));
    }

    #[test]
    fn three_states_are_distinct() {
        let a = render(None);
        let b = render(Some(5));
        let c = render(Some(6));
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn redraw_is_idempotent() {
        let (mut fb, g) = strip();
        let p = Palette::default();
        draw_keyboard(&mut fb, &g, Some(3), &p);
        let first = fb.clone();
        draw_keyboard(&mut fb, &g, Some(3), &p);
        assert_eq!(first, fb);
    }

    #[test]
    fn redraw_clears_previous_highlight() {
        let (mut fb, g) = strip();
        let p = Palette::default();
        draw_keyboard(&mut fb, &g, Some(3), &p);
        draw_keyboard(&mut fb, &g, None, &p);
        assert_eq!(fb, render(None));
    }

    #[test]
    fn out_of_range_highlight_draws_plain_strip() {
        assert_eq!(render(Some(99)), render(None));
    }

    #[test]
    fn empty_surface_does_not_panic() {
        let mut fb = Framebuffer::new(0, 0);
        draw_keyboard(&mut fb, &KeyboardGeometry::new(0, 0), Some(0), &Palette::default());
        assert!(fb.pixels().is_empty());
    }

    #[test]
    fn overlay_covers_surface_and_writes_text() {
        let mut fb = Framebuffer::new(300, 500);
        let p = Palette::default();
        draw_rotate_overlay(&mut fb, &p);
        assert_eq!(fb.pixel(0, 0), Some(p.overlay_bg));
        assert!(fb.pixels().iter().any(|&px| px == p.overlay_text));
    }
}
