//! Software-rendered window using `minifb`.
//!
//! Layout (landscape):
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  AIR PIANO                                               │
//! │                                                          │
//! │                 ◆  fingertip cursor                      │
//! │                 │                                        │
//! │  status line                                             │
//! ├──────────────────────────────────────────────────────────┤
//! │ C4 │ D4 │ E4 │ F4 │ G4 │ A4 │ B4 │ C5 │ …   key strip    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Portrait windows show only the rotate prompt.

use std::sync::mpsc::Sender;

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use key_strip::controller::KeyboardController;
use key_strip::render::draw_rotate_overlay;
use key_strip::surface::{label_width, Framebuffer, Surface};
use key_strip::Orientation;

use crate::config::WindowConfig;
use crate::error::AppResult;
use crate::tracking::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Colors
// ════════════════════════════════════════════════════════════════════════════

const BG_COLOR:     u32 = 0xFF1A1A2E;
const PREVIEW_BG:   u32 = 0xFF16213E;
const CURSOR_COLOR: u32 = 0xFFFFD700;  // gold
const TITLE_COLOR:  u32 = 0xFFAADDFF;
const STATUS_COLOR: u32 = 0xFFEEEEEE;
const LEGEND_COLOR: u32 = 0xFF888888;
const KEY_LABEL:    u32 = 0xFF555555;

const LEGEND: &str = "CLICK=press key  H=hover tracking  Q/ESC=quit";

// ════════════════════════════════════════════════════════════════════════════
// WindowInput
// ════════════════════════════════════════════════════════════════════════════

/// What happened in the window since the last poll.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowInput {
    Resized { width: usize, height: usize },
    /// Left button went down at this window position.
    PointerDown { x: f32, y: f32 },
    /// Hover tracking switched on or off.
    ToggleHover(bool),
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// StripWindow
// ════════════════════════════════════════════════════════════════════════════

pub struct StripWindow {
    window:     Window,
    buf:        Framebuffer,
    size:       (usize, usize),
    /// Present only when the simulation tracking source is running.
    sim_tx:     Option<Sender<SimInput>>,
    hover:      bool,
    mouse_down: bool,
}

impl StripWindow {
    pub fn new(cfg: &WindowConfig, sim_tx: Option<Sender<SimInput>>) -> AppResult<Self> {
        let mut window = Window::new(
            &cfg.title,
            cfg.width, cfg.height,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        )?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        let size = window.get_size();
        Ok(StripWindow {
            window,
            buf: Framebuffer::new(size.0, size.1),
            size,
            sim_tx,
            hover: false,
            mouse_down: false,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    pub fn size(&self) -> (usize, usize) { self.size }

    /// Poll keyboard and mouse, forward hover positions to the simulation
    /// source, and report everything else to the caller.
    pub fn poll_input(&mut self) -> Vec<WindowInput> {
        let mut inputs = Vec::new();
        if !self.window.is_open() {
            inputs.push(WindowInput::Quit);
            return inputs;
        }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if one_shot(Key::Q) || one_shot(Key::Escape) {
            inputs.push(WindowInput::Quit);
            return inputs;
        }

        let toggle_hover = one_shot(Key::H) && self.sim_tx.is_some();

        // ── resize ────────────────────────────────────────────────────────
        let size = self.window.get_size();
        if size != self.size {
            self.size = size;
            inputs.push(WindowInput::Resized { width: size.0, height: size.1 });
        }

        // ── pointer press (edge-triggered) ───────────────────────────────
        let down = self.window.get_mouse_down(MouseButton::Left);
        let pos  = self.window.get_mouse_pos(MouseMode::Discard);
        if down && !self.mouse_down {
            if let Some((x, y)) = pos {
                inputs.push(WindowInput::PointerDown { x, y });
            }
        }
        self.mouse_down = down;

        // ── hover tracking ────────────────────────────────────────────────
        if toggle_hover {
            self.hover = !self.hover;
            inputs.push(WindowInput::ToggleHover(self.hover));
        }
        if let Some(tx) = &self.sim_tx {
            let (w, h) = self.size;
            let sample = match pos {
                Some((x, y)) if self.hover && w > 0 && h > 0 =>
                    Some(SimInput::Hover { x: x / w as f32, y: y / h as f32 }),
                _ if toggle_hover => Some(SimInput::Lost),
                _ if self.hover   => Some(SimInput::Lost),
                _ => None,
            };
            if let Some(s) = sample {
                let _ = tx.send(s);
            }
        }

        inputs
    }

    /// Render one frame.
    pub fn present(
        &mut self,
        controller: &KeyboardController<Framebuffer>,
        status:     &str,
        key_labels: &[String],
    ) -> AppResult<()> {
        let (w, h) = self.size;
        if w == 0 || h == 0 {
            self.window.update();
            return Ok(());
        }
        if self.buf.width() != w || self.buf.height() != h {
            self.buf.resize(w, h);
        }
        paint_frame(&mut self.buf, controller, status, key_labels);
        self.window.update_with_buffer(self.buf.pixels(), w, h)?;
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// paint_frame — window composition, independent of minifb
// ════════════════════════════════════════════════════════════════════════════

/// Compose the whole window into `buf`.
pub fn paint_frame(
    buf:        &mut Framebuffer,
    controller: &KeyboardController<Framebuffer>,
    status:     &str,
    key_labels: &[String],
) {
    if controller.orientation() == Orientation::Portrait {
        draw_rotate_overlay(buf, controller.palette());
        return;
    }

    buf.fill(BG_COLOR);
    let w = buf.width();
    let h = buf.height();
    let canvas = controller.canvas_rect();

    // ── preview panel ─────────────────────────────────────────────────────
    buf.fill_rect(0.0, 0.0, w as f32, canvas.top as f32, PREVIEW_BG);
    buf.draw_label("AIR PIANO", 10, 10, 2, TITLE_COLOR);

    if let Some((fx, fy)) = controller.fingertip() {
        if (0.0..=1.0).contains(&fx) && (0.0..=1.0).contains(&fy) {
            let cx = (fx * w as f32) as usize;
            let cy = (fy * h as f32) as usize;
            // guide down to the strip
            if cy < canvas.top {
                buf.fill_rect(cx as f32, cy as f32, 1.0, (canvas.top - cy) as f32, CURSOR_COLOR);
            }
            buf.draw_diamond(cx, cy, 6, CURSOR_COLOR);
        }
    }

    // ── status + legend ───────────────────────────────────────────────────
    if canvas.top >= 30 {
        buf.draw_label(status, 10, canvas.top - 28, 1, STATUS_COLOR);
        buf.draw_label(LEGEND, 10, canvas.top - 14, 1, LEGEND_COLOR);
    }

    // ── strip ─────────────────────────────────────────────────────────────
    buf.blit(controller.surface(), canvas.left, canvas.top);

    let g = controller.geometry();
    let label_y = (canvas.top + canvas.height).saturating_sub(16);
    for (i, label) in key_labels.iter().enumerate().take(g.key_count) {
        let slot = g.key_width as usize;
        let lw = label_width(label, 1);
        if lw + 4 > slot { continue; }
        let x = canvas.left + g.key_left(i) as usize + (slot - lw) / 2;
        buf.draw_label(label, x, label_y, 1, KEY_LABEL);
    }

}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
