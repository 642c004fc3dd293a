//! # key_strip
//!
//! A horizontal strip of piano keys that lights up the key under a fingertip.
//!
//! The crate is host-agnostic: it renders into any [`surface::Surface`] and is
//! fed explicit [`controller::StripEvent`]s with the current time, so the same
//! logic runs under a window, a test, or a headless replay.
//!
//! ## Pipeline
//!
//! | Stage | Module | Role |
//! |---|---|---|
//! | Resize | [`geometry`] | viewport → strip size and key width |
//! | Locate | [`input`] | pointer / hand frame → canvas-local x |
//! | Map | [`mapper`] | x → key index (or no key) |
//! | Draw | [`render`] | strip with optional highlighted key |
//! | Revert | [`highlight`] | scheduled return to the unlit strip |
//!
//! ## Quick start
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use key_strip::controller::{KeyboardController, StripEvent, ControllerOptions};
//! use key_strip::input::PointerEvent;
//! use key_strip::surface::Framebuffer;
//!
//! let mut ctl = KeyboardController::new(Framebuffer::new(0, 0), ControllerOptions::default());
//! let t0 = Instant::now();
//! ctl.handle(StripEvent::Resize { width: 700, height: 500 }, t0);
//!
//! // The strip occupies the bottom 40 % of the viewport: rows 300..500.
//! let hit = ctl.handle(StripEvent::Pointer(PointerEvent::at(125.0, 400.0)), t0);
//! assert_eq!(hit, Some(2));
//! assert_eq!(ctl.highlight(), Some(2));
//!
//! ctl.tick(t0 + Duration::from_millis(150));
//! assert_eq!(ctl.highlight(), None);
//! ```

pub mod geometry;
pub mod mapper;
pub mod surface;
pub mod render;
pub mod highlight;
pub mod input;
pub mod controller;

pub use geometry::{KeyboardGeometry, Viewport, Orientation, CanvasRect, KEY_COUNT};
pub use mapper::{KeyIndex, map_to_key, map_normalized};
