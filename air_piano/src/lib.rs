//! # air_piano
//!
//! A fourteen-key strip docked along the bottom of a window.  Click a key,
//! or hover a (tracked or simulated) index finger over one, and it lights up
//! and sounds over MIDI for a moment.
//!
//! ## Input → Action mapping
//!
//! | Input | Action |
//! |---|---|
//! | Left click on the strip | Light the key under the pointer for 150 ms |
//! | Index fingertip over the window | Light the key in the fingertip's column for 100 ms |
//! | `H` | Toggle mouse-hover tracking (simulation source) |
//! | `Q` / `Esc` | Quit |
//!
//! A lit key plays its note from the configured scale; the note is released
//! when the highlight reverts or moves to another key.
//!
//! ## Tracking sources
//!
//! | `--tracking` | Source |
//! |---|---|
//! | `sim` (default) | Mouse hover, mirrored like a front-facing camera |
//! | `leap` | LeapMotion controller (`--features leap`) |
//! | `off` | Pointer only |
//!
//! When the chosen source cannot start the strip keeps working with pointer
//! input and the status line says so.

pub mod app;
pub mod config;
pub mod error;
pub mod tracking;
pub mod voice;
pub mod window;

pub use app::{run, AppState};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
