//! Application configuration.
//!
//! Loaded from an optional TOML file; every field has a default, so an
//! empty file (or no file) gives the stock setup.  Command-line flags are
//! applied on top by `main`.
//!
//! ```toml
//! [keyboard]
//! coalesce_reverts = true
//!
//! [midi]
//! scale = "pentatonic-major"
//! instrument = 11
//!
//! [tracking]
//! source = "leap"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use key_strip::controller::ControllerOptions;
use key_strip::highlight::RevertPolicy;
use strip_midi::{NoteMap, Scale};

use crate::error::{AppError, AppResult};

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub window:   WindowConfig,
    pub keyboard: KeyboardConfig,
    pub midi:     MidiConfig,
    pub tracking: TrackingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width:  usize,
    pub height: usize,
    pub title:  String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig { width: 1280, height: 720, title: "Air Piano".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Fraction of the window height given to the strip.
    pub strip_height_ratio: f32,
    pub pointer_revert_ms:  u64,
    pub tracking_revert_ms: u64,
    /// A new strike cancels pending reverts instead of stacking them.
    pub coalesce_reverts:   bool,
    /// Flip tracked x to match a mirrored camera image.
    pub mirror_tracking:    bool,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        KeyboardConfig {
            strip_height_ratio: 0.4,
            pointer_revert_ms:  150,
            tracking_revert_ms: 100,
            coalesce_reverts:   false,
            mirror_tracking:    true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleKind {
    #[default]
    Major,
    Minor,
    PentatonicMajor,
    PentatonicMinor,
    Dorian,
    Chromatic,
}

impl ScaleKind {
    pub fn scale(self) -> Scale {
        match self {
            ScaleKind::Major           => Scale::major(),
            ScaleKind::Minor           => Scale::minor(),
            ScaleKind::PentatonicMajor => Scale::pentatonic_major(),
            ScaleKind::PentatonicMinor => Scale::pentatonic_minor(),
            ScaleKind::Dorian          => Scale::dorian(),
            ScaleKind::Chromatic       => Scale::chromatic(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MidiConfig {
    pub enabled:    bool,
    /// MIDI note of the leftmost key.
    pub root:       u8,
    pub scale:      ScaleKind,
    /// General MIDI program number.
    pub instrument: u8,
    pub velocity:   u8,
    pub channel:    u8,
}

impl Default for MidiConfig {
    fn default() -> Self {
        MidiConfig {
            enabled:    true,
            root:       60,
            scale:      ScaleKind::Major,
            instrument: 0,
            velocity:   100,
            channel:    0,
        }
    }
}

impl MidiConfig {
    pub fn note_map(&self) -> NoteMap {
        NoteMap::new(self.root, self.scale.scale())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TrackingKind {
    /// Mouse-hover simulation (toggle with H in the window).
    #[default]
    Sim,
    /// LeapMotion hardware (requires the `leap` feature).
    Leap,
    /// No hand tracking; pointer input only.
    Off,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub source:     TrackingKind,
    /// Leap interaction box, left → right, in millimetres.
    pub x_range_mm: [f32; 2],
    /// Leap interaction box, bottom → top, in millimetres.
    pub y_range_mm: [f32; 2],
}

impl Default for TrackingConfig {
    fn default() -> Self {
        TrackingConfig {
            source:     TrackingKind::Sim,
            x_range_mm: [-150.0, 150.0],
            y_range_mm: [80.0, 400.0],
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Loading / validation
// ════════════════════════════════════════════════════════════════════════════

impl AppConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> AppResult<Self> {
        let cfg: AppConfig = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> AppResult<()> {
        let k = &self.keyboard;
        if !(k.strip_height_ratio > 0.0 && k.strip_height_ratio <= 1.0) {
            return Err(AppError::Config(format!(
                "keyboard.strip_height_ratio must be in (0, 1], got {}", k.strip_height_ratio
            )));
        }
        if k.pointer_revert_ms == 0 || k.tracking_revert_ms == 0 {
            return Err(AppError::Config("revert delays must be at least 1 ms".to_string()));
        }

        let m = &self.midi;
        for (name, v) in [("root", m.root), ("instrument", m.instrument), ("velocity", m.velocity)] {
            if v > 127 {
                return Err(AppError::Config(format!("midi.{} must be 0–127, got {}", name, v)));
            }
        }
        if m.channel > 15 {
            return Err(AppError::Config(format!("midi.channel must be 0–15, got {}", m.channel)));
        }

        let t = &self.tracking;
        if !(t.x_range_mm[1] > t.x_range_mm[0]) || !(t.y_range_mm[1] > t.y_range_mm[0]) {
            return Err(AppError::Config(
                "tracking interaction box ranges must be increasing".to_string(),
            ));
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(AppError::Config("window size must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Strip options derived from the `keyboard` section.
    pub fn controller_options(&self) -> ControllerOptions {
        let k = &self.keyboard;
        ControllerOptions {
            height_ratio:    k.strip_height_ratio,
            pointer_revert:  Duration::from_millis(k.pointer_revert_ms),
            tracking_revert: Duration::from_millis(k.tracking_revert_ms),
            revert_policy:   if k.coalesce_reverts { RevertPolicy::Coalesced } else { RevertPolicy::Independent },
            mirror_tracking: k.mirror_tracking,
            ..ControllerOptions::default()
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn defaults_round_trip() {
        let text = toml::to_string(&AppConfig::default()).unwrap();
        assert_eq!(AppConfig::from_toml(&text).unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = AppConfig::from_toml(
            "[midi]\nscale = \"pentatonic-major\"\ninstrument = 11\n\n[tracking]\nsource = \"off\"\n",
        ).unwrap();
        assert_eq!(cfg.midi.scale, ScaleKind::PentatonicMajor);
        assert_eq!(cfg.midi.instrument, 11);
        assert_eq!(cfg.midi.root, 60);
        assert_eq!(cfg.tracking.source, TrackingKind::Off);
        assert_eq!(cfg.keyboard.pointer_revert_ms, 150);
    }

    #[test]
    fn rejects_bad_ratio() {
        let err = AppConfig::from_toml("[keyboard]\nstrip_height_ratio = 1.5\n").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn rejects_bad_channel_and_velocity() {
        assert!(AppConfig::from_toml("[midi]\nchannel = 16\n").is_err());
        assert!(AppConfig::from_toml("[midi]\nvelocity = 128\n").is_err());
    }

    #[test]
    fn rejects_zero_revert() {
        assert!(AppConfig::from_toml("[keyboard]\ntracking_revert_ms = 0\n").is_err());
    }

    #[test]
    fn rejects_inverted_interaction_box() {
        assert!(AppConfig::from_toml("[tracking]\nx_range_mm = [100.0, -100.0]\n").is_err());
    }

    #[test]
    fn unknown_scale_is_parse_error() {
        let err = AppConfig::from_toml("[midi]\nscale = \"lydian\"\n").unwrap_err();
        assert!(matches!(err, AppError::ConfigParse(_)));
    }

    #[test]
    fn controller_options_follow_keyboard_section() {
        let cfg = AppConfig::from_toml("[keyboard]\ncoalesce_reverts = true\npointer_revert_ms = 120\n").unwrap();
        let opts = cfg.controller_options();
        assert_eq!(opts.revert_policy, RevertPolicy::Coalesced);
        assert_eq!(opts.pointer_revert, Duration::from_millis(120));
        assert_eq!(opts.tracking_revert, Duration::from_millis(100));
    }

    #[test]
    fn load_reads_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "[window]\nwidth = 800\nheight = 480").unwrap();
        let cfg = AppConfig::load(f.path()).unwrap();
        assert_eq!(cfg.window.width, 800);
        assert_eq!(cfg.window.title, "Air Piano");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = AppConfig::load("/nonexistent/air_piano.toml").unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
