//! Sounding the highlighted key over MIDI.
//!
//! The voice follows the strip's highlight once per frame: a newly lit key
//! releases the previous note and starts its own, an unlit strip releases.
//! Re-lighting the key that is already sounding does nothing, so a finger
//! resting on a key holds one note instead of retriggering every frame.

use tracing::{info, warn};

use key_strip::KeyIndex;
use strip_midi::{message, NoteMap};

use crate::config::MidiConfig;
use crate::error::{AppError, AppResult};

// ════════════════════════════════════════════════════════════════════════════
// MidiOut — abstraction over midir / null (for testing)
// ════════════════════════════════════════════════════════════════════════════

pub trait MidiOut: Send {
    fn send(&mut self, bytes: &[u8]);

    fn program_change(&mut self, channel: u8, program: u8) {
        self.send(&message::program_change(channel, program));
    }
    fn note_on(&mut self, channel: u8, note: u8, velocity: u8) {
        self.send(&message::note_on(channel, note, velocity));
    }
    fn note_off(&mut self, channel: u8, note: u8) {
        self.send(&message::note_off(channel, note));
    }
    fn all_notes_off(&mut self, channel: u8) {
        self.send(&message::all_notes_off(channel));
    }
}

// ── midir backend ─────────────────────────────────────────────────────────

struct MidirOut {
    conn: midir::MidiOutputConnection,
}

impl MidiOut for MidirOut {
    fn send(&mut self, bytes: &[u8]) {
        if let Err(e) = self.conn.send(bytes) {
            warn!(error = %e, "MIDI send failed");
        }
    }
}

// ── null backend (used when no MIDI port is available) ────────────────────

pub struct NullOut;

impl MidiOut for NullOut {
    fn send(&mut self, _bytes: &[u8]) {}
}

// ════════════════════════════════════════════════════════════════════════════
// open_midi_output — enumerate ports and pick the best one
// ════════════════════════════════════════════════════════════════════════════

/// Open a MIDI output for `cfg`, falling back to [`NullOut`] with a warning
/// when MIDI is disabled or no port can be used.
pub fn open_midi_output(cfg: &MidiConfig) -> Box<dyn MidiOut> {
    if !cfg.enabled {
        info!("MIDI disabled, keys will be silent");
        return Box::new(NullOut);
    }
    match connect_first_port() {
        Ok(out) => out,
        Err(e) => {
            warn!(error = %e, "no MIDI output, keys will be silent");
            warn!("install a synthesiser such as `fluidsynth` or `timidity -iA` to hear notes");
            Box::new(NullOut)
        }
    }
}

fn connect_first_port() -> AppResult<Box<dyn MidiOut>> {
    let midi_out = midir::MidiOutput::new("air_piano")
        .map_err(|e| AppError::Midi(e.to_string()))?;

    let ports = midi_out.ports();
    if ports.is_empty() {
        return Err(AppError::Midi("no output ports found".to_string()));
    }

    // Prefer a softsynth if visible
    let port_idx = ports.iter().position(|p| {
        midi_out.port_name(p).map(|n| {
            let n = n.to_lowercase();
            n.contains("fluid") || n.contains("timidity") ||
            n.contains("microsoft") || n.contains("synth")
        }).unwrap_or(false)
    }).unwrap_or(0);

    let port = &ports[port_idx];
    let name = midi_out.port_name(port).unwrap_or_else(|_| "Unknown".to_string());
    info!(port = %name, "opening MIDI port");

    let conn = midi_out.connect(port, "air-piano")
        .map_err(|e| AppError::Midi(e.to_string()))?;
    Ok(Box::new(MidirOut { conn }))
}

// ════════════════════════════════════════════════════════════════════════════
// Voice
// ════════════════════════════════════════════════════════════════════════════

pub struct Voice {
    out:      Box<dyn MidiOut>,
    notes:    NoteMap,
    channel:  u8,
    velocity: u8,
    sounding: Option<u8>,
}

impl Voice {
    /// Wrap `out` and select the configured instrument.
    pub fn new(mut out: Box<dyn MidiOut>, cfg: &MidiConfig) -> Self {
        out.program_change(cfg.channel, cfg.instrument);
        Voice {
            out,
            notes:    cfg.note_map(),
            channel:  cfg.channel,
            velocity: cfg.velocity,
            sounding: None,
        }
    }

    /// A voice that never makes a sound.
    pub fn silent() -> Self {
        Voice::new(Box::new(NullOut), &MidiConfig { enabled: false, ..MidiConfig::default() })
    }

    /// Note currently held, if any.
    pub fn sounding(&self) -> Option<u8> { self.sounding }

    pub fn note_for(&self, key: KeyIndex) -> u8 { self.notes.note_for(key) }

    /// Bring the held note in line with the strip's highlight.
    pub fn follow(&mut self, highlight: Option<KeyIndex>) {
        let wanted = highlight.map(|k| self.notes.note_for(k));
        if wanted == self.sounding {
            return;
        }
        self.release();
        if let Some(note) = wanted {
            self.out.note_on(self.channel, note, self.velocity);
            self.sounding = Some(note);
        }
    }

    /// Stop the held note.
    pub fn release(&mut self) {
        if let Some(note) = self.sounding.take() {
            self.out.note_off(self.channel, note);
        }
    }
}

impl Drop for Voice {
    fn drop(&mut self) {
        self.release();
        self.out.all_notes_off(self.channel);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records every message for inspection.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingOut {
        pub sent: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl RecordingOut {
        pub(crate) fn messages(&self) -> Vec<Vec<u8>> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl MidiOut for RecordingOut {
        fn send(&mut self, bytes: &[u8]) {
            self.sent.lock().unwrap().push(bytes.to_vec());
        }
    }

    fn voice() -> (Voice, RecordingOut) {
        let rec = RecordingOut::default();
        let v = Voice::new(Box::new(rec.clone()), &MidiConfig::default());
        (v, rec)
    }

    #[test]
    fn selects_instrument_on_open() {
        let (_v, rec) = voice();
        assert_eq!(rec.messages(), vec![vec![0xC0, 0]]);
    }

    #[test]
    fn same_key_sounds_once() {
        let (mut v, rec) = voice();
        v.follow(Some(2));
        v.follow(Some(2));
        v.follow(Some(2));
        let ons = rec.messages().iter().filter(|m| m[0] == 0x90).count();
        assert_eq!(ons, 1);
        assert_eq!(v.sounding(), Some(64));
    }

    #[test]
    fn new_key_releases_previous() {
        let (mut v, rec) = voice();
        v.follow(Some(0));
        v.follow(Some(1));
        let msgs = rec.messages();
        assert_eq!(&msgs[1..], &[vec![0x90, 60, 100], vec![0x80, 60, 0], vec![0x90, 62, 100]]);
    }

    #[test]
    fn unlit_strip_releases() {
        let (mut v, rec) = voice();
        v.follow(Some(7));
        v.follow(None);
        assert_eq!(v.sounding(), None);
        assert_eq!(rec.messages().last(), Some(&vec![0x80, 72, 0]));
    }

    #[test]
    fn drop_silences_channel() {
        let (mut v, rec) = voice();
        v.follow(Some(3));
        drop(v);
        let msgs = rec.messages();
        assert_eq!(msgs[msgs.len() - 2], vec![0x80, 65, 0]);
        assert_eq!(msgs[msgs.len() - 1], vec![0xB0, 123, 0]);
    }

    #[test]
    fn silent_voice_tracks_notes() {
        let mut v = Voice::silent();
        v.follow(Some(13));
        assert_eq!(v.sounding(), Some(83));
        v.release();
        assert_eq!(v.sounding(), None);
    }

    #[test]
    fn disabled_config_opens_null_output() {
        let cfg = MidiConfig { enabled: false, ..MidiConfig::default() };
        let mut out = open_midi_output(&cfg);
        out.note_on(0, 60, 100); // must not panic
    }
}
