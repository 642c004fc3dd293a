//! # strip_midi
//!
//! Turn key-strip positions into MIDI notes.
//!
//! * [`Scale`] — a pitch set as semitone offsets from a root.
//! * [`NoteMap`] — key index → MIDI note number, walking the scale upward
//!   and wrapping into the next octave.
//! * [`GeneralMidi`] — program numbers for keyboard-friendly instruments.
//! * [`message`] — raw channel-voice messages ready to hand to a MIDI port.
//!
//! No external crates are required.
//!
//! ```rust
//! use strip_midi::NoteMap;
//!
//! // 14 keys of C major from middle C span exactly two octaves.
//! let map = NoteMap::major(60);
//! assert_eq!(map.note_for(0), 60);   // C4
//! assert_eq!(map.note_for(7), 72);   // C5
//! assert_eq!(map.note_for(13), 83);  // B5
//! ```

// ════════════════════════════════════════════════════════════════════════════
// General MIDI instrument numbers
// ════════════════════════════════════════════════════════════════════════════

/// General MIDI program numbers (0-indexed, as sent in Program Change).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum GeneralMidi {
    AcousticGrandPiano   = 0,
    BrightAcousticPiano  = 1,
    ElectricGrandPiano   = 2,
    ElectricPiano1       = 4,
    Harpsichord          = 6,
    Celesta              = 8,
    Glockenspiel         = 9,
    MusicBox             = 10,
    Vibraphone           = 11,
    Marimba              = 12,
    Xylophone            = 13,
    DrawbarOrgan         = 16,
    ChurchOrgan          = 19,
    Accordion            = 21,
    Kalimba              = 108,
    SteelDrums           = 114,
}

impl GeneralMidi {
    /// Raw MIDI program number (0–127).
    pub fn program(self) -> u8 { self as u8 }

    pub fn name(self) -> &'static str {
        match self {
            GeneralMidi::AcousticGrandPiano  => "Acoustic Grand Piano",
            GeneralMidi::BrightAcousticPiano => "Bright Acoustic Piano",
            GeneralMidi::ElectricGrandPiano  => "Electric Grand Piano",
            GeneralMidi::ElectricPiano1      => "Electric Piano 1",
            GeneralMidi::Harpsichord         => "Harpsichord",
            GeneralMidi::Celesta             => "Celesta",
            GeneralMidi::Glockenspiel        => "Glockenspiel",
            GeneralMidi::MusicBox            => "Music Box",
            GeneralMidi::Vibraphone          => "Vibraphone",
            GeneralMidi::Marimba             => "Marimba",
            GeneralMidi::Xylophone           => "Xylophone",
            GeneralMidi::DrawbarOrgan        => "Drawbar Organ",
            GeneralMidi::ChurchOrgan         => "Church Organ",
            GeneralMidi::Accordion           => "Accordion",
            GeneralMidi::Kalimba             => "Kalimba",
            GeneralMidi::SteelDrums          => "Steel Drums",
        }
    }

    /// Look up a listed instrument by program number.
    pub fn from_program(program: u8) -> Option<Self> {
        use GeneralMidi::*;
        [
            AcousticGrandPiano, BrightAcousticPiano, ElectricGrandPiano, ElectricPiano1,
            Harpsichord, Celesta, Glockenspiel, MusicBox, Vibraphone, Marimba, Xylophone,
            DrawbarOrgan, ChurchOrgan, Accordion, Kalimba, SteelDrums,
        ]
        .into_iter()
        .find(|gm| gm.program() == program)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Scale
// ════════════════════════════════════════════════════════════════════════════

/// A pitch collection, as semitone intervals from the root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scale {
    /// Semitone offsets from root, e.g. `[0,2,4,5,7,9,11]` for major.
    pub intervals: Vec<u8>,
    pub name: &'static str,
}

impl Scale {
    /// All 12 chromatic semitones.
    pub fn chromatic() -> Self {
        Scale { intervals: (0..12).collect(), name: "Chromatic" }
    }
    /// Major scale (Ionian): W W H W W W H, the white keys from C.
    pub fn major() -> Self {
        Scale { intervals: vec![0,2,4,5,7,9,11], name: "Major" }
    }
    /// Natural minor (Aeolian): W H W W H W W
    pub fn minor() -> Self {
        Scale { intervals: vec![0,2,3,5,7,8,10], name: "Minor" }
    }
    pub fn pentatonic_major() -> Self {
        Scale { intervals: vec![0,2,4,7,9], name: "Pentatonic Major" }
    }
    pub fn pentatonic_minor() -> Self {
        Scale { intervals: vec![0,3,5,7,10], name: "Pentatonic Minor" }
    }
    pub fn dorian() -> Self {
        Scale { intervals: vec![0,2,3,5,7,9,10], name: "Dorian" }
    }
    /// Custom scale from a list of semitone offsets.  An empty list falls
    /// back to the root alone.
    pub fn custom(intervals: Vec<u8>) -> Self {
        let intervals = if intervals.is_empty() { vec![0] } else { intervals };
        Scale { intervals, name: "Custom" }
    }
    /// Number of pitches in the scale.
    pub fn len(&self) -> usize { self.intervals.len() }
    pub fn is_empty(&self) -> bool { self.intervals.is_empty() }
}

// ════════════════════════════════════════════════════════════════════════════
// NoteMap — key index → MIDI note number (0–127)
// ════════════════════════════════════════════════════════════════════════════

/// Maps a key index to a MIDI note number.
///
/// Keys walk the [`Scale`] from `root`, one degree per key, moving up an
/// octave each time the scale is exhausted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteMap {
    /// MIDI note number of key 0.
    pub root:  u8,
    pub scale: Scale,
}

impl NoteMap {
    pub fn new(root: u8, scale: Scale) -> Self { NoteMap { root, scale } }

    pub fn major(root: u8)     -> Self { NoteMap::new(root, Scale::major()) }
    pub fn minor(root: u8)     -> Self { NoteMap::new(root, Scale::minor()) }
    pub fn chromatic(root: u8) -> Self { NoteMap::new(root, Scale::chromatic()) }

    /// Resolve key `key` to a MIDI note number, clamped to 0–127.
    pub fn note_for(&self, key: usize) -> u8 {
        let n = self.scale.len().max(1);
        let octave   = key / n;
        let degree   = key % n;
        let semitone = self.scale.intervals.get(degree).copied().unwrap_or(0) as usize;
        let note     = self.root as usize + octave * 12 + semitone;
        note.min(127) as u8
    }

    /// Conventional name of a note number, e.g. `60 → "C4"`.
    pub fn note_name(note: u8) -> String {
        const NAMES: [&str; 12] = ["C","C#","D","D#","E","F","F#","G","G#","A","A#","B"];
        let octave = note as i32 / 12 - 1;
        format!("{}{}", NAMES[(note % 12) as usize], octave)
    }
}

impl Default for NoteMap {
    fn default() -> Self { NoteMap::major(60) }
}

// ════════════════════════════════════════════════════════════════════════════
// Channel-voice messages
// ════════════════════════════════════════════════════════════════════════════

/// Raw MIDI channel-voice messages.  Channels are masked to 0–15 and data
/// bytes to 0–127.
pub mod message {
    pub fn note_on(channel: u8, note: u8, velocity: u8) -> [u8; 3] {
        [0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F]
    }

    pub fn note_off(channel: u8, note: u8) -> [u8; 3] {
        [0x80 | (channel & 0x0F), note & 0x7F, 0]
    }

    pub fn program_change(channel: u8, program: u8) -> [u8; 2] {
        [0xC0 | (channel & 0x0F), program & 0x7F]
    }

    /// Control change 123: release every sounding note on the channel.
    pub fn all_notes_off(channel: u8) -> [u8; 3] {
        [0xB0 | (channel & 0x0F), 123, 0]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    // ── NoteMap ──────────────────────────────────────────────────────────
    #[test]
    fn major_from_middle_c() {
        let m = NoteMap::major(60);
        assert_eq!(m.note_for(0), 60); // C
        assert_eq!(m.note_for(1), 62); // D
        assert_eq!(m.note_for(2), 64); // E
        assert_eq!(m.note_for(6), 71); // B
    }

    #[test]
    fn fourteen_keys_span_two_octaves() {
        let m = NoteMap::default();
        let notes: Vec<u8> = (0..14).map(|k| m.note_for(k)).collect();
        assert_eq!(notes.first(), Some(&60));
        assert_eq!(notes.last(), Some(&83));
        assert!(notes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn pentatonic_wraps_after_five() {
        let m = NoteMap::new(60, Scale::pentatonic_major());
        assert_eq!(m.note_for(4), 69); // A4
        assert_eq!(m.note_for(5), 72); // C5
    }

    #[test]
    fn clamps_at_127() {
        let m = NoteMap::chromatic(120);
        assert_eq!(m.note_for(9), 127);
    }

    #[test]
    fn empty_custom_scale_repeats_root_by_octave() {
        let m = NoteMap::new(48, Scale::custom(vec![]));
        assert_eq!(m.note_for(0), 48);
        assert_eq!(m.note_for(1), 60);
    }

    #[test]
    fn note_names() {
        assert_eq!(NoteMap::note_name(60), "C4");
        assert_eq!(NoteMap::note_name(69), "A4");
        assert_eq!(NoteMap::note_name(61), "C#4");
        assert_eq!(NoteMap::note_name(0), "C-1");
    }

    // ── GeneralMidi ───────────────────────────────────────────────────────
    #[test]
    fn gm_program_numbers() {
        assert_eq!(GeneralMidi::AcousticGrandPiano.program(), 0);
        assert_eq!(GeneralMidi::Vibraphone.program(), 11);
        assert_eq!(GeneralMidi::from_program(12), Some(GeneralMidi::Marimba));
        assert_eq!(GeneralMidi::from_program(127), None);
    }

    // ── messages ──────────────────────────────────────────────────────────
    #[test]
    fn message_bytes() {
        assert_eq!(message::note_on(0, 60, 100), [0x90, 60, 100]);
        assert_eq!(message::note_off(3, 60), [0x83, 60, 0]);
        assert_eq!(message::program_change(1, 11), [0xC1, 11]);
        assert_eq!(message::all_notes_off(0), [0xB0, 123, 0]);
    }

    #[test]
    fn message_masks_out_of_range() {
        assert_eq!(message::note_on(17, 200, 255), [0x91, 200 & 0x7F, 0x7F]);
    }
}
