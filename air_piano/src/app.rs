//! Top-level application state machine.
//!
//! `AppState` owns the strip controller and the MIDI voice.  Each frame it
//! fires due reverts, applies the frame's events, then lets the voice follow
//! the resulting highlight.  Firing reverts first means a key struck this
//! frame is still lit when the frame is shown.

use std::sync::mpsc::{self, TryRecvError};
use std::time::Instant;

use tracing::{info, warn};

use key_strip::controller::{KeyboardController, StripEvent};
use key_strip::input::PointerEvent;
use key_strip::surface::Framebuffer;
use key_strip::KeyIndex;
use strip_midi::NoteMap;

use crate::config::{AppConfig, TrackingKind};
use crate::error::AppResult;
use crate::tracking::{start_tracking, SimInput};
use crate::voice::{open_midi_output, Voice};
use crate::window::{StripWindow, WindowInput};

// ════════════════════════════════════════════════════════════════════════════
// Tracking status
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState { Off, Active, Unavailable }

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    controller: KeyboardController<Framebuffer>,
    voice:      Voice,
    key_labels: Vec<String>,
    tracking:   TrackingState,
    hover:      bool,
    pub status: String,
}

impl AppState {
    pub fn new(cfg: &AppConfig, voice: Voice, tracking: TrackingState) -> Self {
        let controller = KeyboardController::new(Framebuffer::new(0, 0), cfg.controller_options());
        let notes = cfg.midi.note_map();
        let key_labels = (0..controller.geometry().key_count.max(key_strip::KEY_COUNT))
            .map(|k| NoteMap::note_name(notes.note_for(k)))
            .collect();

        let mut app = AppState {
            controller,
            voice,
            key_labels,
            tracking,
            hover: false,
            status: String::new(),
        };
        app.status = app.idle_status();
        app
    }

    // ── per-frame step ────────────────────────────────────────────────────

    /// Advance one frame: reverts, then `events`, then the voice.
    pub fn step<I>(&mut self, now: Instant, events: I)
    where
        I: IntoIterator<Item = StripEvent>,
    {
        if self.controller.tick(now) {
            self.status = self.idle_status();
        }

        for event in events {
            let from_pointer = matches!(event, StripEvent::Pointer(_));
            if let Some(key) = self.controller.handle(event, now) {
                self.status = self.key_status(key, from_pointer);
            }
        }

        self.voice.follow(self.controller.highlight());
    }

    fn key_status(&self, key: KeyIndex, from_pointer: bool) -> String {
        format!(
            "KEY {}  {}  ({})",
            key + 1,
            self.key_labels.get(key).map(String::as_str).unwrap_or(""),
            if from_pointer { "pointer" } else { "finger" },
        )
    }

    fn idle_status(&self) -> String {
        match (self.tracking, self.hover) {
            (TrackingState::Unavailable, _) => "READY - tracking unavailable, pointer only".to_string(),
            (TrackingState::Off, _)         => "READY - pointer only".to_string(),
            (TrackingState::Active, true)   => "READY - hover tracking on".to_string(),
            (TrackingState::Active, false)  => "READY".to_string(),
        }
    }

    // ── host notifications ────────────────────────────────────────────────

    pub fn set_hover(&mut self, on: bool) {
        self.hover = on;
        self.status = self.idle_status();
    }

    /// The tracking source went away; carry on with pointer input.
    pub fn tracking_lost(&mut self) {
        if self.tracking == TrackingState::Active {
            warn!("hand tracking stopped, continuing with pointer input only");
        }
        self.tracking = TrackingState::Unavailable;
        self.status = self.idle_status();
    }

    // ── accessors for the render loop ─────────────────────────────────────

    pub fn controller(&self) -> &KeyboardController<Framebuffer> { &self.controller }
    pub fn key_labels(&self) -> &[String]                        { &self.key_labels }
    pub fn tracking(&self)   -> TrackingState                    { self.tracking }
    pub fn voice(&self)      -> &Voice                           { &self.voice }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Creates the tracking source (simulation by default, hardware with
/// `--features leap`), the MIDI voice and the window, then drives the
/// event/render loop at ~60 fps until the window closes.
pub fn run(cfg: AppConfig) -> AppResult<()> {
    // ── tracking ──────────────────────────────────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let mut frames = match start_tracking(&cfg.tracking, sim_rx) {
        Ok(rx) => rx,
        Err(e) => {
            warn!(error = %e, "hand tracking unavailable");
            None
        }
    };
    let tracking = match (&frames, cfg.tracking.source) {
        (Some(_), _)             => TrackingState::Active,
        (None, TrackingKind::Off) => TrackingState::Off,
        (None, _)                => TrackingState::Unavailable,
    };
    let sim_tx = (frames.is_some() && cfg.tracking.source == TrackingKind::Sim).then_some(sim_tx);

    // ── window / voice / state ────────────────────────────────────────────
    let mut window = StripWindow::new(&cfg.window, sim_tx)?;
    let voice = Voice::new(open_midi_output(&cfg.midi), &cfg.midi);
    let mut app = AppState::new(&cfg, voice, tracking);

    let (w, h) = window.size();
    let mut events = vec![StripEvent::Resize { width: w, height: h }];
    info!(width = w, height = h, "air piano running");

    // ── main loop ─────────────────────────────────────────────────────────
    while window.is_open() {
        let now = Instant::now();

        // 1. Window input
        for input in window.poll_input() {
            match input {
                WindowInput::Quit => return Ok(()),
                WindowInput::Resized { width, height } =>
                    events.push(StripEvent::Resize { width, height }),
                WindowInput::PointerDown { x, y } =>
                    events.push(StripEvent::Pointer(PointerEvent::at(x, y))),
                WindowInput::ToggleHover(on) => app.set_hover(on),
            }
        }

        // 2. Drain tracking frames
        let mut lost = false;
        if let Some(rx) = &frames {
            loop {
                match rx.try_recv() {
                    Ok(frame)                       => events.push(StripEvent::Tracking(frame)),
                    Err(TryRecvError::Empty)        => break,
                    Err(TryRecvError::Disconnected) => { lost = true; break; }
                }
            }
        }
        if lost {
            frames = None;
            app.tracking_lost();
        }

        // 3. Per-frame logic
        app.step(now, events.drain(..));

        // 4. Render
        window.present(app.controller(), &app.status, app.key_labels())?;
    }

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use key_strip::input::{HandFrame, Landmark, HAND_LANDMARKS, INDEX_FINGERTIP};
    use crate::voice::tests::RecordingOut;

    fn ms(n: u64) -> Duration { Duration::from_millis(n) }

    fn make_app() -> (AppState, RecordingOut, Instant) {
        let cfg = AppConfig::default();
        let rec = RecordingOut::default();
        let voice = Voice::new(Box::new(rec.clone()), &cfg.midi);
        let mut app = AppState::new(&cfg, voice, TrackingState::Active);
        let t0 = Instant::now();
        app.step(t0, [StripEvent::Resize { width: 700, height: 500 }]);
        (app, rec, t0)
    }

    fn finger(x: f32) -> StripEvent {
        let mut hand = vec![Landmark::new(0.5, 0.5); HAND_LANDMARKS];
        hand[INDEX_FINGERTIP] = Landmark::new(x, 0.3);
        StripEvent::Tracking(HandFrame::single(hand))
    }

    fn note_ons(rec: &RecordingOut) -> Vec<u8> {
        rec.messages().iter().filter(|m| m[0] == 0x90).map(|m| m[1]).collect()
    }

    #[test]
    fn pointer_press_lights_and_sounds() {
        let (mut app, rec, t0) = make_app();
        app.step(t0, [StripEvent::Pointer(PointerEvent::at(125.0, 400.0))]);
        assert_eq!(app.controller().highlight(), Some(2));
        assert_eq!(note_ons(&rec), vec![64]);
        assert!(app.status.contains("KEY 3"));
        assert!(app.status.contains("pointer"));
    }

    #[test]
    fn revert_releases_note() {
        let (mut app, rec, t0) = make_app();
        app.step(t0, [StripEvent::Pointer(PointerEvent::at(125.0, 400.0))]);
        app.step(t0 + ms(150), []);
        assert_eq!(app.controller().highlight(), None);
        assert_eq!(app.voice().sounding(), None);
        assert_eq!(rec.messages().last(), Some(&vec![0x80, 64, 0]));
        assert!(app.status.starts_with("READY"));
    }

    #[test]
    fn steady_finger_holds_one_note() {
        // A frame every 16 ms; reverts fire, but each frame re-lights the key
        // before the voice looks at it.
        let (mut app, rec, t0) = make_app();
        for i in 0..20 {
            app.step(t0 + ms(16 * i), [finger(0.5)]);
        }
        assert_eq!(note_ons(&rec), vec![72]);
        assert_eq!(app.controller().highlight(), Some(7));
    }

    #[test]
    fn moving_finger_changes_note() {
        let (mut app, rec, t0) = make_app();
        app.step(t0, [finger(0.9)]);          // key 1
        app.step(t0 + ms(16), [finger(0.5)]); // key 7
        assert_eq!(note_ons(&rec), vec![62, 72]);
    }

    #[test]
    fn out_of_range_press_changes_nothing() {
        let (mut app, rec, t0) = make_app();
        let before = rec.messages().len();
        app.step(t0, [StripEvent::Pointer(PointerEvent::at(100.0, 50.0))]);
        assert_eq!(app.controller().highlight(), None);
        assert_eq!(rec.messages().len(), before);
    }

    #[test]
    fn tracking_loss_degrades_to_pointer() {
        let (mut app, _rec, t0) = make_app();
        app.tracking_lost();
        assert_eq!(app.tracking(), TrackingState::Unavailable);
        assert!(app.status.contains("unavailable"));
        app.step(t0, [StripEvent::Pointer(PointerEvent::at(25.0, 400.0))]);
        assert_eq!(app.controller().highlight(), Some(0));
    }

    #[test]
    fn key_labels_follow_note_map() {
        let (app, _rec, _) = make_app();
        assert_eq!(app.key_labels().len(), 14);
        assert_eq!(app.key_labels()[0], "C4");
        assert_eq!(app.key_labels()[13], "B5");
    }

    #[test]
    fn hover_toggle_updates_status() {
        let (mut app, _rec, _) = make_app();
        app.set_hover(true);
        assert!(app.status.contains("hover"));
    }
}
