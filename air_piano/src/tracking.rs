//! Hand-tracking sources — LeapMotion hardware and mouse-hover simulation.
//!
//! The public interface is [`HandFrame`] delivered over a `mpsc` channel.
//! Consumers don't need to know whether frames came from real hardware or
//! the simulator.
//!
//! Every source reports landmarks in camera-image coordinates, i.e. as a
//! front-facing camera would see the hand: left/right flipped relative to
//! the user.  The strip's tracking adapter mirrors them back.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use thiserror::Error;
use tracing::{debug, error, info};

use key_strip::input::{HandFrame, Landmark, HAND_LANDMARKS, INDEX_FINGERTIP};

use crate::config::{TrackingConfig, TrackingKind};

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("tracking device unavailable: {0}")]
    Unavailable(String),

    #[error("built without the `{0}` feature")]
    NotCompiled(&'static str),

    #[error("tracking source disconnected")]
    Disconnected,
}

// ════════════════════════════════════════════════════════════════════════════
// TrackingSource trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`HandFrame`]s over a channel.
pub trait TrackingSource: Send + 'static {
    fn name(&self) -> &'static str;

    /// Produce frames until the receiver hangs up or the source ends.
    fn run(self: Box<Self>, tx: Sender<HandFrame>) -> Result<(), TrackingError>;
}

/// Spawn a tracking source on its own thread and return the receiving end.
///
/// A failing source is logged and its channel closes; the receiver sees
/// a disconnect.
pub fn spawn_tracking_source<T: TrackingSource>(source: T) -> Receiver<HandFrame> {
    let (tx, rx) = mpsc::channel();
    let name = source.name();
    thread::spawn(move || match Box::new(source).run(tx) {
        Ok(())  => debug!(source = name, "tracking source finished"),
        Err(e)  => error!(source = name, error = %e, "tracking source failed"),
    });
    rx
}

/// Start the configured source.  `Ok(None)` means tracking is switched off.
pub fn start_tracking(
    cfg:    &TrackingConfig,
    sim_rx: Receiver<SimInput>,
) -> Result<Option<Receiver<HandFrame>>, TrackingError> {
    match cfg.source {
        TrackingKind::Off  => Ok(None),
        TrackingKind::Sim  => {
            info!("hand tracking: mouse-hover simulation (press H)");
            Ok(Some(spawn_tracking_source(SimTrackingSource { rx: sim_rx })))
        }
        TrackingKind::Leap => spawn_leap(cfg).map(Some),
    }
}

#[cfg(feature = "leap")]
fn spawn_leap(cfg: &TrackingConfig) -> Result<Receiver<HandFrame>, TrackingError> {
    info!("hand tracking: LeapMotion hardware");
    Ok(spawn_tracking_source(LeapTrackingSource::from_config(cfg)))
}

#[cfg(not(feature = "leap"))]
fn spawn_leap(_cfg: &TrackingConfig) -> Result<Receiver<HandFrame>, TrackingError> {
    Err(TrackingError::NotCompiled("leap"))
}

// ════════════════════════════════════════════════════════════════════════════
// LeapTrackingSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Tracking source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// Each digit contributes four joints (knuckle, middle, last joint, tip)
/// after the palm, giving the same 21-point layout as camera hand models,
/// so landmark 8 is the index fingertip.  Millimetre positions are mapped
/// into `[0, 1]` with the configured interaction box.
#[cfg(feature = "leap")]
pub struct LeapTrackingSource {
    pub x_range_mm: [f32; 2],
    pub y_range_mm: [f32; 2],
}

#[cfg(feature = "leap")]
impl LeapTrackingSource {
    pub fn from_config(cfg: &TrackingConfig) -> Self {
        LeapTrackingSource { x_range_mm: cfg.x_range_mm, y_range_mm: cfg.y_range_mm }
    }

    /// Millimetres (x right, y up, as the device sees the user) → camera-image
    /// landmark (x flipped, y down).
    fn landmark(&self, x_mm: f32, y_mm: f32) -> Landmark {
        let [x0, x1] = self.x_range_mm;
        let [y0, y1] = self.y_range_mm;
        let screen_x = (x_mm - x0) / (x1 - x0);
        let screen_y = (y_mm - y0) / (y1 - y0);
        Landmark::new(1.0 - screen_x, 1.0 - screen_y)
    }

    fn hand_landmarks(&self, hand: &leaprs::Hand) -> Vec<Landmark> {
        let mut points = Vec::with_capacity(HAND_LANDMARKS);
        let palm = hand.palm().position();
        points.push(self.landmark(palm.x, palm.y));
        for digit in hand.digits() {
            let knuckle = digit.proximal().prev_joint();
            let middle  = digit.intermediate().prev_joint();
            let last    = digit.distal().prev_joint();
            let tip     = digit.distal().next_joint();
            for j in [knuckle, middle, last, tip] {
                points.push(self.landmark(j.x, j.y));
            }
        }
        points
    }
}

#[cfg(feature = "leap")]
impl TrackingSource for LeapTrackingSource {
    fn name(&self) -> &'static str { "leap" }

    fn run(self: Box<Self>, tx: Sender<HandFrame>) -> Result<(), TrackingError> {
        use leaprs::*;

        let mut connection = Connection::create(ConnectionConfig::default())
            .map_err(|e| TrackingError::Unavailable(format!("LeapC connection: {:?}", e)))?;
        connection.open()
            .map_err(|e| TrackingError::Unavailable(format!("LeapMotion device: {:?}", e)))?;

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            if let Event::Tracking(frame) = msg.event() {
                let hands = frame.hands().map(|h| self.hand_landmarks(&h)).collect();
                if tx.send(HandFrame { hands }).is_err() {
                    return Ok(());
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimTrackingSource — mouse-hover simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the window while hover tracking is on.
#[derive(Clone, Debug, PartialEq)]
pub enum SimInput {
    /// Mouse position, normalized to the window (0,0 top-left).
    Hover { x: f32, y: f32 },
    /// Mouse left the window or hover tracking was switched off.
    Lost,
}

/// Tracking source driven by [`SimInput`] events from the window.
///
/// The simulated "camera" sees the user mirrored, exactly like a webcam, so
/// the fingertip lands under the cursor once the adapter flips it back.
pub struct SimTrackingSource {
    pub rx: Receiver<SimInput>,
}

/// A simple upright hand whose index fingertip is at the camera-space
/// point `(x, y)`.
pub fn sim_hand(x: f32, y: f32) -> Vec<Landmark> {
    let wrist = Landmark::new(x, y + 0.3);
    (0..HAND_LANDMARKS)
        .map(|i| {
            if i == INDEX_FINGERTIP {
                Landmark::new(x, y)
            } else {
                // joints spread between wrist and tip
                let t = (i % 4) as f32 / 4.0;
                Landmark::new(x, wrist.y + (y - wrist.y) * t)
            }
        })
        .collect()
}

impl TrackingSource for SimTrackingSource {
    fn name(&self) -> &'static str { "sim" }

    fn run(self: Box<Self>, tx: Sender<HandFrame>) -> Result<(), TrackingError> {
        for input in self.rx {
            let frame = match input {
                SimInput::Hover { x, y } => HandFrame::single(sim_hand(1.0 - x, y)),
                SimInput::Lost           => HandFrame::empty(),
            };
            if tx.send(frame).is_err() {
                return Err(TrackingError::Disconnected);
            }
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn recv(rx: &Receiver<HandFrame>) -> HandFrame {
        rx.recv_timeout(Duration::from_secs(2)).expect("frame")
    }

    #[test]
    fn sim_hover_is_reported_in_camera_space() {
        let (tx, rx) = mpsc::channel();
        let frames = spawn_tracking_source(SimTrackingSource { rx });
        tx.send(SimInput::Hover { x: 0.8, y: 0.5 }).unwrap();
        let frame = recv(&frames);
        let tip = frame.first_hand_landmark(INDEX_FINGERTIP).unwrap();
        assert!((tip.x - 0.2).abs() < 1e-6);
        assert!((tip.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn sim_lost_gives_empty_frame() {
        let (tx, rx) = mpsc::channel();
        let frames = spawn_tracking_source(SimTrackingSource { rx });
        tx.send(SimInput::Lost).unwrap();
        assert_eq!(recv(&frames), HandFrame::empty());
    }

    #[test]
    fn sim_source_ends_with_its_input() {
        let (tx, rx) = mpsc::channel::<SimInput>();
        let frames = spawn_tracking_source(SimTrackingSource { rx });
        drop(tx);
        assert!(frames.recv_timeout(Duration::from_secs(2)).is_err());
    }

    #[test]
    fn sim_hand_has_full_landmark_set() {
        let hand = sim_hand(0.3, 0.4);
        assert_eq!(hand.len(), HAND_LANDMARKS);
        assert_eq!(hand[INDEX_FINGERTIP], Landmark::new(0.3, 0.4));
    }

    #[test]
    fn off_starts_nothing() {
        let (_tx, rx) = mpsc::channel();
        let cfg = TrackingConfig { source: TrackingKind::Off, ..TrackingConfig::default() };
        assert!(start_tracking(&cfg, rx).unwrap().is_none());
    }

    #[cfg(not(feature = "leap"))]
    #[test]
    fn leap_without_feature_is_reported() {
        let (_tx, rx) = mpsc::channel();
        let cfg = TrackingConfig { source: TrackingKind::Leap, ..TrackingConfig::default() };
        assert!(matches!(start_tracking(&cfg, rx), Err(TrackingError::NotCompiled("leap"))));
    }
}
