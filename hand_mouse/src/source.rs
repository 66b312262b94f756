//! Pose sources: LeapMotion hardware or keyboard/mouse simulation.
//!
//! Every source runs on its own thread and publishes [`Frame`]s into the
//! shared [`FrameSlot`].  The consumer never knows which one is feeding it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use hand_gesture::{synth_pose, HandShape};
use tracing::{debug, info};

use crate::control::SessionClock;
use crate::slot::{Frame, FrameSlot};

// ════════════════════════════════════════════════════════════════════════════
// PoseSource trait: unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can publish hand poses into a [`FrameSlot`].
///
/// `run` returns when `running` goes false or the source is exhausted.
pub trait PoseSource: Send + 'static {
    fn name(&self) -> &'static str;
    fn run(self: Box<Self>, slot: Arc<FrameSlot>, clock: SessionClock, running: Arc<AtomicBool>);
}

/// Spawn a pose source on its own thread.
pub fn spawn_pose_source(
    source:  Box<dyn PoseSource>,
    slot:    Arc<FrameSlot>,
    clock:   SessionClock,
    running: Arc<AtomicBool>,
) -> std::io::Result<JoinHandle<()>> {
    let name = source.name();
    thread::Builder::new()
        .name(format!("pose-{}", name))
        .spawn(move || {
            info!(source = name, "pose source started");
            source.run(slot, clock, running);
            info!(source = name, "pose source stopped");
        })
}

// ════════════════════════════════════════════════════════════════════════════
// SimPoseSource: keyboard/mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Cursor inside the window, normalized to 0–1.
    Pointer { x: f32, y: f32 },
    /// Cursor left the window: the hand is out of frame.
    PointerLost,
    /// A shape key went down.
    ShapeDown(HandShape),
    /// A shape key came up.
    ShapeUp(HandShape),
}

/// Synthesizes a hand whose index tip follows the window cursor.
///
/// The hand shape is the most recently pressed shape key still held, or
/// [`HandShape::Point`] when none is.
pub struct SimPoseSource {
    rx:     Receiver<SimInput>,
    period: Duration,
}

/// Offset from the index tip to the centre [`synth_pose`] expects.
const SIM_TIP_OFFSET: (f32, f32) = (0.03, 0.10);

impl SimPoseSource {
    pub fn new(rx: Receiver<SimInput>, fps: u32) -> Self {
        SimPoseSource {
            rx,
            period: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
        }
    }
}

/// Simulation state folded from [`SimInput`]s.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SimState {
    pointer: Option<(f32, f32)>,
    held:    Vec<HandShape>,
}

impl SimState {
    pub fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::Pointer { x, y } => self.pointer = Some((x, y)),
            SimInput::PointerLost      => self.pointer = None,
            SimInput::ShapeDown(s) => {
                self.held.retain(|&h| h != s);
                self.held.push(s);
            }
            SimInput::ShapeUp(s) => self.held.retain(|&h| h != s),
        }
    }

    pub fn shape(&self) -> HandShape {
        self.held.last().copied().unwrap_or(HandShape::Point)
    }

    /// The pose for the current state, or `None` with no cursor.
    pub fn pose(&self) -> Option<hand_gesture::HandPose> {
        let (x, y) = self.pointer?;
        Some(synth_pose(self.shape(), x + SIM_TIP_OFFSET.0, y + SIM_TIP_OFFSET.1))
    }
}

impl PoseSource for SimPoseSource {
    fn name(&self) -> &'static str { "sim" }

    fn run(self: Box<Self>, slot: Arc<FrameSlot>, clock: SessionClock, running: Arc<AtomicBool>) {
        let mut state = SimState::default();
        while running.load(Ordering::Relaxed) {
            loop {
                match self.rx.try_recv() {
                    Ok(input) => {
                        let before = state.shape();
                        state.apply(input);
                        if state.shape() != before {
                            debug!(shape = state.shape().as_str(), "sim hand shape");
                        }
                    }
                    Err(TryRecvError::Empty)        => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }
            slot.push(Frame { pose: state.pose(), captured_at: clock.now() });
            thread::sleep(self.period);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapPoseSource: real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Whether a tracked hand is trusted.  NaN confidence never is.
pub fn confident(confidence: f32, min_confidence: f32) -> bool {
    confidence >= min_confidence
}

/// Leap interaction box used for normalization, in millimetres.
#[cfg(feature = "leap")]
mod leap_box {
    pub const X_MIN:  f32 = -200.0;
    pub const Y_MIN:  f32 = 50.0;
    pub const SPAN:   f32 = 400.0;
}

/// Pose source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
/// The first confident hand in each tracking frame is converted to the
/// 21-landmark layout: the wrist is the middle metacarpal base, each digit
/// contributes its knuckle and the ends of its last three bones.  Positions
/// are normalized over a 400 mm box centred above the device, y flipped to
/// grow downward.
///
/// Hands below `min_confidence` are reported as no hand, and so is every
/// failed poll, so an unplugged device decays into a run of empty frames.
#[cfg(feature = "leap")]
pub struct LeapPoseSource {
    min_confidence: f32,
}

/// Normalize one Leap joint position into frame units.
#[cfg(feature = "leap")]
macro_rules! leap_landmark {
    ($v:expr) => {{
        let v = $v;
        hand_gesture::Landmark::new(
            (v.x - leap_box::X_MIN) / leap_box::SPAN,
            1.0 - (v.y - leap_box::Y_MIN) / leap_box::SPAN,
            v.z / leap_box::SPAN,
        )
    }};
}

#[cfg(feature = "leap")]
impl LeapPoseSource {
    pub fn new(min_confidence: f32) -> Self {
        LeapPoseSource { min_confidence }
    }

    fn to_pose(hand: &leaprs::Hand) -> Option<hand_gesture::HandPose> {
        let digits: Vec<_> = hand.digits().collect();
        if digits.len() < 5 { return None; }

        let mut points = Vec::with_capacity(hand_gesture::LANDMARK_COUNT);
        // Wrist: base of the middle metacarpal.
        points.push(leap_landmark!(digits[2].metacarpal().prev_joint()));
        // Thumb: its metacarpal is zero-length, start at the proximal.
        let thumb = &digits[0];
        points.push(leap_landmark!(thumb.proximal().prev_joint()));
        points.push(leap_landmark!(thumb.intermediate().prev_joint()));
        points.push(leap_landmark!(thumb.distal().prev_joint()));
        points.push(leap_landmark!(thumb.distal().next_joint()));
        for digit in &digits[1..5] {
            points.push(leap_landmark!(digit.proximal().prev_joint()));
            points.push(leap_landmark!(digit.intermediate().prev_joint()));
            points.push(leap_landmark!(digit.distal().prev_joint()));
            points.push(leap_landmark!(digit.distal().next_joint()));
        }
        hand_gesture::HandPose::from_slice(&points).ok()
    }
}

#[cfg(feature = "leap")]
impl PoseSource for LeapPoseSource {
    fn name(&self) -> &'static str { "leap" }

    fn run(self: Box<Self>, slot: Arc<FrameSlot>, clock: SessionClock, running: Arc<AtomicBool>) {
        use leaprs::*;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                tracing::error!("failed to create LeapC connection: {:?}", e);
                return;
            }
        };
        if let Err(e) = connection.open() {
            tracing::error!("failed to open LeapMotion device: {:?}", e);
            return;
        }

        while running.load(Ordering::Relaxed) {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(e) => {
                    tracing::trace!("LeapC poll failed: {:?}", e);
                    slot.push(Frame { pose: None, captured_at: clock.now() });
                    continue;
                }
            };

            if let Event::Tracking(frame) = msg.event() {
                let pose = frame
                    .hands()
                    .find(|h| confident(h.confidence, self.min_confidence))
                    .and_then(|h| Self::to_pose(&h));
                slot.push(Frame { pose, captured_at: clock.now() });
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
