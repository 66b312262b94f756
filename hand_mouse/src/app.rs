//! Top-level controller and the main loop.
//!
//! `Controller` owns the gesture engine, the cursor filters, the mapper and
//! the pointer sink.  It consumes one tracker frame per tick and turns the
//! recognised gesture into sink calls.  Nothing else touches those objects:
//! other threads reach the controller only through [`ControlCommand`]s.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;

use anyhow::{Context, Result};
use hand_gesture::{
    CoordinateMapper, DebugSnapshot, Gesture, GestureEngine, GestureTag, HandPose, OneEuroFilter2D,
};
use tracing::{debug, info, trace, warn};

use crate::config::{AppConfig, SourceKind};
use crate::control::{install_interrupt_handler, ControlCommand, SessionClock};
use crate::sink::{LogSink, PointerSink};
use crate::slot::{Frame, FrameSlot};
use crate::source::{spawn_pose_source, PoseSource, SimInput, SimPoseSource};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// DisplayState
// ════════════════════════════════════════════════════════════════════════════

/// What the status line shows after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayState {
    pub active: bool,
    /// Recogniser state, or `None` when the tracker saw no hand.
    pub hand:   Option<GestureTag>,
}

impl std::fmt::Display for DisplayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.active { "ACTIVE" } else { "PAUSED" };
        match self.hand {
            Some(tag) => write!(f, "{} | {}", status, tag),
            None      => write!(f, "{} | NO HAND", status),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Controller
// ════════════════════════════════════════════════════════════════════════════

pub struct Controller<S: PointerSink> {
    engine: GestureEngine,
    filter: OneEuroFilter2D,
    mapper: CoordinateMapper,
    sink:   S,
    active: bool,
}

impl<S: PointerSink> Controller<S> {
    pub fn new(cfg: &AppConfig, sink: S) -> Self {
        Controller {
            engine: GestureEngine::new(cfg.gesture.clone()),
            filter: OneEuroFilter2D::from_config(&cfg.filter),
            mapper: CoordinateMapper::from_config(&cfg.mapping),
            sink,
            active: cfg.session.start_active,
        }
    }

    pub fn is_active(&self) -> bool        { self.active }
    pub fn engine(&self) -> &GestureEngine { &self.engine }
    pub fn debug(&self) -> &DebugSnapshot  { self.engine.debug() }
    pub fn sink(&self) -> &S               { &self.sink }
    pub fn sink_mut(&mut self) -> &mut S   { &mut self.sink }

    /// Forget all gesture and filter history.
    pub fn reset(&mut self) {
        // A paused controller already released the button.
        if self.active && self.engine.dragging() {
            self.sink.drag_end();
        }
        self.engine.reset();
        self.filter.reset();
    }

    /// Pause or resume.  Resuming starts from a clean recogniser; pausing
    /// mid-drag releases the button.
    pub fn set_active(&mut self, active: bool) {
        if active == self.active {
            return;
        }
        if active {
            self.reset();
        } else if self.engine.dragging() {
            self.sink.drag_end();
        }
        self.active = active;
        info!("Hand mouse: {}", if active { "ON" } else { "OFF" });
    }

    /// Apply one control command.  Returns false on `Quit`.
    pub fn handle(&mut self, cmd: ControlCommand) -> bool {
        debug!(?cmd, "control command");
        match cmd {
            ControlCommand::Toggle => self.set_active(!self.active),
            ControlCommand::Reset  => self.reset(),
            ControlCommand::Quit   => return false,
        }
        true
    }

    /// Process one tracker frame taken at `now` (session seconds).
    pub fn tick(&mut self, pose: Option<&HandPose>, now: f64) -> DisplayState {
        let hand = pose.map(|_| self.engine.state());
        if !self.active {
            return DisplayState { active: false, hand };
        }

        let gesture = match pose {
            Some(p) => self.engine.update(p, now),
            None    => {
                self.coast();
                return DisplayState { active: true, hand: None };
            }
        };
        trace!(?gesture, "frame");
        self.dispatch(gesture, now);

        DisplayState { active: true, hand: Some(self.engine.state()) }
    }

    /// Emit residual scroll momentum.
    fn coast(&mut self) {
        let delta = self.engine.tick_momentum();
        if delta != 0.0 {
            self.sink.scroll(delta);
        }
    }

    fn target(&mut self, x: f32, y: f32, now: f64) -> (f64, f64) {
        let mapped = self.mapper.map(x as f64, y as f64);
        self.filter.apply(mapped, now)
    }

    fn dispatch(&mut self, gesture: Gesture, now: f64) {
        match gesture {
            Gesture::Moving { x, y } => {
                let (sx, sy) = self.target(x, y, now);
                self.sink.move_to(sx, sy);
            }
            Gesture::Dragging { x, y } => {
                let (sx, sy) = self.target(x, y, now);
                self.sink.drag_move(sx, sy);
            }
            Gesture::DragEnd    => self.sink.drag_end(),
            Gesture::LeftClick  => self.sink.left_click(),
            Gesture::RightClick => self.sink.right_click(),
            Gesture::Scrolling { delta } => {
                if delta != 0.0 {
                    self.sink.scroll(delta);
                }
            }
            Gesture::SwipeLeft  => self.sink.swipe_back(),
            Gesture::SwipeRight => self.sink.swipe_forward(),
            Gesture::Idle       => {}
        }
        if !matches!(gesture, Gesture::Scrolling { .. }) {
            self.coast();
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameFeed: slot frames → controller ticks
// ════════════════════════════════════════════════════════════════════════════

/// Source periods without a frame before the hand counts as gone.
const STALE_FRAMES: f64 = 3.0;

/// Decides what the controller ticks with on each loop pass.
///
/// A fresh frame is passed through with its capture time.  Once no frame
/// has arrived for `stale_after` seconds every pass ticks with no hand, so a
/// stalled or lost source looks exactly like a hand leaving the frame.
#[derive(Debug, Clone)]
pub struct FrameFeed {
    stale_after: f64,
    last_seen:   f64,
}

impl FrameFeed {
    pub fn new(stale_after: f64, now: f64) -> Self {
        FrameFeed { stale_after, last_seen: now }
    }

    pub fn from_config(cfg: &AppConfig, now: f64) -> Self {
        let rate = cfg.tracker.sim_fps.min(cfg.session.frame_rate).max(1) as f64;
        FrameFeed::new(STALE_FRAMES / rate, now)
    }

    /// The pose and timestamp to tick with, or `None` to skip this pass.
    pub fn next(&mut self, frame: Option<Frame>, now: f64) -> Option<(Option<HandPose>, f64)> {
        match frame {
            Some(f) => {
                self.last_seen = f.captured_at;
                Some((f.pose, f.captured_at))
            }
            None if now - self.last_seen > self.stale_after => Some((None, now)),
            None => None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): main application loop
// ════════════════════════════════════════════════════════════════════════════

fn make_source(cfg: &AppConfig, sim_rx: Receiver<SimInput>) -> Result<Box<dyn PoseSource>> {
    match cfg.tracker.source {
        SourceKind::Sim => Ok(Box::new(SimPoseSource::new(sim_rx, cfg.tracker.sim_fps))),
        #[cfg(feature = "leap")]
        SourceKind::Leap => Ok(Box::new(crate::source::LeapPoseSource::new(cfg.tracker.min_confidence))),
        #[cfg(not(feature = "leap"))]
        SourceKind::Leap => anyhow::bail!("LeapMotion source requested but built without the `leap` feature"),
    }
}

fn make_sink(cfg: &AppConfig) -> Box<dyn PointerSink> {
    if cfg.session.dry_run {
        info!("Dry run: pointer actions are logged, not injected");
        return Box::new(LogSink::default());
    }
    #[cfg(feature = "rdev")]
    {
        Box::new(crate::sink::RdevSink::new())
    }
    #[cfg(not(feature = "rdev"))]
    {
        warn!("Built without the `rdev` feature: pointer actions are logged, not injected");
        Box::new(LogSink::default())
    }
}

/// Run the full application.
///
/// Creates the debug window, the pose source and the controller, and drives
/// the control/frame/render loop at `session.frame_rate`.
pub fn run(cfg: AppConfig) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let clock   = SessionClock::start();
    let slot    = Arc::new(FrameSlot::new());

    install_interrupt_handler(&running)?;

    // ── Channels ──────────────────────────────────────────────────────────
    let (sim_tx, sim_rx)         = mpsc::channel::<SimInput>();
    let (control_tx, control_rx) = mpsc::channel::<ControlCommand>();

    // ── Pose source thread ────────────────────────────────────────────────
    let source = make_source(&cfg, sim_rx)?;
    let producer = spawn_pose_source(source, Arc::clone(&slot), clock, Arc::clone(&running))
        .context("Failed to start pose source thread")?;

    // ── Window + controller ───────────────────────────────────────────────
    let mut vis = Visualizer::new(&cfg, sim_tx, control_tx)?;
    let mut controller = Controller::new(&cfg, make_sink(&cfg));

    let mut display = DisplayState { active: controller.is_active(), hand: None };
    let mut last_pose: Option<HandPose> = None;
    let mut feed = FrameFeed::from_config(&cfg, clock.now());

    // ── Main loop ─────────────────────────────────────────────────────────
    'session: while running.load(Ordering::Relaxed) && vis.is_open() {
        // 1. Window input → SimInput / ControlCommand
        vis.poll_input();

        // 2. Drain control commands
        loop {
            match control_rx.try_recv() {
                Ok(cmd) => {
                    if !controller.handle(cmd) {
                        break 'session;
                    }
                }
                Err(TryRecvError::Empty)        => break,
                Err(TryRecvError::Disconnected) => break 'session,
            }
        }

        // 3. Newest frame, or no hand once the source has gone quiet
        if let Some((pose, at)) = feed.next(slot.take(), clock.now()) {
            display = controller.tick(pose.as_ref(), at);
            last_pose = pose;
        } else {
            display.active = controller.is_active();
        }

        // 4. Render
        vis.render(last_pose.as_ref(), &display, controller.debug());
    }

    running.store(false, Ordering::Relaxed);
    controller.set_active(false);
    if producer.join().is_err() {
        warn!("Pose source thread panicked");
    }
    info!(
        pushed  = slot.pushed(),
        dropped = slot.dropped(),
        seconds = clock.elapsed().as_secs_f64(),
        "Hand mouse stopped"
    );
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
