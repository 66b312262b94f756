//! Gesture state machine.
//!
//! One [`HandPose`] and a timestamp go in per frame, one [`Gesture`] comes
//! out.  Rules are evaluated in a fixed priority order and the first match
//! wins:
//!
//! | # | Rule        | Shape                                   | Emits                  |
//! |---|-------------|-----------------------------------------|------------------------|
//! | 1 | guard       | any non-finite coordinate               | `Idle`                 |
//! | 2 | drag hold   | already dragging                        | `Dragging` / `DragEnd` |
//! | 3 | drag start  | thumb tip on middle tip                 | `Dragging`             |
//! | 4 | left click  | thumb tip crosses the index knuckle     | `LeftClick`            |
//! | 5 | right click | thumb tip on pinky tip                  | `RightClick`           |
//! | 6 | scroll      | index + middle out, ring + pinky curled | `Scrolling`            |
//! | 7 | swipe       | open hand moving fast sideways          | `SwipeLeft/Right`      |
//! | 8 | move        | index only                              | `Moving`               |
//! | 9 | idle        | anything else                           | `Idle`                 |
//!
//! Clicks are latched: each has a fire threshold and a separate release
//! threshold, and a fired click must observe its release before it can fire
//! again.  Both clicks share one cooldown timestamp.
//!
//! Drag preempts clicks, clicks preempt scroll and swipe.  Click rules fall
//! through when they do not fire, so a held click pose keeps moving the
//! pointer.

use tracing::{debug, trace};

use crate::config::GestureConfig;
use crate::landmark::{distance_2d, thumb_extended, FingerExtension, HandPose, Joint};

/// Minimum frame spacing for a swipe velocity sample.  Closer frames are
/// dropped to avoid velocity spikes.
const SWIPE_MIN_DT: f64 = 0.005;

/// Weight of the old anchor in the moving scroll anchor.
const SCROLL_ANCHOR_KEEP: f32 = 0.7;

// ════════════════════════════════════════════════════════════════════════════
// Gesture
// ════════════════════════════════════════════════════════════════════════════

/// Gesture kind without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GestureTag {
    #[default]
    Idle,
    Moving,
    LeftClick,
    RightClick,
    Dragging,
    DragEnd,
    Scrolling,
    SwipeLeft,
    SwipeRight,
}

impl GestureTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle       => "IDLE",
            Self::Moving     => "MOVING",
            Self::LeftClick  => "LEFT_CLICK",
            Self::RightClick => "RIGHT_CLICK",
            Self::Dragging   => "DRAGGING",
            Self::DragEnd    => "DRAG_END",
            Self::Scrolling  => "SCROLLING",
            Self::SwipeLeft  => "SWIPE_LEFT",
            Self::SwipeRight => "SWIPE_RIGHT",
        }
    }
}

impl std::fmt::Display for GestureTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified frame.
///
/// Positions are the normalized index-finger tip; the caller maps them to
/// the screen.  Scroll deltas are signed, positive when the fingers moved
/// down the frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Moving { x: f32, y: f32 },
    LeftClick,
    RightClick,
    Dragging { x: f32, y: f32 },
    DragEnd,
    Scrolling { delta: f32 },
    SwipeLeft,
    SwipeRight,
}

impl Gesture {
    pub fn tag(&self) -> GestureTag {
        match self {
            Gesture::Idle            => GestureTag::Idle,
            Gesture::Moving { .. }   => GestureTag::Moving,
            Gesture::LeftClick       => GestureTag::LeftClick,
            Gesture::RightClick      => GestureTag::RightClick,
            Gesture::Dragging { .. } => GestureTag::Dragging,
            Gesture::DragEnd         => GestureTag::DragEnd,
            Gesture::Scrolling { .. } => GestureTag::Scrolling,
            Gesture::SwipeLeft       => GestureTag::SwipeLeft,
            Gesture::SwipeRight      => GestureTag::SwipeRight,
        }
    }
}

/// Per-frame measurements kept for the debug overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DebugSnapshot {
    pub thumb_cross:    f32,
    pub thumb_middle:   f32,
    pub thumb_pinky:    f32,
    pub fingers:        FingerExtension,
    pub thumb_extended: bool,
    /// Delta of the last anchored scroll frame.
    pub scroll_dy:      f32,
}

/// Open-hand stroke being watched for a swipe.
#[derive(Debug, Clone, Copy)]
struct SwipeStroke {
    start_x:   f32,
    prev_x:    f32,
    prev_time: f64,
}

// ════════════════════════════════════════════════════════════════════════════
// GestureEngine
// ════════════════════════════════════════════════════════════════════════════

/// Stateful recogniser.  Owned by a single consumer loop.
///
/// Invariants:
/// * at most one of drag, left click, right click is produced per frame;
/// * `left_armed` / `right_armed` are false only between a click firing and
///   its release being observed.
#[derive(Debug, Clone)]
pub struct GestureEngine {
    cfg: GestureConfig,

    state:         GestureTag,
    /// `None` until the first click; any cooldown is then satisfied.
    last_click:    Option<f64>,
    last_swipe:    Option<f64>,
    scroll_anchor: Option<f32>,
    momentum:      f32,
    stroke:        Option<SwipeStroke>,
    dragging:      bool,
    left_armed:    bool,
    right_armed:   bool,

    debug: DebugSnapshot,
}

impl GestureEngine {
    pub fn new(cfg: GestureConfig) -> Self {
        GestureEngine {
            cfg,
            state:         GestureTag::Idle,
            last_click:    None,
            last_swipe:    None,
            scroll_anchor: None,
            momentum:      0.0,
            stroke:        None,
            dragging:      false,
            left_armed:    true,
            right_armed:   true,
            debug:         DebugSnapshot::default(),
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.cfg
    }

    /// Back to the freshly constructed state.  Thresholds are kept.
    pub fn reset(&mut self) {
        debug!("gesture engine reset");
        *self = GestureEngine::new(self.cfg.clone());
    }

    pub fn state(&self) -> GestureTag          { self.state }
    pub fn dragging(&self) -> bool             { self.dragging }
    pub fn momentum(&self) -> f32              { self.momentum }
    pub fn left_armed(&self) -> bool           { self.left_armed }
    pub fn right_armed(&self) -> bool          { self.right_armed }
    pub fn debug(&self) -> &DebugSnapshot      { &self.debug }

    /// Classify one frame captured at `now` (seconds, monotonic).
    pub fn update(&mut self, pose: &HandPose, now: f64) -> Gesture {
        if !pose.is_finite() {
            trace!("non-finite pose, treating as idle");
            self.state = GestureTag::Idle;
            return Gesture::Idle;
        }

        let gesture = self.classify(pose, now);
        let tag = gesture.tag();
        if tag != self.state {
            debug!(from = %self.state, to = %tag, "gesture transition");
        }
        self.state = tag;
        gesture
    }

    /// Advance scroll momentum by one tick.
    ///
    /// Returns the momentum before this tick's decay, or exactly 0 once it
    /// has fallen to `momentum_min`.
    pub fn tick_momentum(&mut self) -> f32 {
        if self.momentum.abs() > self.cfg.momentum_min {
            let delta = self.momentum;
            self.momentum *= self.cfg.momentum_decay;
            delta
        } else {
            self.momentum = 0.0;
            0.0
        }
    }

    fn cooldown_elapsed(last: Option<f64>, now: f64, cooldown: f64) -> bool {
        last.map_or(true, |t| now - t > cooldown)
    }

    fn clear_scroll(&mut self) {
        self.scroll_anchor = None;
        self.momentum = 0.0;
    }

    fn fire_click(&mut self, now: f64) {
        self.last_click = Some(now);
        self.clear_scroll();
    }

    fn classify(&mut self, pose: &HandPose, now: f64) -> Gesture {
        let thumb_tip  = pose.get(Joint::ThumbTip);
        let index_tip  = pose.get(Joint::IndexTip);
        let middle_tip = pose.get(Joint::MiddleTip);
        let pinky_tip  = pose.get(Joint::PinkyTip);

        let fingers      = FingerExtension::of(pose);
        let thumb_out    = thumb_extended(pose);
        let thumb_middle = distance_2d(thumb_tip, middle_tip);
        let thumb_pinky  = distance_2d(thumb_tip, pinky_tip);
        let thumb_cross  = thumb_tip.x - pose.get(Joint::IndexMcp).x;

        self.debug.thumb_cross    = thumb_cross;
        self.debug.thumb_middle   = thumb_middle;
        self.debug.thumb_pinky    = thumb_pinky;
        self.debug.fingers        = fingers;
        self.debug.thumb_extended = thumb_out;

        let pointer = (index_tip.x, index_tip.y);

        // ── Drag ────────────────────────────────────────────────────────────
        if self.dragging {
            if thumb_middle > self.cfg.drag_release_threshold {
                self.dragging = false;
                return Gesture::DragEnd;
            }
            return Gesture::Dragging { x: pointer.0, y: pointer.1 };
        }
        if thumb_middle < self.cfg.drag_pinch_threshold {
            self.dragging = true;
            self.clear_scroll();
            return Gesture::Dragging { x: pointer.0, y: pointer.1 };
        }

        // ── Left click: thumb crosses under the index knuckle ───────────────
        if thumb_cross > self.cfg.thumb_cross_threshold {
            if self.left_armed
                && Self::cooldown_elapsed(self.last_click, now, self.cfg.click_cooldown)
            {
                self.left_armed = false;
                self.fire_click(now);
                return Gesture::LeftClick;
            }
        } else if thumb_cross < -self.cfg.thumb_cross_release {
            self.left_armed = true;
        }

        // ── Right click: thumb-pinky pinch ──────────────────────────────────
        if thumb_pinky < self.cfg.pinch_threshold {
            if self.right_armed
                && Self::cooldown_elapsed(self.last_click, now, self.cfg.click_cooldown)
            {
                self.right_armed = false;
                self.fire_click(now);
                return Gesture::RightClick;
            }
        } else if thumb_pinky > self.cfg.pinch_release_threshold {
            self.right_armed = true;
        }

        // ── Scroll ──────────────────────────────────────────────────────────
        if fingers.index_and_middle() {
            let avg_y = (index_tip.y + middle_tip.y) / 2.0;
            return match self.scroll_anchor {
                None => {
                    self.scroll_anchor = Some(avg_y);
                    Gesture::Scrolling { delta: 0.0 }
                }
                Some(anchor) => {
                    let dy = (avg_y - anchor) * self.cfg.scroll_speed;
                    self.scroll_anchor =
                        Some(SCROLL_ANCHOR_KEEP * anchor + (1.0 - SCROLL_ANCHOR_KEEP) * avg_y);
                    self.momentum = dy;
                    self.debug.scroll_dy = dy;
                    Gesture::Scrolling { delta: dy }
                }
            };
        }
        if self.state == GestureTag::Scrolling {
            self.scroll_anchor = None;
        }

        // ── Swipe: open hand ────────────────────────────────────────────────
        if fingers.all() && thumb_out {
            let x = pose.get(Joint::Wrist).x;
            match self.stroke {
                None => {
                    self.stroke = Some(SwipeStroke { start_x: x, prev_x: x, prev_time: now });
                }
                Some(mut stroke) => {
                    let mut fired = None;
                    let dt = now - stroke.prev_time;
                    if dt > SWIPE_MIN_DT {
                        let vx = (x - stroke.prev_x) as f64 / dt;
                        let travel = (x - stroke.start_x).abs();
                        if vx.abs() > self.cfg.swipe_velocity_threshold
                            && travel > self.cfg.swipe_min_distance
                            && Self::cooldown_elapsed(self.last_swipe, now, self.cfg.swipe_cooldown)
                        {
                            stroke.start_x = x;
                            self.last_swipe = Some(now);
                            fired = Some(if vx < 0.0 { Gesture::SwipeLeft } else { Gesture::SwipeRight });
                        }
                    }
                    stroke.prev_x = x;
                    stroke.prev_time = now;
                    self.stroke = Some(stroke);
                    if let Some(swipe) = fired {
                        return swipe;
                    }
                }
            }
        } else {
            self.stroke = None;
        }

        // ── Move ────────────────────────────────────────────────────────────
        if fingers.only_index() {
            return Gesture::Moving { x: pointer.0, y: pointer.1 };
        }

        Gesture::Idle
    }
}

impl Default for GestureEngine {
    fn default() -> Self {
        GestureEngine::new(GestureConfig::default())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::Landmark;
    use crate::synth::{synth_pose, HandShape};

    fn pose(shape: HandShape) -> HandPose {
        synth_pose(shape, 0.5, 0.5)
    }

    fn tags(gestures: &[Gesture]) -> Vec<GestureTag> {
        gestures.iter().map(Gesture::tag).collect()
    }

    #[test]
    fn pointing_moves_with_index_tip() {
        let mut e = GestureEngine::default();
        let p = pose(HandShape::Point);
        let tip = p.get(Joint::IndexTip);
        assert_eq!(e.update(&p, 0.0), Gesture::Moving { x: tip.x, y: tip.y });
        assert_eq!(e.state(), GestureTag::Moving);
    }

    #[test]
    fn fist_is_idle() {
        let mut e = GestureEngine::default();
        assert_eq!(e.update(&pose(HandShape::Fist), 0.0), Gesture::Idle);
    }

    // ── clicks ──────────────────────────────────────────────────────────────

    #[test]
    fn held_thumb_cross_clicks_once() {
        let mut e = GestureEngine::default();
        let cross = pose(HandShape::ThumbCross);
        let out: Vec<_> = (0..30).map(|i| e.update(&cross, i as f64 / 30.0)).collect();
        let t = tags(&out);
        assert_eq!(t.iter().filter(|&&g| g == GestureTag::LeftClick).count(), 1);
        assert_eq!(t[0], GestureTag::LeftClick);
        // Disarmed frames fall through to pointer motion.
        assert!(t[1..].iter().all(|&g| g == GestureTag::Moving));
        assert!(!e.left_armed());
    }

    #[test]
    fn left_click_fire_release_fire() {
        let mut e = GestureEngine::default();
        assert_eq!(e.update(&pose(HandShape::ThumbCross), 0.0), Gesture::LeftClick);
        assert!(!e.left_armed());

        assert_eq!(e.update(&pose(HandShape::Point), 0.5).tag(), GestureTag::Moving);
        assert!(e.left_armed());

        assert_eq!(e.update(&pose(HandShape::ThumbCross), 1.0), Gesture::LeftClick);
    }

    #[test]
    fn release_band_does_not_rearm() {
        let mut e = GestureEngine::default();
        e.update(&pose(HandShape::ThumbCross), 0.0);

        // Thumb tip exactly on the index knuckle: cross = 0, inside the band.
        let p = pose(HandShape::Point);
        let mcp = p.get(Joint::IndexMcp);
        let on_knuckle = p.with(Joint::ThumbTip, Landmark::new(mcp.x, mcp.y + 0.08, 0.0));
        e.update(&on_knuckle, 1.0);
        assert!(!e.left_armed());
        assert_eq!(e.update(&pose(HandShape::ThumbCross), 2.0).tag(), GestureTag::Moving);
    }

    #[test]
    fn click_cooldown_is_enforced() {
        let mut e = GestureEngine::default();
        assert_eq!(e.update(&pose(HandShape::ThumbCross), 0.0), Gesture::LeftClick);
        e.update(&pose(HandShape::Point), 0.05);
        assert!(e.left_armed());
        // Re-armed but still inside the 0.25 s cooldown.
        assert_eq!(e.update(&pose(HandShape::ThumbCross), 0.1).tag(), GestureTag::Moving);
        assert!(e.left_armed());
        assert_eq!(e.update(&pose(HandShape::ThumbCross), 0.4), Gesture::LeftClick);
    }

    #[test]
    fn right_click_fire_release_fire() {
        let mut e = GestureEngine::default();
        let pinch = pose(HandShape::PinkyPinch);
        assert_eq!(e.update(&pinch, 0.0), Gesture::RightClick);
        assert!(!e.right_armed());
        assert_eq!(e.update(&pinch, 0.5).tag(), GestureTag::Moving);

        e.update(&pose(HandShape::Point), 1.0);
        assert!(e.right_armed());
        assert_eq!(e.update(&pinch, 1.5), Gesture::RightClick);
    }

    #[test]
    fn left_and_right_share_cooldown() {
        let mut e = GestureEngine::default();
        assert_eq!(e.update(&pose(HandShape::ThumbCross), 0.0), Gesture::LeftClick);
        assert_eq!(e.update(&pose(HandShape::PinkyPinch), 0.1).tag(), GestureTag::Moving);
        assert!(e.right_armed());
        assert_eq!(e.update(&pose(HandShape::PinkyPinch), 0.3), Gesture::RightClick);
    }

    // ── drag ────────────────────────────────────────────────────────────────

    #[test]
    fn drag_preempts_clicks() {
        let mut e = GestureEngine::default();
        // Thumb crossed and pinched onto both middle and pinky tips at once.
        let spot = Landmark::new(0.52, 0.52, 0.0);
        let p = pose(HandShape::Point)
            .with(Joint::ThumbTip, spot)
            .with(Joint::MiddleTip, spot)
            .with(Joint::PinkyTip, spot);
        assert!(p.get(Joint::ThumbTip).x - p.get(Joint::IndexMcp).x > 0.02);

        for i in 0..5 {
            assert_eq!(e.update(&p, i as f64 * 0.1).tag(), GestureTag::Dragging);
        }
        assert!(e.dragging());
        assert!(e.left_armed() && e.right_armed());

        assert_eq!(e.update(&pose(HandShape::OpenPalm), 1.0), Gesture::DragEnd);
        assert!(!e.dragging());
    }

    #[test]
    fn drag_follows_index_tip_until_release() {
        let mut e = GestureEngine::default();
        let a = synth_pose(HandShape::DragPinch, 0.3, 0.4);
        let b = synth_pose(HandShape::DragPinch, 0.6, 0.7);
        let tip = b.get(Joint::IndexTip);
        assert_eq!(e.update(&a, 0.0).tag(), GestureTag::Dragging);
        assert_eq!(e.update(&b, 0.1), Gesture::Dragging { x: tip.x, y: tip.y });

        // Inside the hysteresis band (0.045..0.07) the drag holds.
        let m = b.get(Joint::MiddleTip);
        let loose = b.with(Joint::ThumbTip, Landmark::new(m.x - 0.05, m.y, 0.0));
        assert_eq!(e.update(&loose, 0.2).tag(), GestureTag::Dragging);

        assert_eq!(e.update(&pose(HandShape::Point), 0.3), Gesture::DragEnd);
        assert_eq!(e.update(&pose(HandShape::Point), 0.4).tag(), GestureTag::Moving);
    }

    #[test]
    fn drag_survives_malformed_frame() {
        let mut e = GestureEngine::default();
        e.update(&pose(HandShape::DragPinch), 0.0);
        let bad = pose(HandShape::DragPinch).with(Joint::Wrist, Landmark::new(f32::NAN, 0.5, 0.0));
        assert_eq!(e.update(&bad, 0.1), Gesture::Idle);
        assert_eq!(e.state(), GestureTag::Idle);
        assert!(e.dragging());
        assert_eq!(e.update(&pose(HandShape::DragPinch), 0.2).tag(), GestureTag::Dragging);
    }

    #[test]
    fn drag_start_clears_scroll_momentum() {
        let mut e = GestureEngine::default();
        e.update(&synth_pose(HandShape::TwoFinger, 0.5, 0.50), 0.0);
        e.update(&synth_pose(HandShape::TwoFinger, 0.5, 0.52), 0.1);
        assert!(e.momentum() > 0.0);
        e.update(&pose(HandShape::DragPinch), 0.2);
        assert_eq!(e.momentum(), 0.0);
        assert_eq!(e.tick_momentum(), 0.0);
    }

    // ── scroll ──────────────────────────────────────────────────────────────

    #[test]
    fn scroll_anchor_and_delta() {
        let mut e = GestureEngine::default();
        assert_eq!(
            e.update(&synth_pose(HandShape::TwoFinger, 0.5, 0.50), 0.0),
            Gesture::Scrolling { delta: 0.0 }
        );
        match e.update(&synth_pose(HandShape::TwoFinger, 0.5, 0.52), 0.1) {
            Gesture::Scrolling { delta } => assert!((delta - 0.1).abs() < 1e-5, "delta {}", delta),
            other => panic!("expected scroll, got {:?}", other),
        }
        assert!((e.momentum() - 0.1).abs() < 1e-5);
        assert!((e.debug().scroll_dy - 0.1).abs() < 1e-5);

        // Anchor moved 30 % of the way: holding still yields 0.7 of the step.
        match e.update(&synth_pose(HandShape::TwoFinger, 0.5, 0.52), 0.2) {
            Gesture::Scrolling { delta } => assert!((delta - 0.07).abs() < 1e-5, "delta {}", delta),
            other => panic!("expected scroll, got {:?}", other),
        }
        // Momentum is replaced, not accumulated.
        assert!((e.momentum() - 0.07).abs() < 1e-5);
    }

    #[test]
    fn breaking_scroll_shape_clears_anchor() {
        let mut e = GestureEngine::default();
        e.update(&synth_pose(HandShape::TwoFinger, 0.5, 0.50), 0.0);
        e.update(&synth_pose(HandShape::TwoFinger, 0.5, 0.52), 0.1);
        assert_eq!(e.update(&pose(HandShape::Fist), 0.2), Gesture::Idle);
        // New anchor: first frame back is a zero delta even far from the old one.
        assert_eq!(
            e.update(&synth_pose(HandShape::TwoFinger, 0.5, 0.8), 0.3),
            Gesture::Scrolling { delta: 0.0 }
        );
    }

    // ── swipe ───────────────────────────────────────────────────────────────

    fn palm(cx: f32) -> HandPose {
        synth_pose(HandShape::OpenPalm, cx, 0.5)
    }

    #[test]
    fn fast_long_stroke_swipes() {
        let mut e = GestureEngine::default();
        assert_eq!(e.update(&palm(0.50), 0.00), Gesture::Idle);
        // 1.0 /s is below the velocity gate.
        assert_eq!(e.update(&palm(0.45), 0.05), Gesture::Idle);
        assert_eq!(e.update(&palm(0.38), 0.10), Gesture::SwipeLeft);
    }

    #[test]
    fn fast_but_short_stroke_does_not_swipe() {
        let mut e = GestureEngine::default();
        e.update(&palm(0.50), 0.0);
        // vx = 2.0 but travel only 0.05.
        assert_eq!(e.update(&palm(0.55), 0.025), Gesture::Idle);
    }

    #[test]
    fn slow_drift_does_not_swipe() {
        let mut e = GestureEngine::default();
        for i in 0..=40 {
            let t = i as f64 * 0.05;
            let g = e.update(&palm(0.3 + 0.01 * i as f32), t);
            assert_eq!(g, Gesture::Idle, "frame {}", i);
        }
    }

    #[test]
    fn swipe_cooldown_and_opposite_reswipe() {
        let mut e = GestureEngine::default();
        e.update(&palm(0.50), 0.00);
        e.update(&palm(0.45), 0.05);
        assert_eq!(e.update(&palm(0.38), 0.10), Gesture::SwipeLeft);

        // Fast and long enough, but inside the 0.5 s cooldown.
        assert_eq!(e.update(&palm(0.28), 0.15), Gesture::Idle);

        // Back the other way without ever closing the hand.
        assert_eq!(e.update(&palm(0.30), 0.70), Gesture::Idle);
        assert_eq!(e.update(&palm(0.50), 0.75), Gesture::SwipeRight);
    }

    #[test]
    fn close_frames_are_ignored_for_velocity() {
        let mut e = GestureEngine::default();
        e.update(&palm(0.50), 0.000);
        // Huge jump 4 ms later: dt below the spike guard, no sample.
        assert_eq!(e.update(&palm(0.30), 0.004), Gesture::Idle);
    }

    #[test]
    fn breaking_open_hand_resets_stroke() {
        let mut e = GestureEngine::default();
        e.update(&palm(0.50), 0.00);
        e.update(&palm(0.45), 0.05);
        e.update(&pose(HandShape::Fist), 0.07);
        // Stroke restarts at 0.38, so the fast frame has no travel behind it.
        assert_eq!(e.update(&palm(0.38), 0.10), Gesture::Idle);
        assert_eq!(e.update(&palm(0.33), 0.13), Gesture::Idle);
    }

    // ── momentum ────────────────────────────────────────────────────────────

    #[test]
    fn momentum_decays_to_exact_zero() {
        let mut e = GestureEngine::default();
        e.momentum = 1.0;
        let deltas: Vec<f32> = (0..40).map(|_| e.tick_momentum()).collect();
        assert_eq!(deltas[0], 1.0);
        assert!((deltas[1] - 0.85).abs() < 1e-6);
        let positive = deltas.iter().take_while(|&&d| d > 0.0).count();
        assert_eq!(positive, 29);
        assert!(deltas[29..].iter().all(|&d| d == 0.0));
        assert_eq!(e.momentum(), 0.0);
    }

    #[test]
    fn negative_momentum_decays_too() {
        let mut e = GestureEngine::default();
        e.update(&synth_pose(HandShape::TwoFinger, 0.5, 0.50), 0.0);
        e.update(&synth_pose(HandShape::TwoFinger, 0.5, 0.46), 0.1);
        let first = e.tick_momentum();
        assert!(first < -0.19 && first > -0.21, "first {}", first);
        assert!(e.tick_momentum() > first);
    }

    // ── misc ────────────────────────────────────────────────────────────────

    #[test]
    fn malformed_pose_touches_nothing_else() {
        let mut e = GestureEngine::default();
        e.update(&pose(HandShape::ThumbCross), 0.0);
        let before = *e.debug();
        let bad = pose(HandShape::Point).with(Joint::IndexTip, Landmark::new(0.5, f32::INFINITY, 0.0));
        assert_eq!(e.update(&bad, 0.1), Gesture::Idle);
        assert_eq!(*e.debug(), before);
        assert!(!e.left_armed());
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut e = GestureEngine::default();
        assert_eq!(e.update(&pose(HandShape::PinkyPinch), 0.0), Gesture::RightClick);
        assert_eq!(e.update(&pose(HandShape::ThumbCross), 1.0), Gesture::LeftClick);
        e.update(&pose(HandShape::DragPinch), 2.0);
        assert!(e.dragging() && !e.left_armed() && !e.right_armed());

        e.reset();
        assert!(!e.dragging());
        assert!(e.left_armed() && e.right_armed());
        assert_eq!(e.state(), GestureTag::Idle);
        assert_eq!(e.momentum(), 0.0);
        // Cooldown history is gone too.
        assert_eq!(e.update(&pose(HandShape::ThumbCross), 2.01), Gesture::LeftClick);
    }

    #[test]
    fn at_most_one_press_gesture_per_frame() {
        let mut e = GestureEngine::default();
        let shapes = [
            HandShape::ThumbCross, HandShape::PinkyPinch, HandShape::DragPinch,
            HandShape::Point, HandShape::OpenPalm, HandShape::TwoFinger, HandShape::Fist,
        ];
        for (i, s) in shapes.iter().cycle().take(70).enumerate() {
            let g = e.update(&pose(*s), i as f64 * 0.13);
            if matches!(g, Gesture::LeftClick | Gesture::RightClick) {
                assert!(!e.dragging());
            }
        }
    }
}
