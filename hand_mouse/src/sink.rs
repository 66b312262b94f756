//! Pointer output: where recognised gestures turn into mouse activity.
//!
//! The controller talks to a [`PointerSink`]; it never knows whether the
//! actions reach the OS, a log, or a test buffer.

use tracing::{debug, info};

// ════════════════════════════════════════════════════════════════════════════
// PointerSink: abstraction over OS injection / log / recording
// ════════════════════════════════════════════════════════════════════════════

/// Receiver of pointer actions.  Coordinates are absolute screen pixels.
pub trait PointerSink {
    fn move_to(&mut self, x: f64, y: f64);
    /// Move with the left button held.  The first call of a drag presses.
    fn drag_move(&mut self, x: f64, y: f64);
    /// Release the drag button, if a drag pressed it.
    fn drag_end(&mut self);
    fn left_click(&mut self);
    fn right_click(&mut self);
    /// Vertical scroll; positive when the fingers moved down the frame.
    fn scroll(&mut self, delta: f32);
    fn swipe_back(&mut self);
    fn swipe_forward(&mut self);
}

impl<S: PointerSink + ?Sized> PointerSink for Box<S> {
    fn move_to(&mut self, x: f64, y: f64)   { (**self).move_to(x, y) }
    fn drag_move(&mut self, x: f64, y: f64) { (**self).drag_move(x, y) }
    fn drag_end(&mut self)                  { (**self).drag_end() }
    fn left_click(&mut self)                { (**self).left_click() }
    fn right_click(&mut self)               { (**self).right_click() }
    fn scroll(&mut self, delta: f32)        { (**self).scroll(delta) }
    fn swipe_back(&mut self)                { (**self).swipe_back() }
    fn swipe_forward(&mut self)             { (**self).swipe_forward() }
}

/// One sink call, as recorded by [`RecordingSink`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    Move { x: f64, y: f64 },
    DragMove { x: f64, y: f64 },
    DragEnd,
    LeftClick,
    RightClick,
    Scroll(f32),
    SwipeBack,
    SwipeForward,
}

// ── log backend (dry run) ─────────────────────────────────────────────────

/// Logs every action and injects nothing.
#[derive(Debug, Default)]
pub struct LogSink {
    dragging: bool,
}

impl PointerSink for LogSink {
    fn move_to(&mut self, x: f64, y: f64) {
        debug!(x, y, "move");
    }
    fn drag_move(&mut self, x: f64, y: f64) {
        if !self.dragging {
            self.dragging = true;
            info!(x, y, "drag start");
        } else {
            debug!(x, y, "drag");
        }
    }
    fn drag_end(&mut self) {
        if self.dragging {
            self.dragging = false;
            info!("drag end");
        }
    }
    fn left_click(&mut self)          { info!("left click"); }
    fn right_click(&mut self)         { info!("right click"); }
    fn scroll(&mut self, delta: f32)  { debug!(delta, "scroll"); }
    fn swipe_back(&mut self)          { info!("swipe back"); }
    fn swipe_forward(&mut self)       { info!("swipe forward"); }
}

// ── recording backend ─────────────────────────────────────────────────────

/// Keeps every action in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub actions: Vec<PointerAction>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return and forget everything recorded so far.
    pub fn drain(&mut self) -> Vec<PointerAction> {
        std::mem::take(&mut self.actions)
    }
}

impl PointerSink for RecordingSink {
    fn move_to(&mut self, x: f64, y: f64)   { self.actions.push(PointerAction::Move { x, y }); }
    fn drag_move(&mut self, x: f64, y: f64) { self.actions.push(PointerAction::DragMove { x, y }); }
    fn drag_end(&mut self)                  { self.actions.push(PointerAction::DragEnd); }
    fn left_click(&mut self)                { self.actions.push(PointerAction::LeftClick); }
    fn right_click(&mut self)               { self.actions.push(PointerAction::RightClick); }
    fn scroll(&mut self, delta: f32)        { self.actions.push(PointerAction::Scroll(delta)); }
    fn swipe_back(&mut self)                { self.actions.push(PointerAction::SwipeBack); }
    fn swipe_forward(&mut self)             { self.actions.push(PointerAction::SwipeForward); }
}

// ── rdev backend (feature = "rdev") ───────────────────────────────────────

/// Wheel units per unit of scroll delta.
pub const WHEEL_UNITS_PER_DELTA: f32 = 10.0;

/// Convert a scroll delta to wheel notches; fingers moving down scroll the
/// content up.
pub fn wheel_units(delta: f32) -> i64 {
    (-delta * WHEEL_UNITS_PER_DELTA) as i64
}

/// Real pointer injection through `rdev::simulate`.
#[cfg(feature = "rdev")]
#[derive(Debug, Default)]
pub struct RdevSink {
    dragging: bool,
}

#[cfg(feature = "rdev")]
impl RdevSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn send(&self, event: rdev::EventType) {
        if let Err(e) = rdev::simulate(&event) {
            tracing::warn!("could not inject {:?}: {:?}", event, e);
        }
    }

    fn click(&self, button: rdev::Button) {
        self.send(rdev::EventType::ButtonPress(button));
        self.send(rdev::EventType::ButtonRelease(button));
    }

    fn chord(&self, key: rdev::Key) {
        use rdev::{EventType, Key};
        self.send(EventType::KeyPress(Key::MetaLeft));
        self.send(EventType::KeyPress(key));
        self.send(EventType::KeyRelease(key));
        self.send(EventType::KeyRelease(Key::MetaLeft));
    }
}

#[cfg(feature = "rdev")]
impl PointerSink for RdevSink {
    fn move_to(&mut self, x: f64, y: f64) {
        self.send(rdev::EventType::MouseMove { x, y });
    }

    fn drag_move(&mut self, x: f64, y: f64) {
        self.send(rdev::EventType::MouseMove { x, y });
        if !self.dragging {
            self.send(rdev::EventType::ButtonPress(rdev::Button::Left));
            self.dragging = true;
        }
    }

    fn drag_end(&mut self) {
        if self.dragging {
            self.send(rdev::EventType::ButtonRelease(rdev::Button::Left));
            self.dragging = false;
        }
    }

    fn left_click(&mut self)  { self.click(rdev::Button::Left); }
    fn right_click(&mut self) { self.click(rdev::Button::Right); }

    fn scroll(&mut self, delta: f32) {
        let units = wheel_units(delta);
        if units != 0 {
            self.send(rdev::EventType::Wheel { delta_x: 0, delta_y: units });
        }
    }

    fn swipe_back(&mut self)    { self.chord(rdev::Key::LeftBracket); }
    fn swipe_forward(&mut self) { self.chord(rdev::Key::RightBracket); }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_keeps_order() {
        let mut sink = RecordingSink::new();
        sink.move_to(1.0, 2.0);
        sink.left_click();
        sink.scroll(-0.5);
        assert_eq!(
            sink.drain(),
            vec![
                PointerAction::Move { x: 1.0, y: 2.0 },
                PointerAction::LeftClick,
                PointerAction::Scroll(-0.5),
            ]
        );
        assert!(sink.actions.is_empty());
    }

    #[test]
    fn boxed_sink_forwards() {
        let mut boxed: Box<RecordingSink> = Box::new(RecordingSink::new());
        boxed.swipe_back();
        boxed.drag_end();
        assert_eq!(boxed.actions, vec![PointerAction::SwipeBack, PointerAction::DragEnd]);
    }

    #[test]
    fn log_sink_tracks_drag_press() {
        let mut sink = LogSink::default();
        sink.drag_end();
        assert!(!sink.dragging);
        sink.drag_move(10.0, 10.0);
        sink.drag_move(12.0, 10.0);
        assert!(sink.dragging);
        sink.drag_end();
        assert!(!sink.dragging);
    }

    #[test]
    fn wheel_units_invert_and_truncate() {
        assert_eq!(wheel_units(0.1), -1);
        assert_eq!(wheel_units(-0.35), 3);
        assert_eq!(wheel_units(0.05), 0);
        assert_eq!(wheel_units(0.0), 0);
    }
}
