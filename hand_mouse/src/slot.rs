//! Depth-1 overwrite-on-push frame hand-off.
//!
//! The tracker thread pushes every frame; the consumer takes whatever is
//! newest.  An undrained frame is replaced, never queued: a stale hand
//! position is worse than a dropped one.

use std::sync::Mutex;

use hand_gesture::HandPose;

/// One tracker result.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// `None` when the tracker saw no hand.
    pub pose: Option<HandPose>,
    /// Session-clock seconds at capture.
    pub captured_at: f64,
}

#[derive(Debug)]
struct SlotInner<T> {
    value:   Option<T>,
    pushed:  u64,
    dropped: u64,
}

/// Single-value mailbox shared between one producer and one consumer.
#[derive(Debug)]
pub struct FrameSlot<T = Frame> {
    inner: Mutex<SlotInner<T>>,
}

impl<T> FrameSlot<T> {
    pub fn new() -> Self {
        FrameSlot {
            inner: Mutex::new(SlotInner { value: None, pushed: 0, dropped: 0 }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SlotInner<T>> {
        // A panicked producer leaves the slot readable.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store `value`, replacing any undrained one.  Returns true when a
    /// frame was overwritten.
    pub fn push(&self, value: T) -> bool {
        let mut inner = self.lock();
        inner.pushed += 1;
        let overwrote = inner.value.replace(value).is_some();
        if overwrote {
            inner.dropped += 1;
        }
        overwrote
    }

    /// Take the newest frame, leaving the slot empty.
    pub fn take(&self) -> Option<T> {
        self.lock().value.take()
    }

    pub fn pushed(&self) -> u64 {
        self.lock().pushed
    }

    /// Frames overwritten before the consumer saw them.
    pub fn dropped(&self) -> u64 {
        self.lock().dropped
    }
}

impl<T> Default for FrameSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
