//! Session control: the command channel into the consumer loop, the
//! session clock every timestamp is read from, and Ctrl+C handling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::info;

/// Commands from the control surface (window keys / hotkey) to the loop.
///
/// This channel is the only way another thread can affect a running
/// session; the loop drains it once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Flip between active and paused.  Resuming resets the recogniser and
    /// both cursor filters.
    Toggle,
    /// Reset the recogniser and filters without changing activity.
    Reset,
    /// Stop the session.
    Quit,
}

/// Monotonic seconds since session start.
///
/// `Copy`, so producer threads can carry their own handle and still agree
/// with the consumer on the time base.
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    start: Instant,
}

impl SessionClock {
    pub fn start() -> Self {
        SessionClock { start: Instant::now() }
    }

    pub fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::start()
    }
}

/// Handler that clears `running`, ending the loop and the source thread.
pub fn stop_on_interrupt(running: &Arc<AtomicBool>) -> impl Fn() + Send + 'static {
    let running = Arc::clone(running);
    move || {
        info!("Interrupted, shutting down");
        running.store(false, Ordering::Relaxed);
    }
}

/// Route SIGINT / Ctrl+C into `running`.  Only one handler per process.
pub fn install_interrupt_handler(running: &Arc<AtomicBool>) -> Result<()> {
    ctrlc::set_handler(stop_on_interrupt(running)).context("Failed to install Ctrl+C handler")
}
