//! # hand_mouse
//!
//! Hand-tracking pointer controller.  A pose source thread publishes hand
//! landmarks into a depth-1 [`slot::FrameSlot`]; the main loop takes the
//! newest frame, runs it through the `hand_gesture` recogniser and drives a
//! [`sink::PointerSink`].
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Action |
//! |---|---|
//! | Index finger only | Move the pointer (mapped, then One-Euro smoothed) |
//! | Thumb crosses under the index knuckle | Left click |
//! | Thumb touches pinky | Right click |
//! | Thumb touches middle, held | Drag with the left button |
//! | Index + middle up, moved vertically | Scroll, coasting after release |
//! | Open hand, fast stroke left / right | Back (Cmd+[) / forward (Cmd+]) |
//!
//! ## Feature flags
//!
//! * (default): **Simulation mode**: the debug window's cursor and keys
//!   drive a synthetic hand; pointer actions are logged.
//! * `leap`: **Hardware mode**: polls a real LeapMotion controller via LeapC.
//! * `rdev`: inject real pointer and key events, and size the mapping to
//!   the primary display.
//!
//! ### Window keys
//!
//! | Key | Effect |
//! |---|---|
//! | `Ctrl+Shift+H` | Toggle tracking on/off |
//! | `Backspace` | Reset recogniser and filters |
//! | `Q` / `Escape` | Quit |
//! | `F` (hold) | Fist |
//! | `2` (hold) | Two fingers (scroll) |
//! | `O` (hold) | Open palm (swipe) |
//! | `C` (hold) | Thumb cross (left click) |
//! | `X` (hold) | Pinky pinch (right click) |
//! | `G` (hold) | Middle pinch (drag) |

pub mod app;
pub mod config;
pub mod control;
pub mod sink;
pub mod slot;
pub mod source;
pub mod visualizer;
