//! # hand_gesture
//!
//! Turn a per-frame stream of 21-point hand poses into pointer gestures:
//! move, click, drag, scroll and swipe.
//!
//! No I/O happens here.  A caller owns one [`GestureEngine`], one
//! [`OneEuroFilter2D`] and one [`CoordinateMapper`] per session and drives
//! them from a single loop.
//!
//! ## Gesture → Action mapping
//!
//! | Hand shape | Gesture | Typical action |
//! |---|---|---|
//! | Index finger only | `Moving { x, y }` | Move the pointer |
//! | Thumb tip crosses under the index knuckle | `LeftClick` | Left click |
//! | Thumb tip touches pinky tip | `RightClick` | Right click |
//! | Thumb tip touches middle tip, held | `Dragging { x, y }` → `DragEnd` | Press, drag, release |
//! | Index + middle up, moved vertically | `Scrolling { delta }` | Wheel, with momentum |
//! | Open hand, fast sideways stroke | `SwipeLeft` / `SwipeRight` | Back / forward |
//!
//! ## Quick start
//!
//! ```rust
//! use hand_gesture::{synth_pose, CoordinateMapper, Gesture, GestureEngine, HandShape};
//!
//! let mut engine = GestureEngine::default();
//! let mapper = CoordinateMapper::new(0.1, 0.1, 1000.0, 800.0);
//!
//! let pose = synth_pose(HandShape::Point, 0.5, 0.6);
//! if let Gesture::Moving { x, y } = engine.update(&pose, 0.0) {
//!     let (sx, sy) = mapper.map(x as f64, y as f64);
//!     assert!(sx > 0.0 && sy > 0.0);
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod landmark;
pub mod mapper;
pub mod synth;

pub use config::{FilterConfig, GestureConfig, MappingConfig};
pub use engine::{DebugSnapshot, Gesture, GestureEngine, GestureTag};
pub use error::{ConfigError, PoseError};
pub use filter::{OneEuroFilter, OneEuroFilter2D};
pub use landmark::{
    distance_2d, distance_3d, finger_extended, thumb_extended, FingerExtension, HandPose, Joint,
    Landmark, HAND_SKELETON, LANDMARK_COUNT,
};
pub use mapper::CoordinateMapper;
pub use synth::{synth_pose, HandShape};

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
