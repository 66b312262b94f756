//! Tunable thresholds for recognition, smoothing and screen mapping.
//!
//! Every field has a default that works for a webcam at arm's length.  All
//! three structs deserialize with `#[serde(default)]`, so a config file only
//! needs to name the values it changes.  Call `validate()` after loading.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ════════════════════════════════════════════════════════════════════════════
// GestureConfig
// ════════════════════════════════════════════════════════════════════════════

/// Thresholds of the gesture state machine.
///
/// Distances are in normalized frame units, times in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Thumb↔pinky distance that fires a right click.
    pub pinch_threshold: f32,
    /// Thumb↔pinky distance that re-arms the right click.
    pub pinch_release_threshold: f32,

    /// `thumbTip.x - indexMcp.x` above this fires a left click.
    pub thumb_cross_threshold: f32,
    /// Left click re-arms once the cross falls below minus this.
    pub thumb_cross_release: f32,

    /// Thumb↔middle distance that starts a drag.
    pub drag_pinch_threshold: f32,
    /// Thumb↔middle distance that ends a drag.
    pub drag_release_threshold: f32,

    /// Minimum time between any two clicks (left and right share it).
    pub click_cooldown: f64,
    /// Minimum time between swipes.
    pub swipe_cooldown: f64,

    /// Multiplier from finger travel to scroll delta.
    pub scroll_speed: f32,
    /// Per-tick momentum multiplier, in (0, 1).
    pub momentum_decay: f32,
    /// Momentum at or below this magnitude snaps to zero.
    pub momentum_min: f32,

    /// Wrist speed (frame widths per second) a swipe must exceed.
    pub swipe_velocity_threshold: f64,
    /// Wrist travel since the stroke started that a swipe must exceed.
    pub swipe_min_distance: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            pinch_threshold:          0.045,
            pinch_release_threshold:  0.06,
            thumb_cross_threshold:    0.02,
            thumb_cross_release:      0.01,
            drag_pinch_threshold:     0.045,
            drag_release_threshold:   0.07,
            click_cooldown:           0.25,
            swipe_cooldown:           0.5,
            scroll_speed:             5.0,
            momentum_decay:           0.85,
            momentum_min:             0.01,
            swipe_velocity_threshold: 1.2,
            swipe_min_distance:       0.08,
        }
    }
}

impl GestureConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("gesture.pinch_threshold", self.pinch_threshold as f64)?;
        positive("gesture.drag_pinch_threshold", self.drag_pinch_threshold as f64)?;
        positive("gesture.scroll_speed", self.scroll_speed as f64)?;
        positive("gesture.momentum_min", self.momentum_min as f64)?;
        positive("gesture.swipe_velocity_threshold", self.swipe_velocity_threshold)?;

        non_negative("gesture.thumb_cross_threshold", self.thumb_cross_threshold as f64)?;
        non_negative("gesture.thumb_cross_release", self.thumb_cross_release as f64)?;
        non_negative("gesture.click_cooldown", self.click_cooldown)?;
        non_negative("gesture.swipe_cooldown", self.swipe_cooldown)?;
        non_negative("gesture.swipe_min_distance", self.swipe_min_distance as f64)?;

        if !(self.momentum_decay > 0.0 && self.momentum_decay < 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "gesture.momentum_decay",
                range: "(0, 1)",
                value: self.momentum_decay as f64,
            });
        }

        if self.pinch_release_threshold <= self.pinch_threshold {
            return Err(ConfigError::Hysteresis {
                fire:          "gesture.pinch_threshold",
                fire_value:    self.pinch_threshold as f64,
                release:       "gesture.pinch_release_threshold",
                release_value: self.pinch_release_threshold as f64,
                relation:      "greater than",
            });
        }
        if self.drag_release_threshold <= self.drag_pinch_threshold {
            return Err(ConfigError::Hysteresis {
                fire:          "gesture.drag_pinch_threshold",
                fire_value:    self.drag_pinch_threshold as f64,
                release:       "gesture.drag_release_threshold",
                release_value: self.drag_release_threshold as f64,
                relation:      "greater than",
            });
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FilterConfig
// ════════════════════════════════════════════════════════════════════════════

/// One Euro filter parameters, shared by the x and y channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub min_cutoff: f64,
    pub beta:       f64,
    pub d_cutoff:   f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig { min_cutoff: 1.0, beta: 0.007, d_cutoff: 1.0 }
    }
}

impl FilterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("filter.min_cutoff", self.min_cutoff)?;
        positive("filter.d_cutoff", self.d_cutoff)?;
        non_negative("filter.beta", self.beta)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MappingConfig
// ════════════════════════════════════════════════════════════════════════════

/// Frame-to-screen mapping: the outer margin of the camera frame is dead
/// space so the cursor can reach the screen edges without the hand leaving
/// the frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    pub margin_x:      f64,
    pub margin_y:      f64,
    pub screen_width:  f64,
    pub screen_height: f64,
}

impl Default for MappingConfig {
    fn default() -> Self {
        MappingConfig {
            margin_x:      0.1,
            margin_y:      0.1,
            screen_width:  1920.0,
            screen_height: 1080.0,
        }
    }
}

impl MappingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        margin("mapping.margin_x", self.margin_x)?;
        margin("mapping.margin_y", self.margin_y)?;
        positive("mapping.screen_width", self.screen_width)?;
        positive("mapping.screen_height", self.screen_height)
    }
}

// ── helpers ─────────────────────────────────────────────────────────────────

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, range: "[0, ∞)", value })
    }
}

fn margin(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..0.5).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, range: "[0, 0.5)", value })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
