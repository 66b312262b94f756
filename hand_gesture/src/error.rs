//! Error types for the few fallible boundaries of the crate.
//!
//! Gesture recognition itself never fails: bad frames degrade to
//! [`Gesture::Idle`](crate::Gesture::Idle).  Errors only arise when a pose is
//! assembled from foreign data or when tuning values are loaded.

use thiserror::Error;

/// Building a [`HandPose`](crate::HandPose) from raw tracker output failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PoseError {
    /// The tracker delivered the wrong number of points.
    #[error("expected {expected} hand landmarks, got {got}")]
    WrongLength { expected: usize, got: usize },
}

/// A tuning value is outside the range the recogniser can work with.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Value must be strictly positive.
    #[error("{field} must be > 0 (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    /// Value must lie inside a half-open or closed range.
    #[error("{field} must be in {range} (got {value})")]
    OutOfRange {
        field: &'static str,
        range: &'static str,
        value: f64,
    },

    /// A release threshold does not sit on the far side of its fire threshold.
    #[error("{release} ({release_value}) must be {relation} {fire} ({fire_value})")]
    Hysteresis {
        fire: &'static str,
        fire_value: f64,
        release: &'static str,
        release_value: f64,
        relation: &'static str,
    },
}
