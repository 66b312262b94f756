//! Normalized frame position → absolute screen pixels.

use crate::config::MappingConfig;

/// Linear map from the live area of the camera frame onto the screen.
///
/// The live area is the frame minus `margin_x`/`margin_y` on every side;
/// positions in the margin clamp to the nearest screen edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    margin_x:      f64,
    margin_y:      f64,
    screen_width:  f64,
    screen_height: f64,
}

impl CoordinateMapper {
    pub fn new(margin_x: f64, margin_y: f64, screen_width: f64, screen_height: f64) -> Self {
        CoordinateMapper { margin_x, margin_y, screen_width, screen_height }
    }

    pub fn from_config(cfg: &MappingConfig) -> Self {
        Self::new(cfg.margin_x, cfg.margin_y, cfg.screen_width, cfg.screen_height)
    }

    pub fn screen_size(&self) -> (f64, f64) {
        (self.screen_width, self.screen_height)
    }

    pub fn map(&self, nx: f64, ny: f64) -> (f64, f64) {
        (
            Self::axis(nx, self.margin_x) * self.screen_width,
            Self::axis(ny, self.margin_y) * self.screen_height,
        )
    }

    fn axis(n: f64, margin: f64) -> f64 {
        ((n - margin) / (1.0 - 2.0 * margin)).clamp(0.0, 1.0)
    }
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self::from_config(&MappingConfig::default())
    }
}
