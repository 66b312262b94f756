//! Application configuration.
//!
//! One TOML file with a section per concern.  Every section and field is
//! optional; missing ones take their defaults.
//!
//! ```toml
//! [tracker]
//! source = "sim"
//!
//! [session]
//! frame_rate = 60
//!
//! [gesture]
//! click_cooldown = 0.3
//!
//! [mapping]
//! margin_x = 0.15
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use hand_gesture::{FilterConfig, GestureConfig, MappingConfig};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Where poses come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Hand synthesized from the debug window's cursor and keys.
    #[default]
    Sim,
    /// LeapMotion controller (needs the `leap` feature).
    Leap,
}

/// Hand tracker settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub source:        SourceKind,
    /// Size of the tracker frame shown in the debug window.
    pub camera_width:  usize,
    pub camera_height: usize,
    /// Rate at which the simulation source publishes poses.
    pub sim_fps:       u32,
    /// Hands tracked with less confidence than this count as no hand.
    pub min_confidence: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            source:        SourceKind::Sim,
            camera_width:  640,
            camera_height: 480,
            sim_fps:       30,
            min_confidence: 0.7,
        }
    }
}

/// Consumer-loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Consumer ticks per second.
    pub frame_rate:    u32,
    /// Draw the hand skeleton and measurements in the debug window.
    pub debug_overlay: bool,
    /// Start tracking immediately rather than paused.
    pub start_active:  bool,
    /// Log pointer actions instead of injecting them.
    pub dry_run:       bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            frame_rate:    60,
            debug_overlay: true,
            start_active:  true,
            dry_run:       false,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub filter:  FilterConfig,
    #[serde(default)]
    pub mapping: MappingConfig,
}

impl AppConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: AppConfig = toml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Config file {} not found, using defaults", path.display());
            return Ok(AppConfig::default());
        }
        AppConfig::load(path)
    }

    pub fn validate(&self) -> Result<()> {
        self.gesture.validate().context("Invalid [gesture] section")?;
        self.filter.validate().context("Invalid [filter] section")?;
        self.mapping.validate().context("Invalid [mapping] section")?;

        if self.session.frame_rate == 0 {
            anyhow::bail!("session.frame_rate must be > 0");
        }
        if self.tracker.sim_fps == 0 {
            anyhow::bail!("tracker.sim_fps must be > 0");
        }
        if !(0.0..=1.0).contains(&self.tracker.min_confidence) {
            anyhow::bail!(
                "tracker.min_confidence must be in [0, 1] (got {})",
                self.tracker.min_confidence
            );
        }
        if self.tracker.camera_width == 0 || self.tracker.camera_height == 0 {
            anyhow::bail!(
                "tracker camera size must be non-zero (got {}x{})",
                self.tracker.camera_width,
                self.tracker.camera_height
            );
        }
        Ok(())
    }

    /// Apply command-line overrides.
    pub fn with_overrides(
        mut self,
        source: Option<SourceKind>,
        screen_width: Option<f64>,
        screen_height: Option<f64>,
        paused: bool,
        dry_run: bool,
    ) -> Self {
        if let Some(s) = source {
            self.tracker.source = s;
        }
        if let Some(w) = screen_width {
            self.mapping.screen_width = w;
        }
        if let Some(h) = screen_height {
            self.mapping.screen_height = h;
        }
        if paused {
            self.session.start_active = false;
        }
        self.session.dry_run |= dry_run;
        self
    }

    /// Replace the configured screen size with the primary display's.
    #[cfg(feature = "rdev")]
    pub fn detect_screen_size(&mut self) {
        match rdev::display_size() {
            Ok((w, h)) => {
                self.mapping.screen_width = w as f64;
                self.mapping.screen_height = h as f64;
            }
            Err(e) => warn!("Could not query display size: {:?}, keeping configured size", e),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("hand_mouse.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn default_config_is_valid() {
        AppConfig::default().validate().unwrap();
    }

    #[test]
    fn file_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut cfg = AppConfig::default();
        cfg.gesture.scroll_speed = 7.5;
        cfg.mapping.margin_x = 0.2;
        cfg.session.debug_overlay = false;
        let path = write(&dir, &toml::to_string(&cfg).unwrap());

        assert_eq!(AppConfig::load(&path).unwrap(), cfg);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "[tracker]\nsource = \"leap\"\n\n[gesture]\nclick_cooldown = 0.4\n",
        );
        let cfg = AppConfig::load(&path).unwrap();
        assert_eq!(cfg.tracker.source, SourceKind::Leap);
        assert_eq!(cfg.tracker.camera_width, 640);
        assert_eq!(cfg.tracker.min_confidence, 0.7);
        assert_eq!(cfg.gesture.click_cooldown, 0.4);
        assert_eq!(cfg.gesture.swipe_cooldown, 0.5);
        assert_eq!(cfg.filter, FilterConfig::default());
        assert_eq!(cfg.session.frame_rate, 60);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(AppConfig::load(&path).is_err());
        assert_eq!(AppConfig::load_or_default(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = TempDir::new().unwrap();

        let path = write(&dir, "[gesture]\npinch_release_threshold = 0.01\n");
        let err = AppConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("pinch_release_threshold"), "{:#}", err);

        let path = write(&dir, "[filter]\nmin_cutoff = 0.0\n");
        assert!(AppConfig::load(&path).is_err());

        let path = write(&dir, "[session]\nframe_rate = 0\n");
        assert!(AppConfig::load(&path).is_err());
    }

    #[test]
    fn confidence_must_be_a_probability() {
        let dir = TempDir::new().unwrap();

        let path = write(&dir, "[tracker]\nmin_confidence = 0.5\n");
        assert_eq!(AppConfig::load(&path).unwrap().tracker.min_confidence, 0.5);

        for bad in ["1.5", "-0.1", "nan"] {
            let path = write(&dir, &format!("[tracker]\nmin_confidence = {}\n", bad));
            let err = AppConfig::load(&path).unwrap_err();
            assert!(err.to_string().contains("min_confidence"), "{}: {:#}", bad, err);
        }
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "[gesture\nscroll_speed = ");
        let err = AppConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("parse"));
    }

    #[test]
    fn cli_overrides_win() {
        let cfg = AppConfig::default().with_overrides(
            Some(SourceKind::Leap),
            Some(2560.0),
            None,
            true,
            true,
        );
        assert_eq!(cfg.tracker.source, SourceKind::Leap);
        assert_eq!(cfg.mapping.screen_width, 2560.0);
        assert_eq!(cfg.mapping.screen_height, 1080.0);
        assert!(!cfg.session.start_active);
        assert!(cfg.session.dry_run);
    }
}
