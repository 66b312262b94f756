//! One Euro filter: adaptive low-pass for cursor jitter.
//!
//! Smooth when the hand is still (jitter disappears), responsive when it
//! moves fast (lag disappears).  One instance per scalar channel; the x and
//! y cursor channels are filtered independently with the same timestamp.

use std::f64::consts::PI;

use crate::config::FilterConfig;

/// Adaptive low-pass filter for one scalar signal.
#[derive(Debug, Clone)]
pub struct OneEuroFilter {
    /// Minimum cutoff frequency (Hz): lower = smoother at rest.
    min_cutoff: f64,
    /// Speed coefficient: higher = less lag during fast motion.
    beta: f64,
    /// Cutoff for the derivative estimate (Hz).
    d_cutoff: f64,

    state: Option<FilterState>,
}

#[derive(Debug, Clone, Copy)]
struct FilterState {
    x_prev: f64,
    dx_prev: f64,
    t_prev: f64,
}

impl OneEuroFilter {
    pub fn new(min_cutoff: f64, beta: f64, d_cutoff: f64) -> Self {
        OneEuroFilter { min_cutoff, beta, d_cutoff, state: None }
    }

    pub fn from_config(cfg: &FilterConfig) -> Self {
        Self::new(cfg.min_cutoff, cfg.beta, cfg.d_cutoff)
    }

    fn alpha(cutoff: f64, te: f64) -> f64 {
        let tau = 1.0 / (2.0 * PI * cutoff);
        1.0 / (1.0 + tau / te)
    }

    /// Filter `x` sampled at time `t` (seconds).
    ///
    /// The first sample after construction or [`reset`](Self::reset) passes
    /// through unchanged.  A timestamp that does not advance returns the last
    /// output and leaves the state alone.
    pub fn apply(&mut self, x: f64, t: f64) -> f64 {
        let prev = match self.state {
            Some(s) => s,
            None => {
                self.state = Some(FilterState { x_prev: x, dx_prev: 0.0, t_prev: t });
                return x;
            }
        };

        let te = t - prev.t_prev;
        if te <= 0.0 {
            return prev.x_prev;
        }

        // 1. Smoothed derivative
        let a_d    = Self::alpha(self.d_cutoff, te);
        let dx     = (x - prev.x_prev) / te;
        let dx_hat = a_d * dx + (1.0 - a_d) * prev.dx_prev;

        // 2. Cutoff widens with speed
        let cutoff = self.min_cutoff + self.beta * dx_hat.abs();

        // 3. Filter the value
        let a     = Self::alpha(cutoff, te);
        let x_hat = a * x + (1.0 - a) * prev.x_prev;

        self.state = Some(FilterState { x_prev: x_hat, dx_prev: dx_hat, t_prev: t });
        x_hat
    }

    /// Forget all history; the next sample passes through.
    pub fn reset(&mut self) {
        self.state = None;
    }

    /// Last filtered value, if any sample has been seen.
    pub fn last(&self) -> Option<f64> {
        self.state.map(|s| s.x_prev)
    }
}

impl Default for OneEuroFilter {
    fn default() -> Self {
        Self::from_config(&FilterConfig::default())
    }
}

/// Pair of filters for a 2-D cursor position.
#[derive(Debug, Clone, Default)]
pub struct OneEuroFilter2D {
    pub x: OneEuroFilter,
    pub y: OneEuroFilter,
}

impl OneEuroFilter2D {
    pub fn from_config(cfg: &FilterConfig) -> Self {
        OneEuroFilter2D {
            x: OneEuroFilter::from_config(cfg),
            y: OneEuroFilter::from_config(cfg),
        }
    }

    pub fn apply(&mut self, pos: (f64, f64), t: f64) -> (f64, f64) {
        (self.x.apply(pos.0, t), self.y.apply(pos.1, t))
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f64 = 1.0 / 60.0;

    #[test]
    fn first_sample_passes_through() {
        let mut f = OneEuroFilter::default();
        assert_eq!(f.apply(123.456, 10.0), 123.456);
        assert_eq!(f.last(), Some(123.456));
    }

    #[test]
    fn stale_timestamp_returns_previous_output() {
        let mut f = OneEuroFilter::default();
        f.apply(0.0, 1.0);
        let y = f.apply(100.0, 1.0 + DT);
        assert!(y > 0.0 && y < 100.0);

        // Duplicate and backwards timestamps leave the state alone.
        assert_eq!(f.apply(500.0, 1.0 + DT), y);
        assert_eq!(f.apply(500.0, 0.5), y);
        assert_eq!(f.last(), Some(y));
    }

    #[test]
    fn reset_restores_pass_through() {
        let mut f = OneEuroFilter::default();
        f.apply(0.0, 0.0);
        f.apply(50.0, DT);
        f.reset();
        assert_eq!(f.last(), None);
        assert_eq!(f.apply(77.0, 5.0), 77.0);
    }

    #[test]
    fn alpha_matches_closed_form() {
        // cutoff 1 Hz at 60 Hz sampling: 1 / (1 + 60 / 2π)
        let a = OneEuroFilter::alpha(1.0, DT);
        let expected = 1.0 / (1.0 + 60.0 / (2.0 * PI));
        assert!((a - expected).abs() < 1e-12);
    }

    /// Samples needed before a 0 → 100 step settles within 1.0.
    fn settling_samples(beta: f64) -> usize {
        let mut f = OneEuroFilter::new(1.0, beta, 1.0);
        f.apply(0.0, 0.0);
        for n in 1..10_000 {
            let y = f.apply(100.0, n as f64 * DT);
            if (100.0 - y).abs() < 1.0 {
                return n;
            }
        }
        usize::MAX
    }

    #[test]
    fn larger_beta_settles_faster() {
        let slow = settling_samples(0.0);
        let fast = settling_samples(0.1);
        assert!(fast < slow, "beta=0.1 took {} samples, beta=0 took {}", fast, slow);
    }

    #[test]
    fn channels_evolve_independently() {
        let mut f = OneEuroFilter2D::default();
        f.apply((0.0, 0.0), 0.0);
        let (x, y) = f.apply((100.0, 0.0), DT);
        assert!(x > 0.0);
        assert_eq!(y, 0.0);
    }

    proptest! {
        #[test]
        fn constant_input_converges(value in -5000.0f64..5000.0, start in 0.0f64..1000.0) {
            let mut f = OneEuroFilter::default();
            f.apply(0.0, start);
            let mut y = 0.0;
            for n in 1..=600 {
                y = f.apply(value, start + n as f64 * DT);
            }
            prop_assert!((y - value).abs() <= 1e-6 * value.abs().max(1.0));
        }

        #[test]
        fn output_stays_between_previous_and_input(
            a in -1000.0f64..1000.0,
            b in -1000.0f64..1000.0,
            dt in 0.001f64..0.5,
        ) {
            let mut f = OneEuroFilter::default();
            f.apply(a, 0.0);
            let y = f.apply(b, dt);
            let (lo, hi) = if a < b { (a, b) } else { (b, a) };
            prop_assert!(y >= lo - 1e-9 && y <= hi + 1e-9);
        }
    }
}
