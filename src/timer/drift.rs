//! Reconciles the countdown with the media position

use tracing::debug;

use super::session::SessionConfig;

/// Computes the countdown value implied by the media position and decides
/// when the engine's value has strayed far enough to be overwritten.
#[derive(Debug, Clone, Copy)]
pub struct DriftCorrector {
    total_duration: f64,
    intro_duration: f64,
    tolerance: f64,
}

impl DriftCorrector {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            total_duration: f64::from(config.total_duration),
            intro_duration: f64::from(config.intro_duration),
            tolerance: config.drift_tolerance,
        }
    }

    /// Remaining seconds implied by a media position past the intro
    pub fn expected_remaining(&self, position: f64) -> f64 {
        let audio_progress = position - self.intro_duration;
        self.total_duration - audio_progress.rem_euclid(self.total_duration)
    }

    /// Corrected value for `remaining`, or `None` while within tolerance.
    ///
    /// Positions still inside the intro never produce a correction.
    pub fn correction(&self, position: f64, remaining: u32) -> Option<i64> {
        if position < self.intro_duration {
            return None;
        }

        let expected = self.expected_remaining(position);
        let drift = (f64::from(remaining) - expected).abs();
        if drift <= self.tolerance {
            return None;
        }

        let corrected = expected.floor().max(0.0) as i64;
        debug!(
            "Drift of {:.2}s at position {:.2}s, correcting {} -> {}",
            drift, position, remaining, corrected
        );
        Some(corrected)
    }
}
