//! Fixed session parameters for the countdown

use std::time::Duration;

/// Length of the visible countdown, in seconds.
pub const TOTAL_DURATION: u32 = 10 * 60;

/// Silent lead-in before the countdown begins, in seconds.
pub const INTRO_DURATION: u32 = 120;

/// Media positions below this mark (after the countdown started) mean the track wrapped.
pub const LOOP_THRESHOLD_SECS: f64 = 5.0;

/// Largest tolerated gap between the countdown and the media position.
pub const DRIFT_TOLERANCE_SECS: f64 = 2.0;

/// At or below this many seconds the display is flagged as low on time.
pub const LOW_TIME_THRESHOLD: u32 = 120;

/// Wall-clock period between countdown ticks.
pub const TICK_PERIOD: Duration = Duration::from_millis(1000);

/// Immutable configuration for one timer session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub total_duration: u32,
    pub intro_duration: u32,
    pub loop_threshold: f64,
    pub drift_tolerance: f64,
    pub low_time_threshold: u32,
    pub tick_period: Duration,
}

impl SessionConfig {
    /// Create the session configuration with the fixed constants
    pub fn new() -> Self {
        let config = Self {
            total_duration: TOTAL_DURATION,
            intro_duration: INTRO_DURATION,
            loop_threshold: LOOP_THRESHOLD_SECS,
            drift_tolerance: DRIFT_TOLERANCE_SECS,
            low_time_threshold: LOW_TIME_THRESHOLD,
            tick_period: TICK_PERIOD,
        };
        debug_assert!(
            config.intro_duration < config.total_duration,
            "intro must be shorter than the countdown"
        );
        config
    }

    /// Full length of the looping audio track (intro followed by the countdown)
    pub fn track_length(&self) -> f64 {
        f64::from(self.intro_duration + self.total_duration)
    }

    /// Largest whole-minute jump target
    pub fn max_jump_minutes(&self) -> u32 {
        self.total_duration / 60
    }

    /// Whole-minute jump targets, from the full duration down to zero
    pub fn jump_targets(&self) -> Vec<u32> {
        (0..=self.max_jump_minutes()).rev().collect()
    }

    /// Media position that corresponds to `minutes` left on the countdown
    pub fn jump_position(&self, minutes: u32) -> f64 {
        let elapsed = self.total_duration.saturating_sub(minutes * 60);
        f64::from(self.intro_duration + elapsed)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}
