//! Intro/active classification and loop detection

use serde::{Deserialize, Serialize};

use super::session::SessionConfig;

/// Which part of the track the media position falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Intro,
    Active,
}

/// Transition observed on a position update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    /// The media wrapped to its beginning after the countdown had started
    LoopDetected,
    /// The intro just finished and the countdown should begin
    CountdownStart,
}

/// Classifies media positions against the intro boundary
#[derive(Debug, Clone, Copy)]
pub struct PhaseTracker {
    intro_duration: f64,
    loop_threshold: f64,
}

impl PhaseTracker {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            intro_duration: f64::from(config.intro_duration),
            loop_threshold: config.loop_threshold,
        }
    }

    /// Classify a media position
    pub fn phase_at(&self, position: f64) -> Phase {
        if position >= self.intro_duration {
            Phase::Active
        } else {
            Phase::Intro
        }
    }

    /// Inspect a position update.
    ///
    /// A position under the loop threshold once the countdown has started is
    /// reported as a loop, whether the track wrapped or the user seeked back
    /// near zero. Loop detection wins over countdown start.
    pub fn observe(&self, position: f64, countdown_started: bool, ticking: bool) -> Option<PhaseEvent> {
        if countdown_started && position < self.loop_threshold {
            return Some(PhaseEvent::LoopDetected);
        }

        if !countdown_started && !ticking && self.phase_at(position) == Phase::Active {
            return Some(PhaseEvent::CountdownStart);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> PhaseTracker {
        PhaseTracker::new(&SessionConfig::new())
    }

    #[test]
    fn test_phase_boundary() {
        let tracker = tracker();
        assert_eq!(tracker.phase_at(0.0), Phase::Intro);
        assert_eq!(tracker.phase_at(119.99), Phase::Intro);
        assert_eq!(tracker.phase_at(120.0), Phase::Active);
        assert_eq!(tracker.phase_at(700.0), Phase::Active);
    }

    #[test]
    fn test_countdown_start_at_intro_end() {
        let tracker = tracker();
        assert_eq!(tracker.observe(119.7, false, false), None);
        assert_eq!(tracker.observe(120.0, false, false), Some(PhaseEvent::CountdownStart));
        assert_eq!(tracker.observe(121.3, false, false), Some(PhaseEvent::CountdownStart));
    }

    #[test]
    fn test_countdown_start_fires_once_per_cycle() {
        let tracker = tracker();
        assert_eq!(tracker.observe(130.0, true, true), None);
        // A live handle also blocks a second start.
        assert_eq!(tracker.observe(130.0, false, true), None);
    }

    #[test]
    fn test_loop_detected_only_after_start() {
        let tracker = tracker();
        assert_eq!(tracker.observe(3.0, true, true), Some(PhaseEvent::LoopDetected));
        assert_eq!(tracker.observe(3.0, true, false), Some(PhaseEvent::LoopDetected));
        assert_eq!(tracker.observe(3.0, false, false), None);
        assert_eq!(tracker.observe(5.0, true, true), None);
    }
}
