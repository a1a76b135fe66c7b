//! Timer state snapshot and its derived presentation values

use serde::{Deserialize, Serialize};

use crate::timer::{Phase, SessionConfig};

/// Where the controller sits in its play cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    PlayingIntro,
    PlayingActive,
    Paused,
}

/// Snapshot of the controller, published after every handled event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub remaining: u32,
    pub total_duration: u32,
    pub low_time_threshold: u32,
    pub is_playback_active: bool,
    pub is_countdown_started: bool,
    pub is_ticking: bool,
    pub media_position: Option<f64>,
    pub phase: Phase,
    pub status_message: String,
}

impl TimerState {
    /// Fresh state for a session that has not been played yet
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            remaining: config.total_duration,
            total_duration: config.total_duration,
            low_time_threshold: config.low_time_threshold,
            is_playback_active: false,
            is_countdown_started: false,
            is_ticking: false,
            media_position: None,
            phase: Phase::Intro,
            status_message: String::new(),
        }
    }

    /// `M:SS` once the countdown has started, blank before that
    pub fn display_text(&self) -> String {
        if !self.is_countdown_started {
            return String::new();
        }
        format!("{}:{:02}", self.remaining / 60, self.remaining % 60)
    }

    /// Whether the display should be flagged as running out
    pub fn is_low_time(&self) -> bool {
        self.remaining <= self.low_time_threshold
    }

    /// Share of the countdown already elapsed, from 0 to 100
    pub fn progress_percentage(&self) -> f64 {
        if !self.is_countdown_started || self.total_duration == 0 {
            return 0.0;
        }
        f64::from(self.total_duration - self.remaining) / f64::from(self.total_duration) * 100.0
    }

    pub fn playback_state(&self) -> PlaybackState {
        match (self.is_playback_active, self.is_countdown_started) {
            (true, true) => PlaybackState::PlayingActive,
            (true, false) => PlaybackState::PlayingIntro,
            (false, true) => PlaybackState::Paused,
            (false, false) if self.media_position.unwrap_or(0.0) > 0.0 => PlaybackState::Paused,
            (false, false) => PlaybackState::Idle,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(remaining: u32) -> TimerState {
        TimerState {
            remaining,
            is_countdown_started: true,
            ..TimerState::default()
        }
    }

    #[test]
    fn test_display_blank_before_start() {
        let state = TimerState::default();
        assert_eq!(state.display_text(), "");
        assert_eq!(state.progress_percentage(), 0.0);
        assert!(!state.is_low_time());
    }

    #[test]
    fn test_display_pads_seconds() {
        assert_eq!(started(600).display_text(), "10:00");
        assert_eq!(started(305).display_text(), "5:05");
        assert_eq!(started(59).display_text(), "0:59");
        assert_eq!(started(0).display_text(), "0:00");
    }

    #[test]
    fn test_low_time_threshold() {
        assert!(!started(121).is_low_time());
        assert!(started(120).is_low_time());
        assert!(started(0).is_low_time());
    }

    #[test]
    fn test_progress_percentage() {
        assert_eq!(started(600).progress_percentage(), 0.0);
        assert_eq!(started(300).progress_percentage(), 50.0);
        assert_eq!(started(0).progress_percentage(), 100.0);
    }

    #[test]
    fn test_playback_state() {
        let mut state = TimerState::default();
        assert_eq!(state.playback_state(), PlaybackState::Idle);

        state.is_playback_active = true;
        assert_eq!(state.playback_state(), PlaybackState::PlayingIntro);

        state.is_countdown_started = true;
        assert_eq!(state.playback_state(), PlaybackState::PlayingActive);

        state.is_playback_active = false;
        assert_eq!(state.playback_state(), PlaybackState::Paused);

        state.is_countdown_started = false;
        state.media_position = Some(42.0);
        assert_eq!(state.playback_state(), PlaybackState::Paused);
    }
}
