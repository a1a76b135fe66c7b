//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    state::{PlaybackState, TimerState},
    timer::Phase,
};

/// Timer state as the page renders it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerView {
    pub remaining_seconds: u32,
    pub display: String,
    pub progress_percentage: f64,
    pub low_time: bool,
    pub playing: bool,
    pub countdown_started: bool,
    pub ticking: bool,
    pub state: PlaybackState,
    pub phase: Phase,
    pub media_position: Option<f64>,
    pub status_message: String,
}

impl From<&TimerState> for TimerView {
    fn from(state: &TimerState) -> Self {
        Self {
            remaining_seconds: state.remaining,
            display: state.display_text(),
            progress_percentage: state.progress_percentage(),
            low_time: state.is_low_time(),
            playing: state.is_playback_active,
            countdown_started: state.is_countdown_started,
            ticking: state.is_ticking,
            state: state.playback_state(),
            phase: state.phase,
            media_position: state.media_position,
            status_message: state.status_message.clone(),
        }
    }
}

/// API response structure for control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: Option<TimerView>,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: Option<TimerView>) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Response for an applied action
    pub fn ok(message: String, timer: &TimerState) -> Self {
        Self::new("ok".to_string(), message, Some(TimerView::from(timer)))
    }

    /// Create an error response
    pub fn error(message: String) -> Self {
        Self::new("error".to_string(), message, None)
    }
}

/// Status response with timer and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerView,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub dev_tools: bool,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Whole-minute jump targets for the developer panel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JumpTargetsResponse {
    pub targets: Vec<JumpTarget>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JumpTarget {
    pub minutes: u32,
    pub label: String,
}

impl JumpTargetsResponse {
    pub fn new(minutes: &[u32]) -> Self {
        Self {
            targets: minutes
                .iter()
                .map(|&minutes| JumpTarget {
                    minutes,
                    label: format!("{}:00", minutes),
                })
                .collect(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_view_serializes_derived_fields() {
        let state = TimerState {
            remaining: 95,
            is_countdown_started: true,
            is_playback_active: true,
            ..TimerState::default()
        };
        let json = serde_json::to_value(TimerView::from(&state)).unwrap();

        assert_eq!(json["display"], "1:35");
        assert_eq!(json["low_time"], true);
        assert_eq!(json["state"], "playing_active");
        assert_eq!(json["phase"], "intro");
    }

    #[test]
    fn test_jump_target_labels() {
        let response = JumpTargetsResponse::new(&[10, 1, 0]);
        let labels: Vec<&str> = response.targets.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["10:00", "1:00", "0:00"]);
    }
}
