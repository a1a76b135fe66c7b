//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::TimerState;
use crate::{
    error::ControllerError,
    tasks::{Action, ControllerHandle},
    timer::SessionConfig,
};

/// Shared state handed to every HTTP handler
#[derive(Debug)]
pub struct AppState {
    /// Handle to the task that owns the timer controller
    pub controller: ControllerHandle,
    pub session: SessionConfig,
    /// Whether the jump endpoints are exposed
    pub dev_tools: bool,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    pub fn new(
        controller: ControllerHandle,
        session: SessionConfig,
        dev_tools: bool,
        port: u16,
        host: String,
    ) -> Self {
        Self {
            controller,
            session,
            dev_tools,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Validate and forward an action to the controller, recording it as the last action
    pub async fn perform(&self, action: Action) -> Result<TimerState, ControllerError> {
        if let Action::Jump(minutes) = action {
            if !self.dev_tools {
                return Err(ControllerError::DevToolsDisabled);
            }
            let max = self.session.max_jump_minutes();
            if minutes > max {
                return Err(ControllerError::JumpOutOfRange { minutes, max });
            }
        }

        let state = self.controller.dispatch(action).await?;
        info!("Action {} applied: {}", action, state.status_message);

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok(state)
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> TimerState {
        self.controller.current()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Stop the controller task
    pub fn shutdown(&self) {
        warn!("Shutting down timer controller");
        self.controller.shutdown();
    }
}
