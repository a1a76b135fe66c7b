//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, warn};

use crate::{
    error::ControllerError,
    state::AppState,
    tasks::Action,
};
use super::responses::{ApiResponse, HealthResponse, JumpTargetsResponse, StatusResponse, TimerView};

type HandlerResult = Result<Json<ApiResponse>, (StatusCode, Json<ApiResponse>)>;

/// Run an action and turn the outcome into a response
async fn run_action(state: &AppState, action: Action) -> HandlerResult {
    match state.perform(action).await {
        Ok(timer) => Ok(Json(ApiResponse::ok(timer.status_message.clone(), &timer))),
        Err(e) => {
            let status = match e {
                ControllerError::ControllerGone => {
                    error!("Failed to apply {}: {}", action, e);
                    StatusCode::SERVICE_UNAVAILABLE
                }
                ControllerError::JumpOutOfRange { .. } => {
                    warn!("Rejected {}: {}", action, e);
                    StatusCode::BAD_REQUEST
                }
                ControllerError::DevToolsDisabled => StatusCode::NOT_FOUND,
            };
            Err((status, Json(ApiResponse::error(e.to_string()))))
        }
    }
}

/// Handle POST /play - Start or resume playback
pub async fn play_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    run_action(&state, Action::Play).await
}

/// Handle POST /pause - Pause playback and the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    run_action(&state, Action::Pause).await
}

/// Handle POST /toggle - Play/pause button
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    run_action(&state, Action::Toggle).await
}

/// Handle POST /reset - Back to the start of the track
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    run_action(&state, Action::Reset).await
}

/// Handle POST /jump/:minutes - Developer time jump
pub async fn jump_handler(
    State(state): State<Arc<AppState>>,
    Path(minutes): Path<u32>,
) -> HandlerResult {
    run_action(&state, Action::Jump(minutes)).await
}

/// Handle GET /jump-targets - Developer jump buttons
pub async fn jump_targets_handler(State(state): State<Arc<AppState>>) -> Json<JumpTargetsResponse> {
    Json(JumpTargetsResponse::new(&state.session.jump_targets()))
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let timer = state.get_timer_state();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer: TimerView::from(&timer),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        dev_tools: state.dev_tools,
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
