//! State management module
//!
//! Shared server state and the timer snapshot published by the controller.

pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use timer_state::{PlaybackState, TimerState};
