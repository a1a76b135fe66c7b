//! Decagone Timer - an audio-synchronized countdown timer
//!
//! A controller keeps a ten minute countdown in step with a looping audio
//! track that opens with a two minute intro, and exposes play, pause, reset
//! and developer time-jump controls over a small HTTP API.

pub mod api;
pub mod config;
pub mod error;
pub mod media;
pub mod state;
pub mod tasks;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{ControllerError, MediaError};
pub use state::{AppState, TimerState};
pub use tasks::{launch_timer, Action, ControllerHandle};
pub use timer::{SessionConfig, TimerController};
pub use utils::signals::shutdown_signal;
