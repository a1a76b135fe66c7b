//! Error types

use thiserror::Error;

/// Failures reported by a media collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    /// The platform refused to start playback (e.g. an autoplay policy)
    #[error("playback rejected: {0}")]
    PlaybackRejected(String),
}

/// Failures at the boundary between callers and the controller task
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("timer controller is no longer running")]
    ControllerGone,
    #[error("jump target {minutes} is outside 0..={max} minutes")]
    JumpOutOfRange { minutes: u32, max: u32 },
    #[error("developer tools are disabled")]
    DevToolsDisabled,
}
