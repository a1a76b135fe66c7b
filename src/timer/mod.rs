//! Countdown timer core
//!
//! The controller owns the countdown and reconciles it with the media
//! position. It is plain synchronous state; the tokio runtime around it lives
//! in `tasks`.

pub mod controller;
pub mod countdown;
pub mod drift;
pub mod phase;
pub mod session;
pub mod ticker;

pub use controller::TimerController;
pub use countdown::{CountdownEngine, TickOutcome};
pub use drift::DriftCorrector;
pub use phase::{Phase, PhaseEvent, PhaseTracker};
pub use session::SessionConfig;
pub use ticker::{TickHandle, TickId, TickScheduler};
