//! Background tasks module
//!
//! The controller runs inside a single task that receives every input as a
//! message; tick tasks and the simulated media feed that queue.

pub mod controller_task;
pub mod tick_task;

// Re-export main types
pub use controller_task::{launch_timer, Action, ControllerEvent, ControllerHandle, EventSender, RuntimeOptions};
pub use tick_task::TokioTickScheduler;
