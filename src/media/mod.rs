//! Media collaborator module
//!
//! The controller drives an audio source through the [`Media`] trait and is
//! told about position changes, track wraps and play results separately.

pub mod simulated;

pub use simulated::SimulatedMedia;

/// A playable, seekable, looping audio source
pub trait Media {
    /// Current playback position in seconds
    fn current_time(&self) -> f64;

    /// Seek to `seconds`
    fn set_current_time(&mut self, seconds: f64);

    /// Request playback. The outcome is delivered later through the
    /// controller's `on_play_settled`, never from this call.
    fn play(&mut self);

    fn pause(&mut self);
}
