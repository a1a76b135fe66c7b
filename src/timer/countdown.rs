//! Countdown engine: owns the authoritative remaining time

use tracing::{debug, info};

use super::{
    session::SessionConfig,
    ticker::{TickHandle, TickId, TickScheduler},
};

/// Result of applying one wall-clock tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// One second was taken off the countdown
    Decremented(u32),
    /// The countdown was already at zero and wrapped back to the full duration
    Wrapped,
}

/// Decrements `remaining` once per tick while a tick handle is live
#[derive(Debug)]
pub struct CountdownEngine<S> {
    total_duration: u32,
    remaining: u32,
    config: SessionConfig,
    scheduler: S,
    handle: Option<TickHandle>,
    next_id: u64,
}

impl<S: TickScheduler> CountdownEngine<S> {
    /// Create an idle engine holding the full duration
    pub fn new(config: SessionConfig, scheduler: S) -> Self {
        Self {
            total_duration: config.total_duration,
            remaining: config.total_duration,
            config,
            scheduler,
            handle: None,
            next_id: 0,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Whether a tick handle is currently live
    pub fn is_ticking(&self) -> bool {
        self.handle.is_some()
    }

    /// Id of the live tick handle, if any
    pub fn active_tick(&self) -> Option<TickId> {
        self.handle.as_ref().map(TickHandle::id)
    }

    /// Apply one tick
    pub fn tick(&mut self) -> TickOutcome {
        if self.remaining > 0 {
            self.remaining -= 1;
            TickOutcome::Decremented(self.remaining)
        } else {
            info!("Countdown reached zero, wrapping to {}s", self.total_duration);
            self.remaining = self.total_duration;
            TickOutcome::Wrapped
        }
    }

    /// Begin ticking. Returns false when a handle was already live.
    pub fn start(&mut self) -> bool {
        if self.handle.is_some() {
            return false;
        }

        self.next_id += 1;
        let id = TickId(self.next_id);
        self.handle = Some(self.scheduler.schedule(id, self.config.tick_period));
        debug!("Started {}", id);
        true
    }

    /// Stop ticking. Returns false when nothing was live.
    pub fn stop(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                debug!("Stopped {}", handle.id());
                true
            }
            None => false,
        }
    }

    /// Overwrite the remaining time, clamped to the session duration
    pub fn set_remaining(&mut self, seconds: i64) {
        self.remaining = seconds.clamp(0, i64::from(self.total_duration)) as u32;
    }

    /// Stop ticking and restore the full duration
    pub fn reset(&mut self) {
        self.stop();
        self.remaining = self.total_duration;
    }
}
