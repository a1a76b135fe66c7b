//! Simulated looping audio source
//!
//! Stands in for a real audio element: it keeps a playback position against
//! the tokio clock, loops at the end of the track, and reports position
//! changes, wraps and play results to the controller task.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};
use tokio::{
    task::JoinHandle,
    time::{interval, Instant, MissedTickBehavior},
};
use tracing::{debug, info};

use super::Media;
use crate::{
    error::MediaError,
    tasks::{ControllerEvent, EventSender},
};

/// Playback position anchored to the instant it was last observed
#[derive(Debug)]
struct MediaClock {
    track_length: f64,
    anchor_position: f64,
    /// `None` while paused
    anchor_instant: Option<Instant>,
}

impl MediaClock {
    fn new(track_length: f64) -> Self {
        Self {
            track_length,
            anchor_position: 0.0,
            anchor_instant: None,
        }
    }

    fn is_playing(&self) -> bool {
        self.anchor_instant.is_some()
    }

    fn position(&self) -> f64 {
        let elapsed = self
            .anchor_instant
            .map(|instant| instant.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        (self.anchor_position + elapsed).min(self.track_length)
    }

    /// Advance past the end of the track if needed. Returns true on a wrap.
    fn wrap_if_ended(&mut self) -> bool {
        let Some(instant) = self.anchor_instant else {
            return false;
        };
        let raw = self.anchor_position + instant.elapsed().as_secs_f64();
        if raw < self.track_length {
            return false;
        }

        self.anchor_position = raw.rem_euclid(self.track_length);
        self.anchor_instant = Some(Instant::now());
        true
    }

    fn seek(&mut self, seconds: f64) {
        self.anchor_position = seconds.clamp(0.0, self.track_length);
        if self.is_playing() {
            self.anchor_instant = Some(Instant::now());
        }
    }

    fn play(&mut self) {
        if self.anchor_instant.is_none() {
            self.anchor_instant = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        self.anchor_position = self.position();
        self.anchor_instant = None;
    }
}

/// Looping media source driven by the tokio clock
#[derive(Debug)]
pub struct SimulatedMedia {
    clock: Arc<Mutex<MediaClock>>,
    events: EventSender,
    autoplay_blocked: bool,
    emitter: JoinHandle<()>,
}

impl SimulatedMedia {
    /// Create the source and start reporting its position every `update_period`
    pub fn spawn(track_length: f64, update_period: Duration, events: EventSender) -> Self {
        let clock = Arc::new(Mutex::new(MediaClock::new(track_length)));
        let emitter = tokio::spawn(emit_updates(Arc::clone(&clock), update_period, events.clone()));

        Self {
            clock,
            events,
            autoplay_blocked: false,
            emitter,
        }
    }

    /// Reject the first play request
    pub fn with_autoplay_blocked(mut self, blocked: bool) -> Self {
        self.autoplay_blocked = blocked;
        self
    }

    pub fn is_playing(&self) -> bool {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner).is_playing()
    }

    fn notify(&self, event: ControllerEvent) {
        if self.events.send(event).is_err() {
            debug!("Controller gone, dropping media notification");
        }
    }
}

impl Media for SimulatedMedia {
    fn current_time(&self) -> f64 {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner).position()
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner).seek(seconds);
        self.notify(ControllerEvent::TimeUpdate);
    }

    fn play(&mut self) {
        if self.autoplay_blocked {
            self.autoplay_blocked = false;
            info!("Play request blocked until the next user gesture");
            self.notify(ControllerEvent::PlaySettled(Err(MediaError::PlaybackRejected(
                "autoplay is not allowed before user interaction".to_string(),
            ))));
            return;
        }

        self.clock.lock().unwrap_or_else(PoisonError::into_inner).play();
        self.notify(ControllerEvent::PlaySettled(Ok(())));
    }

    fn pause(&mut self) {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner).pause();
    }
}

impl Drop for SimulatedMedia {
    fn drop(&mut self) {
        self.emitter.abort();
    }
}

/// Position notifications while playing, plus an ended notification per wrap
async fn emit_updates(clock: Arc<Mutex<MediaClock>>, period: Duration, events: EventSender) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        let wrapped = {
            let mut clock = clock.lock().unwrap_or_else(PoisonError::into_inner);
            if !clock.is_playing() {
                continue;
            }
            clock.wrap_if_ended()
        };

        if wrapped && events.send(ControllerEvent::Ended).is_err() {
            break;
        }
        if events.send(ControllerEvent::TimeUpdate).is_err() {
            break;
        }
    }
}
