//! Audio-synchronized countdown controller
//!
//! Ties the phase tracker, countdown engine and drift corrector to a media
//! collaborator and exposes the user-facing actions. Every method is a
//! handler for exactly one input; the owner must call them one at a time.

use tracing::{debug, info, warn};

use super::{
    countdown::{CountdownEngine, TickOutcome},
    drift::DriftCorrector,
    phase::{Phase, PhaseEvent, PhaseTracker},
    session::SessionConfig,
    ticker::{TickId, TickScheduler},
};
use crate::{error::MediaError, media::Media, state::TimerState};

pub const STATUS_READY: &str = "Ready to begin";
pub const STATUS_IN_PROGRESS: &str = "In progress";
pub const STATUS_PAUSED: &str = "Paused";
pub const STATUS_RESUMED: &str = "Resumed";
pub const STATUS_RETRY_PLAY: &str = "Click Play again to enable audio";
pub const STATUS_WRAPPED: &str = "Timer reset - continuing mission...";

/// Why a play request is outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayIntent {
    Resume,
    Jump,
}

/// Keeps a countdown in step with a looping audio track
#[derive(Debug)]
pub struct TimerController<M, S> {
    config: SessionConfig,
    media: Option<M>,
    engine: CountdownEngine<S>,
    phases: PhaseTracker,
    drift: DriftCorrector,
    is_playback_active: bool,
    is_countdown_started: bool,
    status_message: String,
    pending_play: Option<PlayIntent>,
}

impl<M: Media, S: TickScheduler> TimerController<M, S> {
    /// Create a controller with no media attached
    pub fn new(config: SessionConfig, scheduler: S) -> Self {
        Self {
            config,
            media: None,
            engine: CountdownEngine::new(config, scheduler),
            phases: PhaseTracker::new(&config),
            drift: DriftCorrector::new(&config),
            is_playback_active: false,
            is_countdown_started: false,
            status_message: String::new(),
            pending_play: None,
        }
    }

    /// Attach the media source, returning any previously attached one
    pub fn attach_media(&mut self, media: M) -> Option<M> {
        self.media.replace(media)
    }

    /// Detach the media source. Later actions become no-ops.
    pub fn detach_media(&mut self) -> Option<M> {
        self.pending_play = None;
        self.media.take()
    }

    pub fn media(&self) -> Option<&M> {
        self.media.as_ref()
    }

    pub fn media_mut(&mut self) -> Option<&mut M> {
        self.media.as_mut()
    }

    pub fn remaining(&self) -> u32 {
        self.engine.remaining()
    }

    pub fn is_playback_active(&self) -> bool {
        self.is_playback_active
    }

    pub fn is_countdown_started(&self) -> bool {
        self.is_countdown_started
    }

    pub fn is_ticking(&self) -> bool {
        self.engine.is_ticking()
    }

    /// Id of the live tick handle, if any
    pub fn active_tick(&self) -> Option<TickId> {
        self.engine.active_tick()
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    /// Start or resume playback
    pub fn play(&mut self) {
        let Some(media) = self.media.as_mut() else {
            debug!("Play ignored, no media attached");
            return;
        };
        if self.is_playback_active {
            debug!("Play ignored, already playing");
            return;
        }

        self.is_playback_active = true;
        self.pending_play = Some(PlayIntent::Resume);
        media.play();
    }

    /// Pause playback and the countdown
    pub fn pause(&mut self) {
        let Some(media) = self.media.as_mut() else {
            debug!("Pause ignored, no media attached");
            return;
        };
        if !self.is_playback_active {
            debug!("Pause ignored, not playing");
            return;
        }

        self.is_playback_active = false;
        self.pending_play = None;
        media.pause();
        self.engine.stop();
        self.set_status(STATUS_PAUSED);
        info!("Paused with {}s remaining", self.engine.remaining());
    }

    /// Single play/pause button
    pub fn toggle(&mut self) {
        if self.is_playback_active {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Return to the very beginning of the track, stopped
    pub fn reset(&mut self) {
        let Some(media) = self.media.as_mut() else {
            debug!("Reset ignored, no media attached");
            return;
        };

        self.is_playback_active = false;
        self.pending_play = None;
        media.pause();
        media.set_current_time(0.0);
        self.engine.reset();
        self.is_countdown_started = false;
        self.set_status(STATUS_READY);
        info!("Timer reset");
    }

    /// Seek so that `minutes` whole minutes remain on the countdown.
    ///
    /// Targets above the session length are ignored.
    pub fn jump_to(&mut self, minutes: u32) {
        let max = self.config.max_jump_minutes();
        if minutes > max {
            warn!("Jump to {} minutes ignored, limit is {}", minutes, max);
            return;
        }
        let Some(media) = self.media.as_mut() else {
            debug!("Jump ignored, no media attached");
            return;
        };

        let position = self.config.jump_position(minutes);
        media.set_current_time(position);
        if !self.is_playback_active {
            self.is_playback_active = true;
            self.pending_play = Some(PlayIntent::Jump);
            media.play();
        }

        self.engine.set_remaining(i64::from(minutes * 60));
        self.is_countdown_started = true;
        self.engine.start();
        self.set_status(format!("Jumped to {}:00", minutes));
        info!("Jumped to {}:00 (media position {}s)", minutes, position);
    }

    /// Completion of the most recent play request
    pub fn on_play_settled(&mut self, result: Result<(), MediaError>) {
        let Some(intent) = self.pending_play.take() else {
            debug!("Play result ignored, no request outstanding");
            return;
        };

        match result {
            Ok(()) => {
                if intent == PlayIntent::Jump {
                    return;
                }
                if self.is_countdown_started {
                    self.engine.start();
                    self.set_status(STATUS_RESUMED);
                    info!("Resumed with {}s remaining", self.engine.remaining());
                } else {
                    self.set_status(STATUS_IN_PROGRESS);
                    info!("Playback started");
                }
            }
            Err(e) => {
                warn!("Audio playback failed: {}", e);
                self.is_playback_active = false;
                self.engine.stop();
                self.set_status(STATUS_RETRY_PLAY);
            }
        }
    }

    /// Media position changed
    pub fn on_time_update(&mut self) {
        let Some(media) = self.media.as_ref() else {
            return;
        };
        if !self.is_playback_active {
            return;
        }

        let position = media.current_time();
        match self
            .phases
            .observe(position, self.is_countdown_started, self.engine.is_ticking())
        {
            Some(PhaseEvent::LoopDetected) => {
                info!("Audio looped back to {:.2}s", position);
                self.restart_cycle();
                return;
            }
            Some(PhaseEvent::CountdownStart) => {
                self.engine.start();
                self.is_countdown_started = true;
                self.set_status(STATUS_IN_PROGRESS);
                info!("Intro finished at {:.2}s, countdown started", position);
            }
            None => {}
        }

        if self.engine.is_ticking() {
            if let Some(corrected) = self.drift.correction(position, self.engine.remaining()) {
                self.engine.set_remaining(corrected);
            }
        }
    }

    /// The track's native loop restarted it from the beginning
    pub fn on_ended(&mut self) {
        if self.media.is_none() {
            return;
        }
        info!("Audio track ended and restarted");
        self.restart_cycle();
    }

    /// A wall-clock tick from the handle identified by `id`
    pub fn on_tick(&mut self, id: TickId) {
        if self.engine.active_tick() != Some(id) {
            debug!("Discarding stale {}", id);
            return;
        }

        match self.engine.tick() {
            TickOutcome::Decremented(remaining) => debug!("{} -> {}s remaining", id, remaining),
            TickOutcome::Wrapped => self.set_status(STATUS_WRAPPED),
        }
    }

    /// Release the tick handle and the media source
    pub fn teardown(&mut self) {
        self.engine.stop();
        self.is_playback_active = false;
        if let Some(mut media) = self.detach_media() {
            media.pause();
        }
        info!("Timer controller torn down");
    }

    /// Current state with its derived presentation values
    pub fn snapshot(&self) -> TimerState {
        let media_position = self.media.as_ref().map(Media::current_time);
        let phase = media_position
            .map(|position| self.phases.phase_at(position))
            .unwrap_or(Phase::Intro);

        TimerState {
            remaining: self.engine.remaining(),
            total_duration: self.config.total_duration,
            low_time_threshold: self.config.low_time_threshold,
            is_playback_active: self.is_playback_active,
            is_countdown_started: self.is_countdown_started,
            is_ticking: self.engine.is_ticking(),
            media_position,
            phase,
            status_message: self.status_message.clone(),
        }
    }

    /// Loop boundary: stop ticking, refill, and wait for the intro again
    fn restart_cycle(&mut self) {
        self.engine.reset();
        self.is_countdown_started = false;
        self.set_status(STATUS_IN_PROGRESS);
    }
}
