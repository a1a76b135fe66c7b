//! Controller task: the single owner of the timer controller

use std::{fmt, sync::Arc, time::Duration};
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use super::tick_task::TokioTickScheduler;
use crate::{
    error::{ControllerError, MediaError},
    media::{Media, SimulatedMedia},
    state::TimerState,
    timer::{SessionConfig, TickId, TickScheduler, TimerController},
};

/// User-facing control actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Play,
    Pause,
    Toggle,
    Reset,
    Jump(u32),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Play => write!(f, "play"),
            Action::Pause => write!(f, "pause"),
            Action::Toggle => write!(f, "toggle"),
            Action::Reset => write!(f, "reset"),
            Action::Jump(minutes) => write!(f, "jump-{}", minutes),
        }
    }
}

/// Everything that can re-enter the controller
#[derive(Debug)]
pub enum ControllerEvent {
    Action {
        action: Action,
        reply: oneshot::Sender<TimerState>,
    },
    Tick(TickId),
    TimeUpdate,
    Ended,
    PlaySettled(Result<(), MediaError>),
    Shutdown,
}

pub type EventSender = mpsc::UnboundedSender<ControllerEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<ControllerEvent>;

/// Settings for the runtime around the controller
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// How often the media reports its position while playing
    pub timeupdate_period: Duration,
    /// Reject the first play request, like a browser autoplay policy
    pub autoplay_blocked: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            timeupdate_period: Duration::from_millis(250),
            autoplay_blocked: false,
        }
    }
}

/// Cloneable handle used to talk to the controller task.
///
/// The controller feeds its own queue, so the queue never closes by itself.
/// Dropping the last clone of the handle shuts the task down.
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    events: EventSender,
    updates: watch::Receiver<TimerState>,
    _shutdown: Arc<ShutdownOnDrop>,
}

/// Sends `Shutdown` once the last handle is gone
#[derive(Debug)]
struct ShutdownOnDrop {
    events: EventSender,
}

impl Drop for ShutdownOnDrop {
    fn drop(&mut self) {
        if self.events.send(ControllerEvent::Shutdown).is_ok() {
            debug!("Last controller handle dropped, shutting down");
        }
    }
}

impl ControllerHandle {
    /// Apply an action and wait for the resulting state
    pub async fn dispatch(&self, action: Action) -> Result<TimerState, ControllerError> {
        let (reply, response) = oneshot::channel();
        self.events
            .send(ControllerEvent::Action { action, reply })
            .map_err(|_| ControllerError::ControllerGone)?;
        response.await.map_err(|_| ControllerError::ControllerGone)
    }

    /// Most recently published state
    pub fn current(&self) -> TimerState {
        self.updates.borrow().clone()
    }

    /// Watch every published state change
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.updates.clone()
    }

    /// Ask the task to tear the controller down and exit
    pub fn shutdown(&self) {
        if self.events.send(ControllerEvent::Shutdown).is_err() {
            debug!("Controller task already stopped");
        }
    }
}

/// Build the controller with simulated media and tokio ticks, and spawn its task
pub fn launch_timer(session: SessionConfig, options: RuntimeOptions) -> (ControllerHandle, JoinHandle<()>) {
    let (events_tx, events_rx) = mpsc::unbounded_channel();

    let media = SimulatedMedia::spawn(session.track_length(), options.timeupdate_period, events_tx.clone())
        .with_autoplay_blocked(options.autoplay_blocked);
    let mut controller = TimerController::new(session, TokioTickScheduler::new(events_tx.clone()));
    controller.attach_media(media);

    spawn_controller(controller, events_tx, events_rx)
}

/// Spawn the task that owns `controller` and drains `events`
pub fn spawn_controller<M, S>(
    controller: TimerController<M, S>,
    events_tx: EventSender,
    events_rx: EventReceiver,
) -> (ControllerHandle, JoinHandle<()>)
where
    M: Media + Send + 'static,
    S: TickScheduler + Send + 'static,
{
    let (updates_tx, updates_rx) = watch::channel(controller.snapshot());
    let task = tokio::spawn(controller_task(controller, events_rx, updates_tx));

    (
        ControllerHandle {
            _shutdown: Arc::new(ShutdownOnDrop {
                events: events_tx.clone(),
            }),
            events: events_tx,
            updates: updates_rx,
        },
        task,
    )
}

/// Drain events one at a time so no two handlers ever overlap
async fn controller_task<M, S>(
    mut controller: TimerController<M, S>,
    mut events: EventReceiver,
    updates: watch::Sender<TimerState>,
) where
    M: Media,
    S: TickScheduler,
{
    info!("Starting timer controller task");

    while let Some(event) = events.recv().await {
        match event {
            ControllerEvent::Action { action, reply } => {
                debug!("Applying action: {}", action);
                apply(&mut controller, action);
                if reply.send(controller.snapshot()).is_err() {
                    warn!("Caller dropped before {} completed", action);
                }
            }
            ControllerEvent::Tick(id) => controller.on_tick(id),
            ControllerEvent::TimeUpdate => controller.on_time_update(),
            ControllerEvent::Ended => controller.on_ended(),
            ControllerEvent::PlaySettled(result) => controller.on_play_settled(result),
            ControllerEvent::Shutdown => break,
        }

        publish(&updates, controller.snapshot());
    }

    controller.teardown();
    publish(&updates, controller.snapshot());
    info!("Timer controller task stopped");
}

fn apply<M: Media, S: TickScheduler>(controller: &mut TimerController<M, S>, action: Action) {
    match action {
        Action::Play => controller.play(),
        Action::Pause => controller.pause(),
        Action::Toggle => controller.toggle(),
        Action::Reset => controller.reset(),
        Action::Jump(minutes) => controller.jump_to(minutes),
    }
}

fn publish(updates: &watch::Sender<TimerState>, state: TimerState) {
    updates.send_if_modified(|current| {
        if *current == state {
            false
        } else {
            *current = state;
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::controller::{STATUS_IN_PROGRESS, STATUS_RETRY_PLAY};

    fn launch(autoplay_blocked: bool) -> (ControllerHandle, JoinHandle<()>) {
        launch_timer(
            SessionConfig::new(),
            RuntimeOptions {
                autoplay_blocked,
                ..RuntimeOptions::default()
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_follows_media() {
        let (handle, task) = launch(false);

        let state = handle.dispatch(Action::Play).await.unwrap();
        assert!(state.is_playback_active);

        tokio::time::sleep(Duration::from_secs(60)).await;
        let state = handle.current();
        assert!(!state.is_countdown_started);
        assert_eq!(state.status_message, STATUS_IN_PROGRESS);
        assert_eq!(state.display_text(), "");

        tokio::time::sleep(Duration::from_secs(65)).await;
        let state = handle.current();
        assert!(state.is_countdown_started);
        assert!(state.is_ticking);
        assert!(
            (593..=600).contains(&state.remaining),
            "remaining was {}",
            state.remaining
        );

        handle.shutdown();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_autoplay_rejection_then_retry() {
        let (handle, task) = launch(true);

        handle.dispatch(Action::Play).await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        let state = handle.current();
        assert!(!state.is_playback_active);
        assert_eq!(state.status_message, STATUS_RETRY_PLAY);

        handle.dispatch(Action::Play).await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        let state = handle.current();
        assert!(state.is_playback_active);
        assert_eq!(state.status_message, STATUS_IN_PROGRESS);

        handle.shutdown();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_jump_then_run() {
        let (handle, task) = launch(false);

        let state = handle.dispatch(Action::Jump(5)).await.unwrap();
        assert_eq!(state.remaining, 300);
        assert_eq!(state.media_position, Some(420.0));
        assert!(state.is_playback_active);
        assert!(state.is_ticking);

        tokio::time::sleep(Duration::from_secs(10)).await;
        let remaining = handle.current().remaining;
        assert!((288..=292).contains(&remaining), "remaining was {}", remaining);

        handle.shutdown();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_freezes_countdown() {
        let (handle, task) = launch(false);

        handle.dispatch(Action::Jump(3)).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        let paused = handle.dispatch(Action::Pause).await.unwrap();
        assert!(!paused.is_ticking);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(handle.current().remaining, paused.remaining);

        handle.shutdown();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_ticks() {
        let (handle, task) = launch(false);
        let mut updates = handle.subscribe();

        handle.dispatch(Action::Jump(5)).await.unwrap();
        updates.borrow_and_update();

        tokio::time::timeout(Duration::from_secs(2), updates.changed())
            .await
            .expect("no state published within two seconds")
            .unwrap();
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert!(updates.borrow_and_update().remaining < 300);

        handle.shutdown();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_last_handle_stops_task() {
        let (handle, task) = launch(false);
        let clone = handle.clone();
        clone.dispatch(Action::Jump(4)).await.unwrap();

        drop(handle);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!task.is_finished());

        let updates = clone.subscribe();
        drop(clone);
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("controller task kept running")
            .unwrap();

        let state = updates.borrow().clone();
        assert!(!state.is_ticking);
        assert_eq!(state.media_position, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_tears_down() {
        let (handle, task) = launch(false);
        handle.dispatch(Action::Jump(7)).await.unwrap();

        handle.shutdown();
        task.await.unwrap();

        let state = handle.current();
        assert!(!state.is_ticking);
        assert!(!state.is_playback_active);
        assert_eq!(state.media_position, None);
        assert_eq!(
            handle.dispatch(Action::Play).await,
            Err(ControllerError::ControllerGone)
        );
    }
}
