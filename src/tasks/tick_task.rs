//! Wall-clock tick tasks backing the countdown's tick handles

use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use super::controller_task::{ControllerEvent, EventSender};
use crate::timer::{TickHandle, TickId, TickScheduler};

/// Schedules ticks as tokio tasks that post back into the controller's queue
#[derive(Debug, Clone)]
pub struct TokioTickScheduler {
    events: EventSender,
}

impl TokioTickScheduler {
    pub fn new(events: EventSender) -> Self {
        Self { events }
    }
}

impl TickScheduler for TokioTickScheduler {
    fn schedule(&mut self, id: TickId, period: Duration) -> TickHandle {
        let events = self.events.clone();
        let task = tokio::spawn(async move {
            // First tick lands one full period after scheduling.
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                if events.send(ControllerEvent::Tick(id)).is_err() {
                    debug!("Controller gone, stopping {}", id);
                    break;
                }
            }
        });

        TickHandle::new(id, move || task.abort())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TokioTickScheduler::new(tx);
        let handle = scheduler.schedule(TickId(3), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(3500)).await;
        let mut ticks = 0;
        while let Ok(event) = rx.try_recv() {
            assert!(matches!(event, ControllerEvent::Tick(TickId(3))));
            ticks += 1;
        }
        assert_eq!(ticks, 3);
        drop(handle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TokioTickScheduler::new(tx);
        let handle = scheduler.schedule(TickId(1), Duration::from_secs(1));
        drop(handle);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }
}
