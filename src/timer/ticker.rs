//! Recurring wall-clock tick handles

use std::{fmt, time::Duration};

/// Identifies the tick handle that produced a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickId(pub u64);

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick#{}", self.0)
    }
}

/// A live recurring callback. Dropping the handle cancels it.
pub struct TickHandle {
    id: TickId,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TickHandle {
    /// Wrap a cancellation routine that runs exactly once, on drop
    pub fn new<F>(id: TickId, cancel: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            id,
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn id(&self) -> TickId {
        self.id
    }
}

impl fmt::Debug for TickHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickHandle").field("id", &self.id).finish()
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Source of recurring wall-clock ticks.
///
/// Implementations deliver ticks back to the owner of the countdown tagged
/// with the id they were scheduled under, until the returned handle is dropped.
pub trait TickScheduler {
    fn schedule(&mut self, id: TickId, period: Duration) -> TickHandle;
}

#[cfg(test)]
pub(crate) mod manual {
    //! Scheduler for tests that counts live handles instead of running a clock

    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;

    #[derive(Debug, Clone, Default)]
    pub(crate) struct ManualScheduler {
        live: Arc<AtomicUsize>,
        scheduled: Arc<AtomicUsize>,
    }

    impl ManualScheduler {
        pub(crate) fn live_handles(&self) -> usize {
            self.live.load(Ordering::SeqCst)
        }

        pub(crate) fn total_scheduled(&self) -> usize {
            self.scheduled.load(Ordering::SeqCst)
        }
    }

    impl TickScheduler for ManualScheduler {
        fn schedule(&mut self, id: TickId, _period: Duration) -> TickHandle {
            self.live.fetch_add(1, Ordering::SeqCst);
            self.scheduled.fetch_add(1, Ordering::SeqCst);
            let live = Arc::clone(&self.live);
            TickHandle::new(id, move || {
                live.fetch_sub(1, Ordering::SeqCst);
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };

    use super::*;

    #[test]
    fn test_drop_runs_cancel_once() {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let handle = TickHandle::new(TickId(7), move || flag.store(true, Ordering::SeqCst));

        assert_eq!(handle.id(), TickId(7));
        assert!(!cancelled.load(Ordering::SeqCst));
        drop(handle);
        assert!(cancelled.load(Ordering::SeqCst));
    }
}
