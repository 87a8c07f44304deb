//! Recurring one-second tick, as a cancellable handle.
//!
//! The engine only asks for "tick me every second" and "stop". Who actually
//! calls [`TimerEngine::tick`](super::TimerEngine::tick) is up to the owner:
//! tests call it directly, the CLI drains the channel fed by
//! [`IntervalScheduler`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

pub trait TickScheduler {
    /// Begin the recurring tick. Calling this while already scheduled is a no-op.
    fn schedule(&mut self);
    /// Stop the recurring tick. Idempotent.
    fn cancel(&mut self);
    fn is_scheduled(&self) -> bool;
}

impl<T: TickScheduler + ?Sized> TickScheduler for Box<T> {
    fn schedule(&mut self) {
        (**self).schedule()
    }

    fn cancel(&mut self) {
        (**self).cancel()
    }

    fn is_scheduled(&self) -> bool {
        (**self).is_scheduled()
    }
}

/// Records schedule/cancel requests without any real timer.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    scheduled: bool,
    schedule_calls: u32,
    cancel_calls: u32,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times a stopped tick was started.
    pub fn schedule_calls(&self) -> u32 {
        self.schedule_calls
    }

    /// Number of times a running tick was stopped.
    pub fn cancel_calls(&self) -> u32 {
        self.cancel_calls
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule(&mut self) {
        if !self.scheduled {
            self.scheduled = true;
            self.schedule_calls += 1;
        }
    }

    fn cancel(&mut self) {
        if self.scheduled {
            self.scheduled = false;
            self.cancel_calls += 1;
        }
    }

    fn is_scheduled(&self) -> bool {
        self.scheduled
    }
}

/// Tokio interval task that sends a tick on a channel every period.
///
/// `schedule` spawns onto the current runtime, so it must be called from
/// within one. Each schedule/cancel starts a new generation; ticks still
/// queued from an earlier generation are dropped by [`TickReceiver`].
pub struct IntervalScheduler {
    period: Duration,
    tx: mpsc::UnboundedSender<u64>,
    generation: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

/// Receiving end of an [`IntervalScheduler`].
pub struct TickReceiver {
    rx: mpsc::UnboundedReceiver<u64>,
    generation: Arc<AtomicU64>,
}

impl IntervalScheduler {
    pub fn new(period: Duration) -> (Self, TickReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let generation = Arc::new(AtomicU64::new(0));
        (
            Self {
                period,
                tx,
                generation: Arc::clone(&generation),
                task: None,
            },
            TickReceiver { rx, generation },
        )
    }

    pub fn every_second() -> (Self, TickReceiver) {
        Self::new(Duration::from_secs(1))
    }
}

impl TickScheduler for IntervalScheduler {
    fn schedule(&mut self) {
        if self.task.is_some() {
            return;
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let tx = self.tx.clone();
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(generation).is_err() {
                    break;
                }
            }
        }));
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            self.generation.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn is_scheduled(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl TickReceiver {
    /// Wait for the next tick of the current schedule. `None` once the
    /// scheduler is gone.
    pub async fn recv(&mut self) -> Option<()> {
        loop {
            let generation = self.rx.recv().await?;
            if self.is_current(generation) {
                return Some(());
            }
        }
    }

    /// Non-blocking [`recv`](Self::recv): `None` when no current tick is queued.
    pub fn try_recv(&mut self) -> Option<()> {
        while let Ok(generation) = self.rx.try_recv() {
            if self.is_current(generation) {
                return Some(());
            }
        }
        None
    }

    fn is_current(&self, generation: u64) -> bool {
        generation == self.generation.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_scheduler_counts_transitions_only() {
        let mut s = ManualScheduler::new();
        s.schedule();
        s.schedule();
        assert!(s.is_scheduled());
        assert_eq!(s.schedule_calls(), 1);
        s.cancel();
        s.cancel();
        assert!(!s.is_scheduled());
        assert_eq!(s.cancel_calls(), 1);
    }

    #[tokio::test]
    async fn interval_scheduler_delivers_ticks_until_cancelled() {
        let (mut scheduler, mut rx) = IntervalScheduler::new(Duration::from_millis(10));
        scheduler.schedule();
        assert!(scheduler.is_scheduled());

        let tick = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await;
        assert_eq!(tick.ok().flatten(), Some(()));

        scheduler.cancel();
        assert!(!scheduler.is_scheduled());
    }

    #[tokio::test]
    async fn ticks_queued_before_cancel_are_dropped() {
        let (mut scheduler, mut rx) = IntervalScheduler::new(Duration::from_millis(5));
        scheduler.schedule();
        tokio::time::sleep(Duration::from_millis(50)).await;
        scheduler.cancel();
        assert!(rx.try_recv().is_none());

        scheduler.schedule();

        let tick = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await;
        assert_eq!(tick.ok().flatten(), Some(()));
    }
}
