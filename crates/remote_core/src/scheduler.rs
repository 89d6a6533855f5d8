//! Timers and cancellable task handles.

use std::{future::Future, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, Interval, MissedTickBehavior},
};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Owned handle to a spawned task. Cancelling aborts the task at its next
/// suspension point; a cancelled handle is never restarted.
#[derive(Debug)]
pub struct TaskHandle(JoinHandle<()>);

impl TaskHandle {
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self(tokio::spawn(future))
    }

    /// Runs `future` once after `delay`.
    pub fn after<F>(delay: Duration, future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self::spawn(async move {
            tokio::time::sleep(delay).await;
            future.await;
        })
    }

    pub fn cancel(&self) {
        self.0.abort();
    }
}

/// Periodic tick source. The first tick lands one full period after the
/// ticker is created.
#[derive(Debug, Clone, Copy)]
pub struct FrameScheduler {
    period: Duration,
    missed: MissedTick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissedTick {
    /// Drop late frames; used for animation.
    Skip,
    /// Keep the spacing after a late tick; used for polling.
    Delay,
}

impl FrameScheduler {
    pub fn new(period: Duration, missed: MissedTick) -> Self {
        Self {
            period: period.max(MIN_PERIOD),
            missed,
        }
    }

    pub fn frames(period: Duration) -> Self {
        Self::new(period, MissedTick::Skip)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn ticker(&self) -> Interval {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(match self.missed {
            MissedTick::Skip => MissedTickBehavior::Skip,
            MissedTick::Delay => MissedTickBehavior::Delay,
        });
        ticker
    }
}
