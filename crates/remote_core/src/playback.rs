use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use tracing::{debug, warn};

use crate::{
    control::ControlService,
    scheduler::{FrameScheduler, MissedTick, TaskHandle},
};

/// Process-wide "is audio playing" flag. Clones share the same value; the
/// last write wins.
#[derive(Debug, Clone, Default)]
pub struct PlaybackFlag(Arc<AtomicBool>);

impl PlaybackFlag {
    pub fn new(playing: bool) -> Self {
        Self(Arc::new(AtomicBool::new(playing)))
    }

    pub fn is_playing(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Returns the previous value.
    pub fn set(&self, playing: bool) -> bool {
        self.0.swap(playing, Ordering::SeqCst)
    }
}

/// Periodically asks the control service what is playing and writes the
/// answer into the [`PlaybackFlag`].
pub struct PlaybackStatePoller {
    control: Arc<dyn ControlService>,
    flag: PlaybackFlag,
    scheduler: FrameScheduler,
}

impl PlaybackStatePoller {
    pub fn new(control: Arc<dyn ControlService>, flag: PlaybackFlag, interval: Duration) -> Self {
        Self {
            control,
            flag,
            scheduler: FrameScheduler::new(interval, MissedTick::Delay),
        }
    }

    /// One poll. Returns the value written, or `None` when the service could
    /// not be reached and the flag was left alone.
    pub async fn poll_once(&self) -> Option<bool> {
        match self.control.current_track().await {
            Ok(track) => {
                let playing = track.is_some();
                let previous = self.flag.set(playing);
                if previous != playing {
                    debug!(playing, "playback state changed by poll");
                }
                Some(playing)
            }
            Err(error) => {
                warn!(%error, "failed to poll playback state");
                None
            }
        }
    }

    pub fn spawn(self) -> TaskHandle {
        TaskHandle::spawn(async move {
            let mut ticker = self.scheduler.ticker();
            loop {
                ticker.tick().await;
                self.poll_once().await;
            }
        })
    }
}
