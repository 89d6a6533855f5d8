use std::sync::Arc;

use parking_lot::Mutex;
use rand::{rngs::StdRng, SeedableRng};
use shared::domain::Command;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::{
    animation::AnimationController,
    config::RemoteConfig,
    control::{ControlError, ControlService, HttpControlService},
    dispatcher::{CommandDispatcher, FrameError},
    events::{EventBus, RemoteEvent},
    playback::{PlaybackFlag, PlaybackStatePoller},
    scheduler::TaskHandle,
    track_sync::TrackInfoSync,
};

/// Owns the shared playback flag, the cooldown table (through the
/// dispatcher) and the animation task set, and hands them to the components
/// that need them.
pub struct RemoteSession {
    config: RemoteConfig,
    control: Arc<dyn ControlService>,
    flag: PlaybackFlag,
    events: EventBus,
    animation: Arc<AnimationController>,
    track_sync: Arc<TrackInfoSync>,
    dispatcher: CommandDispatcher,
    poller: Mutex<Option<TaskHandle>>,
}

impl RemoteSession {
    /// Session backed by the HTTP control service at `config.control_url`.
    pub fn connect(config: RemoteConfig) -> Result<Self, ControlError> {
        let control = Arc::new(HttpControlService::with_timeout(
            &config.control_url,
            config.request_timeout,
        )?);
        Ok(Self::new(config, control))
    }

    pub fn new(config: RemoteConfig, control: Arc<dyn ControlService>) -> Self {
        Self::with_rng(config, control, StdRng::from_entropy())
    }

    pub fn with_rng(config: RemoteConfig, control: Arc<dyn ControlService>, rng: StdRng) -> Self {
        let flag = PlaybackFlag::new(false);
        let events = EventBus::new(config.event_capacity);
        let animation = Arc::new(AnimationController::with_rng(
            &config,
            flag.clone(),
            events.clone(),
            rng,
        ));
        let track_sync = Arc::new(TrackInfoSync::new(
            Arc::clone(&control),
            Arc::clone(&animation),
            events.clone(),
        ));
        let dispatcher = CommandDispatcher::new(
            &config,
            Arc::clone(&control),
            flag.clone(),
            Arc::clone(&animation),
            Arc::clone(&track_sync),
            events.clone(),
        );
        Self {
            config,
            control,
            flag,
            events,
            animation,
            track_sync,
            dispatcher,
            poller: Mutex::new(None),
        }
    }

    /// Reads the playback state and the current track once, then starts the
    /// periodic poller. Failures here are logged; the poller keeps trying.
    pub async fn start(&self) {
        let poller = PlaybackStatePoller::new(
            Arc::clone(&self.control),
            self.flag.clone(),
            self.config.poll_interval,
        );
        poller.poll_once().await;
        if let Err(error) = self.track_sync.refresh().await {
            warn!(%error, "initial track sync failed");
            self.events.status(format!("❌ {error}"));
        }

        let handle = poller.spawn();
        if let Some(previous) = self.poller.lock().replace(handle) {
            previous.cancel();
        }
        info!(
            control_url = %self.config.control_url,
            playing = self.flag.is_playing(),
            "remote session started"
        );
    }

    pub fn on_frame(&self, probabilities: &[f32]) -> Result<Vec<Command>, FrameError> {
        self.dispatcher.on_frame(probabilities)
    }

    /// Stops polling and every word task. In-flight requests still complete.
    pub fn shutdown(&self) {
        if let Some(handle) = self.poller.lock().take() {
            handle.cancel();
        }
        self.animation.stop_all();
        info!("remote session stopped");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RemoteEvent> {
        self.events.subscribe()
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    pub fn flag(&self) -> &PlaybackFlag {
        &self.flag
    }

    pub fn animation(&self) -> &AnimationController {
        &self.animation
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    pub fn track_sync(&self) -> &TrackInfoSync {
        &self.track_sync
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
