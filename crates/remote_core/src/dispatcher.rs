//! Classifier frames to playback commands.
//!
//! Every class whose probability clears the threshold is a candidate in the
//! same frame; candidates are not mutually exclusive. Each candidate is then
//! gated by its own cooldown. Accepted commands go to the control service in
//! the background, and their local side effects (playback flag, animation,
//! delayed track refresh) are applied immediately, whatever the network
//! outcome.

use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use shared::domain::Command;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::{
    animation::AnimationController,
    config::RemoteConfig,
    control::{ControlError, ControlService},
    cooldown::CooldownTable,
    events::{EventBus, RemoteEvent},
    playback::PlaybackFlag,
    scheduler::TaskHandle,
    track_sync::TrackInfoSync,
};

#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("expected {expected} class probabilities, got {actual}")]
    WrongLength { expected: usize, actual: usize },
}

pub struct CommandDispatcher {
    threshold: f32,
    navigation_refresh_delay: Duration,
    cooldowns: Mutex<CooldownTable>,
    control: Arc<dyn ControlService>,
    flag: PlaybackFlag,
    animation: Arc<AnimationController>,
    track_sync: Arc<TrackInfoSync>,
    events: EventBus,
}

impl CommandDispatcher {
    pub fn new(
        config: &RemoteConfig,
        control: Arc<dyn ControlService>,
        flag: PlaybackFlag,
        animation: Arc<AnimationController>,
        track_sync: Arc<TrackInfoSync>,
        events: EventBus,
    ) -> Self {
        Self {
            threshold: config.threshold,
            navigation_refresh_delay: config.navigation_refresh_delay,
            cooldowns: Mutex::new(CooldownTable::new(config.cooldown)),
            control,
            flag,
            animation,
            track_sync,
            events,
        }
    }

    pub fn on_frame(&self, probabilities: &[f32]) -> Result<Vec<Command>, FrameError> {
        self.on_frame_at(probabilities, Instant::now())
    }

    /// Returns the commands accepted in this frame, in class order.
    pub fn on_frame_at(
        &self,
        probabilities: &[f32],
        now: Instant,
    ) -> Result<Vec<Command>, FrameError> {
        if probabilities.len() != Command::ALL.len() {
            return Err(FrameError::WrongLength {
                expected: Command::ALL.len(),
                actual: probabilities.len(),
            });
        }
        self.events.emit(RemoteEvent::Predictions(
            Command::ALL
                .iter()
                .copied()
                .zip(probabilities.iter().copied())
                .collect(),
        ));

        Ok(self
            .candidates(probabilities)
            .into_iter()
            .filter(|command| self.attempt_dispatch(*command, now))
            .collect())
    }

    /// Commands whose class probability is strictly above the threshold.
    pub fn candidates(&self, probabilities: &[f32]) -> Vec<Command> {
        probabilities
            .iter()
            .enumerate()
            .filter(|(_, probability)| **probability > self.threshold)
            .filter_map(|(index, _)| Command::from_class_index(index))
            .collect()
    }

    /// Dispatches `command` unless it is still cooling down. A rejected
    /// attempt has no effect at all.
    pub fn attempt_dispatch(&self, command: Command, now: Instant) -> bool {
        if !self.cooldowns.lock().try_consume(command, now) {
            trace!(%command, "command suppressed by cooldown");
            return false;
        }

        info!(%command, "dispatching command");
        self.events.emit(RemoteEvent::CommandAccepted(command));
        self.deliver(command);
        self.apply_side_effects(command);
        true
    }

    pub fn last_dispatch(&self, command: Command) -> Option<Instant> {
        self.cooldowns.lock().last_dispatch(command)
    }

    fn deliver(&self, command: Command) {
        self.events.status(format!("⏳ Sending: {command}..."));
        let control = Arc::clone(&self.control);
        let events = self.events.clone();
        tokio::spawn(async move {
            match control.send_command(command).await {
                Ok(reply) => {
                    debug!(%command, %reply, "command delivered");
                    events.status(reply);
                }
                Err(error) => {
                    warn!(%command, %error, "command delivery failed");
                    events.status(failure_status(command, &error));
                }
            }
        });
    }

    fn apply_side_effects(&self, command: Command) {
        match command {
            Command::Next | Command::Previous => {
                let track_sync = Arc::clone(&self.track_sync);
                // Detached: the refresh runs even if the handle is dropped.
                TaskHandle::after(self.navigation_refresh_delay, async move {
                    if let Err(error) = track_sync.refresh().await {
                        warn!(%command, %error, "track refresh after navigation failed");
                    }
                });
            }
            Command::Pause => {
                self.flag.set(false);
                self.animation.stop_all();
            }
            Command::Play => {
                self.flag.set(true);
                self.animation.resume_all();
            }
            Command::VolumeUp | Command::VolumeDown => {}
        }
    }
}

fn failure_status(command: Command, error: &ControlError) -> String {
    match error.service_message() {
        Some(message) => message.to_string(),
        None => format!("❌ Failed to send {command}"),
    }
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
