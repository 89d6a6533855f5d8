//! Recording control-service fake shared by the unit tests.

use std::{
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::{
    domain::{Command, TrackSnapshot},
    protocol::LyricsResponse,
};

use crate::{
    config::RemoteConfig,
    control::{ControlError, ControlService},
    motion::Bounds,
};

#[derive(Default)]
pub(crate) struct FakeControl {
    commands: Mutex<Vec<Command>>,
    track: Mutex<Option<TrackSnapshot>>,
    lyrics: Mutex<String>,
    fail_commands: AtomicBool,
    fail_tracks: AtomicBool,
    stall_next_track: AtomicBool,
    track_requests: AtomicUsize,
    lyrics_requests: AtomicUsize,
}

impl FakeControl {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn playing(track: TrackSnapshot, lyrics: &str) -> Self {
        let fake = Self::new();
        fake.set_track(Some(track));
        fake.set_lyrics(lyrics);
        fake
    }

    pub(crate) fn set_track(&self, track: Option<TrackSnapshot>) {
        *self.track.lock() = track;
    }

    pub(crate) fn set_lyrics(&self, lyrics: &str) {
        *self.lyrics.lock() = lyrics.to_string();
    }

    pub(crate) fn fail_commands(&self, fail: bool) {
        self.fail_commands.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_track_requests(&self, fail: bool) {
        self.fail_tracks.store(fail, Ordering::SeqCst);
    }

    /// The next `current_track` call never answers.
    pub(crate) fn stall_next_track_request(&self) {
        self.stall_next_track.store(true, Ordering::SeqCst);
    }

    pub(crate) fn commands(&self) -> Vec<Command> {
        self.commands.lock().clone()
    }

    pub(crate) fn track_requests(&self) -> usize {
        self.track_requests.load(Ordering::SeqCst)
    }

    pub(crate) fn lyrics_requests(&self) -> usize {
        self.lyrics_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ControlService for FakeControl {
    async fn send_command(&self, command: Command) -> Result<String, ControlError> {
        self.commands.lock().push(command);
        if self.fail_commands.load(Ordering::SeqCst) {
            return Err(ControlError::Status {
                status: 404,
                body: "no active device".into(),
            });
        }
        Ok(format!("ok {command}"))
    }

    async fn current_track(&self) -> Result<Option<TrackSnapshot>, ControlError> {
        self.track_requests.fetch_add(1, Ordering::SeqCst);
        if self.stall_next_track.swap(false, Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail_tracks.load(Ordering::SeqCst) {
            return Err(ControlError::Status {
                status: 500,
                body: "upstream failure".into(),
            });
        }
        Ok(self.track.lock().clone())
    }

    async fn lyrics(&self) -> Result<LyricsResponse, ControlError> {
        self.lyrics_requests.fetch_add(1, Ordering::SeqCst);
        Ok(LyricsResponse::new(self.lyrics.lock().clone()))
    }
}

pub(crate) fn test_config() -> RemoteConfig {
    RemoteConfig {
        control_url: "http://127.0.0.1:9".into(),
        display: Bounds::new(400.0, 300.0),
        frame_period: Duration::from_millis(16),
        ..RemoteConfig::default()
    }
}

/// Lets spawned fire-and-forget tasks run to their next real suspension point.
pub(crate) async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}
