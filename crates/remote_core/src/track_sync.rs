use std::sync::Arc;

use shared::domain::TrackSnapshot;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
    animation::AnimationController,
    control::{ControlError, ControlService},
    events::{EventBus, RemoteEvent},
};

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    NothingPlaying,
    Unchanged(TrackSnapshot),
    Replaced { track: TrackSnapshot, words: usize },
}

/// Keeps the displayed track and the animated lyric words in step with the
/// control service.
pub struct TrackInfoSync {
    control: Arc<dyn ControlService>,
    animation: Arc<AnimationController>,
    events: EventBus,
    last_track: Mutex<Option<TrackSnapshot>>,
}

impl TrackInfoSync {
    pub fn new(
        control: Arc<dyn ControlService>,
        animation: Arc<AnimationController>,
        events: EventBus,
    ) -> Self {
        Self {
            control,
            animation,
            events,
            last_track: Mutex::new(None),
        }
    }

    pub async fn last_track(&self) -> Option<TrackSnapshot> {
        self.last_track.lock().await.clone()
    }

    /// Re-reads the current track; lyrics are fetched and the word set
    /// replaced only when the title or artist changed.
    ///
    /// The known track is locked only to compare and to commit, never across
    /// a request, so a stalled refresh does not hold back later ones. Two
    /// overlapping refreshes of the same new track replace the words once:
    /// the second sees the first one's commit and reports `Unchanged`.
    ///
    /// The known track is only committed once its lyrics have been installed;
    /// a failed lyrics fetch is retried by the next refresh.
    pub async fn refresh(&self) -> Result<RefreshOutcome, ControlError> {
        let Some(track) = self.control.current_track().await? else {
            if self.last_track.lock().await.take().is_some() {
                debug!("current track cleared");
            }
            self.events.emit(RemoteEvent::TrackCleared);
            return Ok(RefreshOutcome::NothingPlaying);
        };

        if let Some(outcome) = self.absorb_known(&mut *self.last_track.lock().await, &track) {
            return Ok(outcome);
        }

        let lyrics = self.control.lyrics().await?;

        let mut last_track = self.last_track.lock().await;
        if let Some(outcome) = self.absorb_known(&mut last_track, &track) {
            return Ok(outcome);
        }
        let words = lyrics.words();
        let count = words.len();
        info!(
            title = %track.title,
            artist = %track.artist,
            words = count,
            "track changed"
        );
        self.events.emit(RemoteEvent::TrackShown(track.clone()));
        self.animation.replace_words(words);
        *last_track = Some(track.clone());

        Ok(RefreshOutcome::Replaced {
            track,
            words: count,
        })
    }

    /// `Unchanged` when `track` is the known track. Only a snapshot that
    /// differs in other fields (artwork) is stored and shown again.
    fn absorb_known(
        &self,
        known: &mut Option<TrackSnapshot>,
        track: &TrackSnapshot,
    ) -> Option<RefreshOutcome> {
        let current = known.as_ref().filter(|known| known.same_track(track))?;
        if current != track {
            self.events.emit(RemoteEvent::TrackShown(track.clone()));
            *known = Some(track.clone());
        }
        Some(RefreshOutcome::Unchanged(track.clone()))
    }
}

#[cfg(test)]
#[path = "tests/track_sync_tests.rs"]
mod tests;
