use serde::{Deserialize, Serialize};

use crate::domain::TrackSnapshot;

/// Leading character the control service uses for "no lyrics" placeholders.
pub const LYRICS_UNAVAILABLE_MARKER: char = '❌';

/// Body of `GET /current-track`. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentTrackResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_image: Option<String>,
}

impl CurrentTrackResponse {
    /// `None` when the service reports nothing playing (missing or blank title).
    pub fn into_snapshot(self) -> Option<TrackSnapshot> {
        let title = self.title.filter(|title| !title.trim().is_empty())?;
        Some(TrackSnapshot {
            title,
            artist: self.artist.unwrap_or_default(),
            album_image: self.album_image.filter(|url| !url.is_empty()),
        })
    }
}

impl From<&TrackSnapshot> for CurrentTrackResponse {
    fn from(value: &TrackSnapshot) -> Self {
        Self {
            title: Some(value.title.clone()),
            artist: Some(value.artist.clone()),
            album_image: value.album_image.clone(),
        }
    }
}

/// Body of `GET /lyrics`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsResponse {
    #[serde(default)]
    pub lyrics: String,
}

impl LyricsResponse {
    pub fn new(lyrics: impl Into<String>) -> Self {
        Self {
            lyrics: lyrics.into(),
        }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self::new(format!("{LYRICS_UNAVAILABLE_MARKER} {reason}"))
    }

    pub fn is_available(&self) -> bool {
        let trimmed = self.lyrics.trim();
        !trimmed.is_empty() && !trimmed.starts_with(LYRICS_UNAVAILABLE_MARKER)
    }

    /// Whitespace-separated words; empty when the lyrics are unavailable.
    pub fn words(&self) -> Vec<String> {
        if !self.is_available() {
            return Vec::new();
        }
        self.lyrics.split_whitespace().map(str::to_string).collect()
    }
}
