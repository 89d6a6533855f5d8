use serde::Deserialize;
use shared::{
    domain::{Command, TrackSnapshot},
    error::ApiException,
    protocol::LyricsResponse,
};

const VOLUME_STEP: u8 = 10;
const MAX_VOLUME: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlaylistEntry {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album_image: Option<String>,
    #[serde(default)]
    pub lyrics: String,
}

impl PlaylistEntry {
    fn snapshot(&self) -> TrackSnapshot {
        TrackSnapshot {
            title: self.title.clone(),
            artist: self.artist.clone(),
            album_image: self.album_image.clone(),
        }
    }
}

pub fn default_playlist() -> Vec<PlaylistEntry> {
    let entry = |title: &str, artist: &str, lyrics: &str| PlaylistEntry {
        title: title.into(),
        artist: artist.into(),
        album_image: None,
        lyrics: lyrics.into(),
    };
    vec![
        entry(
            "Paper Lanterns",
            "The Night Ferry",
            "light the paper lanterns\nlet them drift across the bay",
        ),
        entry(
            "Static Bloom",
            "Orchard Radio",
            "tune me in through the static\nwatch the signal bloom",
        ),
        entry("Long Exposure", "Vela Quartet", ""),
    ]
}

/// In-memory stand-in for a music player with one controllable device.
#[derive(Debug, Clone)]
pub struct Player {
    playing: bool,
    index: usize,
    volume: u8,
    active_device: bool,
    playlist: Vec<PlaylistEntry>,
}

impl Player {
    pub fn new(playlist: Vec<PlaylistEntry>, volume: u8, active_device: bool) -> Self {
        Self {
            playing: false,
            index: 0,
            volume: volume.min(MAX_VOLUME),
            active_device,
            playlist,
        }
    }

    pub fn with_playing(mut self, playing: bool) -> Self {
        self.playing = playing;
        self
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn set_active_device(&mut self, active: bool) {
        self.active_device = active;
    }

    /// Performs `command` and returns the reply text the service answers with.
    pub fn apply(&mut self, command: Command) -> Result<String, ApiException> {
        if !self.active_device {
            return Err(ApiException::no_active_device());
        }
        let reply = match command {
            Command::Play => {
                self.playing = true;
                "▶️ Playing!".to_string()
            }
            Command::Pause => {
                self.playing = false;
                "⏸️ Paused!".to_string()
            }
            Command::Next => {
                self.step(1);
                "⏭️ Next track!".to_string()
            }
            Command::Previous => {
                self.step(self.playlist.len().saturating_sub(1));
                "⏮️ Previous track!".to_string()
            }
            Command::VolumeUp => {
                self.volume = self.volume.saturating_add(VOLUME_STEP).min(MAX_VOLUME);
                format!("🔊 Volume up: {}%", self.volume)
            }
            Command::VolumeDown => {
                self.volume = self.volume.saturating_sub(VOLUME_STEP);
                format!("🔉 Volume down: {}%", self.volume)
            }
        };
        Ok(reply)
    }

    fn step(&mut self, by: usize) {
        if !self.playlist.is_empty() {
            self.index = (self.index + by) % self.playlist.len();
        }
    }

    /// The current track while playing.
    pub fn current_track(&self) -> Option<TrackSnapshot> {
        if !self.playing {
            return None;
        }
        self.playlist.get(self.index).map(PlaylistEntry::snapshot)
    }

    pub fn lyrics(&self) -> LyricsResponse {
        if !self.playing {
            return LyricsResponse::unavailable("No song playing.");
        }
        match self.playlist.get(self.index) {
            Some(entry) if !entry.lyrics.trim().is_empty() => LyricsResponse::new(&entry.lyrics),
            Some(_) => LyricsResponse::unavailable("Lyrics unavailable."),
            None => LyricsResponse::unavailable("No song playing."),
        }
    }
}
