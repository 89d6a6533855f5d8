use std::fmt;

use serde::{Deserialize, Serialize};

/// A playback action the remote can ask the control service to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Play,
    Pause,
    VolumeUp,
    VolumeDown,
    Next,
    Previous,
}

impl Command {
    /// Every command, in classifier output order.
    pub const ALL: [Command; 6] = [
        Command::Play,
        Command::Pause,
        Command::VolumeUp,
        Command::VolumeDown,
        Command::Next,
        Command::Previous,
    ];

    pub fn from_class_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn class_index(self) -> usize {
        match self {
            Command::Play => 0,
            Command::Pause => 1,
            Command::VolumeUp => 2,
            Command::VolumeDown => 3,
            Command::Next => 4,
            Command::Previous => 5,
        }
    }

    /// Route segment on the control service, without the leading slash.
    pub fn as_str(self) -> &'static str {
        match self {
            Command::Play => "play",
            Command::Pause => "pause",
            Command::VolumeUp => "volume/up",
            Command::VolumeDown => "volume/down",
            Command::Next => "next",
            Command::Previous => "previous",
        }
    }

    pub fn path(self) -> String {
        format!("/{}", self.as_str())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSnapshot {
    pub title: String,
    pub artist: String,
    pub album_image: Option<String>,
}

impl TrackSnapshot {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            album_image: None,
        }
    }

    pub fn with_album_image(mut self, url: impl Into<String>) -> Self {
        self.album_image = Some(url.into());
        self
    }

    /// Tracks are the same when title and artist match; artwork is ignored.
    pub fn same_track(&self, other: &TrackSnapshot) -> bool {
        self.title == other.title && self.artist == other.artist
    }
}
