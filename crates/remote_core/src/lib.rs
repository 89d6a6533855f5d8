//! Core of the gesture remote: turns classifier frames into debounced playback
//! commands, keeps a shared playback flag in sync with the control service, and
//! animates the current track's lyric words while audio plays.

pub mod animation;
pub mod config;
pub mod control;
pub mod cooldown;
pub mod dispatcher;
pub mod events;
pub mod motion;
pub mod playback;
pub mod scheduler;
pub mod session;
pub mod track_sync;

#[cfg(test)]
mod testing;

pub use animation::{AnimationController, WordState};
pub use config::RemoteConfig;
pub use control::{ControlError, ControlService, HttpControlService};
pub use cooldown::CooldownTable;
pub use dispatcher::{CommandDispatcher, FrameError};
pub use events::{EventBus, RemoteEvent};
pub use motion::{Bounds, Vec2};
pub use playback::{PlaybackFlag, PlaybackStatePoller};
pub use session::RemoteSession;
pub use shared::domain::{Command, TrackSnapshot};
pub use track_sync::{RefreshOutcome, TrackInfoSync};
