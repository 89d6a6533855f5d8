use std::time::Duration;

use crate::motion::{Bounds, SpeedRange};

pub const DEFAULT_CONTROL_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_THRESHOLD: f32 = 0.90;
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(1000);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);
pub const DEFAULT_NAVIGATION_REFRESH_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_FRAME_PERIOD: Duration = Duration::from_millis(16);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Tunables for a [`crate::RemoteSession`].
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteConfig {
    pub control_url: String,
    /// A class fires when its probability is strictly above this value.
    pub threshold: f32,
    pub cooldown: Duration,
    pub poll_interval: Duration,
    /// Wait after Next/Previous before re-reading the current track.
    pub navigation_refresh_delay: Duration,
    pub frame_period: Duration,
    /// Upper bound on any single control-service request.
    pub request_timeout: Duration,
    pub display: Bounds,
    pub speed: SpeedRange,
    pub glyph_width: f32,
    pub line_height: f32,
    pub event_capacity: usize,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            control_url: DEFAULT_CONTROL_URL.into(),
            threshold: DEFAULT_THRESHOLD,
            cooldown: DEFAULT_COOLDOWN,
            poll_interval: DEFAULT_POLL_INTERVAL,
            navigation_refresh_delay: DEFAULT_NAVIGATION_REFRESH_DELAY,
            frame_period: DEFAULT_FRAME_PERIOD,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            display: Bounds::new(1280.0, 720.0),
            speed: SpeedRange::new(0.3, 0.8),
            glyph_width: 9.0,
            line_height: 18.0,
            event_capacity: 1024,
        }
    }
}
