use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NoActiveDevice,
    NothingPlaying,
}

impl ErrorCode {
    /// HTTP status the control service answers with for this code.
    pub fn http_status(self) -> u16 {
        match self {
            ErrorCode::NoActiveDevice | ErrorCode::NothingPlaying => 404,
        }
    }
}

#[derive(Debug, Error)]
#[error("{code:?}: {message}")]
pub struct ApiException {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiException {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn no_active_device() -> Self {
        Self::new(
            ErrorCode::NoActiveDevice,
            "⚠️ No active device. Start playback on the player first.",
        )
    }

    pub fn nothing_playing() -> Self {
        Self::new(ErrorCode::NothingPlaying, "⚠️ Nothing is playing.")
    }
}
