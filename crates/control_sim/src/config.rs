use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;
use tracing::warn;

use crate::player::{default_playlist, PlaylistEntry};

pub const DEFAULT_SETTINGS_FILE: &str = "control_sim.toml";
const MAX_VOLUME: u8 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub bind_addr: String,
    pub volume: u8,
    pub active_device: bool,
    pub playing: bool,
    pub playlist: Vec<PlaylistEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".into(),
            volume: 100,
            active_device: true,
            playing: false,
            playlist: default_playlist(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    volume: Option<u8>,
    active_device: Option<bool>,
    playing: Option<bool>,
    #[serde(default, rename = "track")]
    tracks: Vec<PlaylistEntry>,
}

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(DEFAULT_SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the toml file when it exists, then `APP__SIM_*` overrides.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        let file_cfg: FileSettings = toml::from_str(&raw)
            .with_context(|| format!("failed to parse '{}'", path.display()))?;
        if let Some(v) = file_cfg.bind_addr {
            settings.bind_addr = v;
        }
        if let Some(v) = file_cfg.volume {
            settings.volume = v;
        }
        if let Some(v) = file_cfg.active_device {
            settings.active_device = v;
        }
        if let Some(v) = file_cfg.playing {
            settings.playing = v;
        }
        if !file_cfg.tracks.is_empty() {
            settings.playlist = file_cfg.tracks;
        }
    }

    if let Some(v) = env("APP__SIM_BIND_ADDR") {
        settings.bind_addr = v;
    }
    if let Some(v) = env("APP__SIM_VOLUME") {
        match v.parse::<u8>() {
            Ok(parsed) if parsed <= MAX_VOLUME => settings.volume = parsed,
            Ok(parsed) => warn!(value = parsed, "ignoring APP__SIM_VOLUME above {MAX_VOLUME}"),
            Err(error) => warn!(value = %v, %error, "ignoring APP__SIM_VOLUME"),
        }
    }
    if let Some(v) = env("APP__SIM_ACTIVE_DEVICE") {
        match v.parse::<bool>() {
            Ok(parsed) => settings.active_device = parsed,
            Err(error) => warn!(value = %v, %error, "ignoring APP__SIM_ACTIVE_DEVICE"),
        }
    }
    if let Some(v) = env("APP__SIM_PLAYING") {
        match v.parse::<bool>() {
            Ok(parsed) => settings.playing = parsed,
            Err(error) => warn!(value = %v, %error, "ignoring APP__SIM_PLAYING"),
        }
    }

    settings.volume = settings.volume.min(MAX_VOLUME);
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
