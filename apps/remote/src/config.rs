use std::{
    fmt::Display,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use anyhow::{ensure, Context};
use remote_core::{motion::SpeedRange, Bounds, RemoteConfig};
use serde::Deserialize;
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "remote.toml";

/// Values given on the command line; they win over file and environment.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub control_url: Option<String>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    control_url: Option<String>,
    threshold: Option<f32>,
    cooldown_ms: Option<u64>,
    poll_interval_ms: Option<u64>,
    navigation_refresh_delay_ms: Option<u64>,
    frame_period_ms: Option<u64>,
    request_timeout_ms: Option<u64>,
    width: Option<f32>,
    height: Option<f32>,
    speed_min: Option<f32>,
    speed_max: Option<f32>,
    glyph_width: Option<f32>,
    line_height: Option<f32>,
    event_capacity: Option<usize>,
}

pub fn load_config(path: Option<&Path>, cli: &CliOverrides) -> anyhow::Result<RemoteConfig> {
    load_config_from(path, |key| std::env::var(key).ok(), cli)
}

/// Defaults, then the toml file, then `APP__*` variables, then `cli`.
///
/// An explicit `path` must exist; the default `remote.toml` is optional.
pub fn load_config_from(
    path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
    cli: &CliOverrides,
) -> anyhow::Result<RemoteConfig> {
    let mut config = RemoteConfig::default();

    let file = match path {
        Some(path) => Some(path.to_path_buf()),
        None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|path| path.exists()),
    };
    if let Some(path) = file {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        let file_cfg: FileSettings = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config '{}'", path.display()))?;
        apply_file(&mut config, file_cfg);
    }

    apply_env(&mut config, &env);

    if let Some(v) = &cli.control_url {
        config.control_url = v.clone();
    }
    if let Some(v) = cli.width {
        config.display.width = v;
    }
    if let Some(v) = cli.height {
        config.display.height = v;
    }

    validate(&config)?;
    Ok(config)
}

fn apply_file(config: &mut RemoteConfig, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.control_url {
        config.control_url = v;
    }
    if let Some(v) = file_cfg.threshold {
        config.threshold = v;
    }
    if let Some(v) = file_cfg.cooldown_ms {
        config.cooldown = Duration::from_millis(v);
    }
    if let Some(v) = file_cfg.poll_interval_ms {
        config.poll_interval = Duration::from_millis(v);
    }
    if let Some(v) = file_cfg.navigation_refresh_delay_ms {
        config.navigation_refresh_delay = Duration::from_millis(v);
    }
    if let Some(v) = file_cfg.frame_period_ms {
        config.frame_period = Duration::from_millis(v);
    }
    if let Some(v) = file_cfg.request_timeout_ms {
        config.request_timeout = Duration::from_millis(v);
    }
    if let Some(v) = file_cfg.width {
        config.display.width = v;
    }
    if let Some(v) = file_cfg.height {
        config.display.height = v;
    }
    if let Some(v) = file_cfg.speed_min {
        config.speed.min = v;
    }
    if let Some(v) = file_cfg.speed_max {
        config.speed.max = v;
    }
    if let Some(v) = file_cfg.glyph_width {
        config.glyph_width = v;
    }
    if let Some(v) = file_cfg.line_height {
        config.line_height = v;
    }
    if let Some(v) = file_cfg.event_capacity {
        config.event_capacity = v;
    }
}

fn apply_env(config: &mut RemoteConfig, env: &impl Fn(&str) -> Option<String>) {
    if let Some(v) = env("APP__CONTROL_URL") {
        config.control_url = v;
    }
    parsed(env, "APP__THRESHOLD", &mut config.threshold);
    millis(env, "APP__COOLDOWN_MS", &mut config.cooldown);
    millis(env, "APP__POLL_INTERVAL_MS", &mut config.poll_interval);
    millis(
        env,
        "APP__NAVIGATION_REFRESH_DELAY_MS",
        &mut config.navigation_refresh_delay,
    );
    millis(env, "APP__FRAME_PERIOD_MS", &mut config.frame_period);
    millis(env, "APP__REQUEST_TIMEOUT_MS", &mut config.request_timeout);

    let Bounds { width, height } = &mut config.display;
    parsed(env, "APP__WIDTH", width);
    parsed(env, "APP__HEIGHT", height);

    let SpeedRange { min, max } = &mut config.speed;
    parsed(env, "APP__SPEED_MIN", min);
    parsed(env, "APP__SPEED_MAX", max);
}

fn parsed<T>(env: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut T)
where
    T: FromStr,
    T::Err: Display,
{
    let Some(raw) = env(key) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => *slot = value,
        Err(error) => warn!(key, value = %raw, %error, "ignoring invalid config override"),
    }
}

fn millis(env: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut Duration) {
    let mut value = slot.as_millis() as u64;
    parsed(env, key, &mut value);
    *slot = Duration::from_millis(value);
}

fn validate(config: &RemoteConfig) -> anyhow::Result<()> {
    ensure!(
        config.display.width > 0.0 && config.display.height > 0.0,
        "display must have a positive size, got {}x{}",
        config.display.width,
        config.display.height
    );
    ensure!(
        (0.0..=1.0).contains(&config.threshold),
        "threshold must be within [0, 1], got {}",
        config.threshold
    );
    ensure!(
        config.speed.min >= 0.0 && config.speed.min <= config.speed.max,
        "speed range is empty: [{}, {})",
        config.speed.min,
        config.speed.max
    );
    ensure!(
        !config.request_timeout.is_zero(),
        "request timeout must be positive"
    );
    ensure!(config.event_capacity > 0, "event_capacity must be positive");
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
