use super::{load_config_from, CliOverrides};

use std::{
    collections::HashMap,
    env, fs,
    path::PathBuf,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use remote_core::RemoteConfig;

fn temp_config(tag: &str, contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("remote_{tag}_{suffix}.toml"));
    fs::write(&path, contents).expect("write config");
    path
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn file_values_replace_defaults() {
    let path = temp_config(
        "file",
        r#"
control_url = "http://player.local:3000"
cooldown_ms = 1500
width = 800.0
speed_max = 1.2
"#,
    );
    let config = load_config_from(Some(&path), no_env, &CliOverrides::default()).expect("load");
    fs::remove_file(&path).expect("cleanup");

    assert_eq!(config.control_url, "http://player.local:3000");
    assert_eq!(config.cooldown, Duration::from_millis(1500));
    assert_eq!(config.display.width, 800.0);
    assert_eq!(config.display.height, 720.0);
    assert_eq!(config.speed.max, 1.2);
    assert_eq!(config.threshold, RemoteConfig::default().threshold);
}

#[test]
fn env_then_cli_take_precedence() {
    let path = temp_config("layers", "control_url = \"http://from-file\"\nwidth = 640.0\n");
    let vars = HashMap::from([
        ("APP__CONTROL_URL", "http://from-env"),
        ("APP__WIDTH", "1024"),
        ("APP__POLL_INTERVAL_MS", "2500"),
        ("APP__REQUEST_TIMEOUT_MS", "750"),
    ]);
    let cli = CliOverrides {
        control_url: Some("http://from-cli".into()),
        ..CliOverrides::default()
    };

    let config =
        load_config_from(Some(&path), |key| vars.get(key).map(|v| v.to_string()), &cli)
            .expect("load");
    fs::remove_file(&path).expect("cleanup");

    assert_eq!(config.control_url, "http://from-cli");
    assert_eq!(config.display.width, 1024.0);
    assert_eq!(config.poll_interval, Duration::from_millis(2500));
    assert_eq!(config.request_timeout, Duration::from_millis(750));
}

#[test]
fn invalid_env_numbers_are_ignored() {
    let vars = HashMap::from([("APP__THRESHOLD", "high"), ("APP__COOLDOWN_MS", "-5")]);
    let config = load_config_from(
        None,
        |key| vars.get(key).map(|v| v.to_string()),
        &CliOverrides::default(),
    )
    .expect("load");

    assert_eq!(config.threshold, 0.90);
    assert_eq!(config.cooldown, Duration::from_millis(1000));
}

#[test]
fn explicit_missing_file_is_an_error() {
    let path = env::temp_dir().join("remote_definitely_missing.toml");
    assert!(load_config_from(Some(&path), no_env, &CliOverrides::default()).is_err());
}

#[test]
fn nonsensical_display_is_rejected() {
    let cli = CliOverrides {
        height: Some(0.0),
        ..CliOverrides::default()
    };
    let err = load_config_from(None, no_env, &cli).expect_err("zero height");
    assert!(err.to_string().contains("positive size"), "{err}");
}
