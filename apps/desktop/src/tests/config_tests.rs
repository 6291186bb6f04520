use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_config(label: &str, contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("ladder_view_{label}_{suffix}.toml"));
    fs::write(&path, contents).expect("write config");
    path
}

fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn defaults_point_at_local_backend() {
    let settings = Settings::default();
    assert_eq!(settings.api_base_url, "http://localhost:8001");
    assert_eq!(settings.request_timeout(), Duration::from_secs(10));
    assert_eq!(settings.log_filter, "info");
}

#[test]
fn file_values_fill_in_over_defaults() {
    let path = temp_config(
        "file_values",
        r#"
api_base_url = "http://ladder.internal:9000"
request_timeout_secs = 3
"#,
    );

    let settings = load_settings_with(Some(path.as_path()), vars(&[])).expect("settings");
    fs::remove_file(&path).expect("cleanup");

    assert_eq!(settings.api_base_url, "http://ladder.internal:9000");
    assert_eq!(settings.request_timeout_secs, 3);
    assert_eq!(settings.asset_base_url, Settings::default().asset_base_url);
}

#[test]
fn environment_overrides_file() {
    let path = temp_config(
        "env_overrides",
        "api_base_url = \"http://from-file:1\"\nlog_filter = \"warn\"\n",
    );

    let settings = load_settings_with(
        Some(path.as_path()),
        vars(&[
            ("LADDER_API_URL", "http://legacy:2"),
            ("APP__API_BASE_URL", "http://from-env:3"),
            ("APP__LOG_FILTER", "debug"),
            ("APP__REQUEST_TIMEOUT_SECS", "25"),
        ]),
    )
    .expect("settings");
    fs::remove_file(&path).expect("cleanup");

    assert_eq!(settings.api_base_url, "http://from-env:3");
    assert_eq!(settings.log_filter, "debug");
    assert_eq!(settings.request_timeout_secs, 25);
}

#[test]
fn unparseable_timeout_override_is_ignored() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        vars(&[
            ("LADDER_API_URL", "http://legacy:2"),
            ("APP__REQUEST_TIMEOUT_SECS", "soon"),
        ]),
    );

    assert_eq!(settings.api_base_url, "http://legacy:2");
    assert_eq!(settings.request_timeout_secs, 10);
}

#[test]
fn explicit_config_path_must_exist() {
    let missing = env::temp_dir().join("ladder_view_config_missing.toml");
    let err = load_settings_with(Some(missing.as_path()), vars(&[])).expect_err("missing file");
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn malformed_config_is_reported() {
    let path = temp_config("malformed", "request_timeout_secs = \"ten\"");
    let err = load_settings_with(Some(path.as_path()), vars(&[])).expect_err("bad toml");
    fs::remove_file(&path).expect("cleanup");
    assert!(err.to_string().contains("failed to parse config file"));
}

#[test]
fn zero_timeout_is_clamped() {
    let settings = Settings {
        request_timeout_secs: 0,
        ..Settings::default()
    };
    assert_eq!(settings.request_timeout(), Duration::from_secs(1));
}
