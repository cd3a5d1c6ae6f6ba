use super::*;

use std::{
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

fn no_env(_: &str) -> Option<String> {
    None
}

fn temp_settings_file(label: &str, contents: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("directory_settings_{label}_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join(SETTINGS_FILE);
    fs::write(&path, contents).expect("write settings");
    path
}

#[test]
fn missing_file_yields_defaults() {
    let settings = load_settings_from(Path::new("/nonexistent/directory.toml"), no_env);
    assert_eq!(settings, Settings::default());
}

#[test]
fn file_values_override_defaults() {
    let path = temp_settings_file(
        "file_values",
        "api_url = \"http://directory.internal:9000\"\nrequest_timeout_secs = 5\nlog_filter = \"debug\"\n",
    );

    let settings = load_settings_from(&path, no_env);

    assert_eq!(settings.api_url, "http://directory.internal:9000");
    assert_eq!(settings.request_timeout_secs, 5);
    assert_eq!(settings.log_filter, "debug");
    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn env_overrides_file_and_prefixed_key_wins() {
    let path = temp_settings_file("env_overrides", "api_url = \"http://from-file:1\"\n");

    let settings = load_settings_from(&path, |key| match key {
        "DIRECTORY_API_URL" => Some("http://from-env:2".to_string()),
        "APP__API_URL" => Some("http://from-app-env:3".to_string()),
        "APP__REQUEST_TIMEOUT_SECS" => Some("not-a-number".to_string()),
        _ => None,
    });

    assert_eq!(settings.api_url, "http://from-app-env:3");
    assert_eq!(settings.request_timeout_secs, 30);
    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn malformed_file_is_ignored() {
    let path = temp_settings_file("malformed", "api_url = [unterminated");

    let settings = load_settings_from(&path, no_env);

    assert_eq!(settings, Settings::default());
    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}
