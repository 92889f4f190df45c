//! Tests for client configuration loading.

use std::fs;
use std::time::Duration;
use strictly_sync::ClientConfig;
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let config = ClientConfig::default();
    assert_eq!(config.url(), "ws://127.0.0.1:3000");
    assert_eq!(*config.move_timeout_ms(), 10_000);
    assert_eq!(config.move_timeout(), Some(Duration::from_secs(10)));
    assert_eq!(config.log_filter(), "info");
}

#[test]
fn test_empty_file_uses_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("client.toml");
    fs::write(&path, "").expect("Write failed");

    let config = ClientConfig::from_file(&path).expect("Load failed");
    assert_eq!(config, ClientConfig::default());
}

#[test]
fn test_file_overrides_fields() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("client.toml");
    fs::write(
        &path,
        r#"url = "ws://game.local:9001"
move_timeout_ms = 0
log_filter = "strictly_sync=debug"
"#,
    )
    .expect("Write failed");

    let config = ClientConfig::from_file(&path).expect("Load failed");
    assert_eq!(config.url(), "ws://game.local:9001");
    assert_eq!(config.move_timeout(), None);
    assert_eq!(config.log_filter(), "strictly_sync=debug");
}

#[test]
fn test_invalid_toml_fails() {
    let result = ClientConfig::from_toml("url = [unterminated");
    assert!(result.is_err());
}

#[test]
fn test_wrong_type_fails() {
    let result = ClientConfig::from_toml(r#"move_timeout_ms = "soon""#);
    assert!(result.is_err());
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config =
        ClientConfig::load_or_default(dir.path().join("absent.toml")).expect("Defaults expected");
    assert_eq!(config, ClientConfig::default());
    assert!(ClientConfig::from_file(dir.path().join("absent.toml")).is_err());
}

#[test]
fn test_builder_overrides() {
    let config = ClientConfig::default()
        .with_url("ws://localhost:4000")
        .with_move_timeout_ms(250);
    assert_eq!(config.url(), "ws://localhost:4000");
    assert_eq!(config.move_timeout(), Some(Duration::from_millis(250)));
}
