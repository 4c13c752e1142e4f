//! Integration tests for loading config and state files.

use std::fs;

use sanetap::sync::State;
use sanetap::{Error, RenderErrorPolicy, StreamKind, TapConfig};
use tempfile::TempDir;

#[test]
fn test_config_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{
            "stream_name": "sane_space_nodes",
            "edgedb_host": "localhost",
            "edgedb_port": 5656,
            "edgedb_user": "edgedb",
            "edgedb_secret_key": "nbwt1_secret",
            "edgedb_client_tls_security": "insecure",
            "start_date": "2023-06-01T00:00:00Z",
            "file_base_url": "https://files.example.com/",
            "on_render_error": "skip"
        }"#,
    )
    .unwrap();

    let config = TapConfig::from_file(&path).unwrap();
    assert_eq!(config.selected_streams().unwrap(), vec![StreamKind::SpaceNodes]);
    assert_eq!(config.connection_target().as_deref(), Some("localhost:5656"));
    assert_eq!(config.on_render_error, RenderErrorPolicy::Skip);
    assert_eq!(config.start_date().to_rfc3339(), "2023-06-01T00:00:00+00:00");
    assert_eq!(
        config.render_options().file_url("k1"),
        "https://files.example.com/k1"
    );
    assert!(!format!("{:?}", config).contains("nbwt1_secret"));
}

#[test]
fn test_missing_config_file() {
    let dir = TempDir::new().unwrap();
    let err = TapConfig::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_state_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");

    let mut state = State::new();
    state.advance(
        StreamKind::Spaces,
        "2024-04-01T00:00:00Z".parse().unwrap(),
    );
    fs::write(&path, serde_json::to_string(&state).unwrap()).unwrap();

    let loaded = State::from_file(&path).unwrap();
    assert_eq!(loaded, state);
}
