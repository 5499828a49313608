//! Tests for the full validation pipeline.

use super::*;

#[test]
fn default_config_validates() {
    let config = WatchConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_non_http_base_url() {
    let mut config = WatchConfig::default();
    config.server.base_url = "ws://127.0.0.1:3000".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("server.base_url"));
}

#[test]
fn catches_empty_paths() {
    let mut config = WatchConfig::default();
    config.server.state_path = String::new();
    config.server.stream_path = "  ".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("server.state_path"));
    assert!(err.contains("server.stream_path"));
}

#[test]
fn catches_reconnect_delay_too_small() {
    let mut config = WatchConfig::default();
    config.stream.reconnect_delay_ms = 10;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("stream.reconnect_delay_ms"));
}

#[test]
fn catches_max_delay_below_base() {
    let mut config = WatchConfig::default();
    config.stream.reconnect_delay_ms = 5000;
    config.stream.max_reconnect_delay_ms = 2000;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("is below stream.reconnect_delay_ms"));
}

#[test]
fn catches_tick_interval_out_of_range() {
    let mut config = WatchConfig::default();
    config.display.tick_interval_ms = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("display.tick_interval_ms"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = WatchConfig::default();
    config.display.tick_interval_ms = 0;
    config.stream.reconnect_delay_ms = 1;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("; "));
}
