//! Full configuration validation.
//!
//! Validates numeric ranges and the shape of the server URLs, collecting
//! every problem into one error.

use crate::schema::WatchConfig;
use p2pwatch_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &WatchConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    // Server
    let base = config.server.base_url.trim();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        errors.push(format!(
            "server.base_url = {:?} must start with http:// or https://",
            config.server.base_url
        ));
    }
    validate_not_empty(&mut errors, "server.state_path", &config.server.state_path);
    validate_not_empty(&mut errors, "server.stream_path", &config.server.stream_path);

    // Stream
    validate_range(
        &mut errors,
        "stream.reconnect_delay_ms",
        config.stream.reconnect_delay_ms,
        100,
        60_000,
    );
    validate_range(
        &mut errors,
        "stream.max_reconnect_delay_ms",
        config.stream.max_reconnect_delay_ms,
        100,
        600_000,
    );
    if config.stream.max_reconnect_delay_ms < config.stream.reconnect_delay_ms {
        errors.push(format!(
            "stream.max_reconnect_delay_ms = {} is below stream.reconnect_delay_ms = {}",
            config.stream.max_reconnect_delay_ms, config.stream.reconnect_delay_ms
        ));
    }

    // Display
    validate_range(
        &mut errors,
        "display.tick_interval_ms",
        config.display.tick_interval_ms,
        100,
        60_000,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_range(errors: &mut Vec<String>, name: &str, value: u64, min: u64, max: u64) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

fn validate_not_empty(errors: &mut Vec<String>, name: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{name} must not be empty"));
    }
}

#[cfg(test)]
mod tests;
