//! Configuration validation.
//!
//! Checks numeric ranges and address shapes, collecting every problem into a
//! single `ConfigError`.

mod helpers;


use std::net::IpAddr;

use crate::schema::PeekConfig;
use peek_common::ConfigError;

use helpers::validate_range_u64;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &PeekConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_server(&mut errors, config);
    validate_render(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_server(errors: &mut Vec<String>, config: &PeekConfig) {
    let host = config.server.host.trim();
    if host != "localhost" && host.parse::<IpAddr>().is_err() {
        errors.push(format!(
            "server.host = {host:?} is not an IP address or \"localhost\""
        ));
    }

    validate_range_u64(
        errors,
        "server.idle_timeout_ms",
        config.server.idle_timeout_ms,
        100,
        3_600_000,
    );
    validate_range_u64(
        errors,
        "server.max_frame_bytes",
        config.server.max_frame_bytes as u64,
        1024,
        1024 * 1024 * 1024,
    );
}

fn validate_render(errors: &mut Vec<String>, config: &PeekConfig) {
    if config
        .render
        .wikilink_whitespace
        .chars()
        .any(char::is_whitespace)
    {
        errors.push("render.wikilink_whitespace must not contain whitespace".into());
    }
}
