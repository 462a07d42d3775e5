// src/config/validate.rs

use std::net::SocketAddr;
use std::time::Duration;

use crate::config::model::{PluginOptions, RawOptions};
use crate::errors::{Result, WatchError};

impl TryFrom<RawOptions> for PluginOptions {
    type Error = WatchError;

    fn try_from(raw: RawOptions) -> std::result::Result<Self, Self::Error> {
        validate_debounce(&raw)?;
        validate_build_command(&raw)?;
        validate_source_suffix(&raw)?;
        let reload_addr = parse_reload_addr(&raw)?;

        Ok(PluginOptions::new_unchecked(
            raw.build_command,
            raw.cwd,
            Duration::from_millis(raw.debounce_ms),
            raw.source_suffix,
            reload_addr,
        ))
    }
}

fn validate_debounce(raw: &RawOptions) -> Result<()> {
    if raw.debounce_ms == 0 {
        return Err(WatchError::ConfigError(
            "debounce_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_build_command(raw: &RawOptions) -> Result<()> {
    if let Some(cmd) = &raw.build_command {
        if cmd.split_whitespace().next().is_none() {
            return Err(WatchError::ConfigError(
                "build_command must name an executable (got an empty string)".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_source_suffix(raw: &RawOptions) -> Result<()> {
    if raw.source_suffix.is_empty() {
        return Err(WatchError::ConfigError(
            "source_suffix must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn parse_reload_addr(raw: &RawOptions) -> Result<SocketAddr> {
    raw.server.addr.parse().map_err(|e| {
        WatchError::ConfigError(format!(
            "[server].addr '{}' is not a socket address: {e}",
            raw.server.addr
        ))
    })
}
