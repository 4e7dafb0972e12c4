//! Logger setup.
//!
//! `env_logger` writing to stderr. The `[log]` config section sets the default
//! level and color style; `RUST_LOG`, when set, replaces the level with its
//! own filter directives (e.g. `RUST_LOG=sdkbridge::native=trace`).

use std::env;

use env_logger::{Builder, WriteStyle};

use crate::config::{LogConfig, LogStyle};

/// Filter directives to apply: `RUST_LOG` if non-empty, else the configured level.
fn filter_directives(config: &LogConfig, rust_log: Option<String>) -> String {
    rust_log
        .filter(|spec| !spec.trim().is_empty())
        .unwrap_or_else(|| config.level.to_string().to_lowercase())
}

fn write_style(style: LogStyle) -> WriteStyle {
    match style {
        LogStyle::Auto => WriteStyle::Auto,
        LogStyle::Always => WriteStyle::Always,
        LogStyle::Never => WriteStyle::Never,
    }
}

/// Installs the global logger. Fails if one is already installed.
pub fn init(config: &LogConfig) -> Result<(), log::SetLoggerError> {
    let directives = filter_directives(config, env::var(env_logger::DEFAULT_FILTER_ENV).ok());

    Builder::new()
        .parse_filters(&directives)
        .write_style(write_style(config.style))
        .format_timestamp_millis()
        .try_init()?;

    log::debug!("logging: filter {:?}", directives);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
