//! TOML configuration.
//!
//! ```toml
//! [log]
//! level = "debug"   # off | error | warn | info | debug | trace
//! style = "auto"    # auto | always | never
//! ```
//!
//! Every section and key is optional. Unknown keys are rejected so typos do
//! not pass silently. Lookup order for the file: `--config <path>`, then
//! `SDKBRIDGE_CONFIG`, then `sdkbridge.toml` in the working directory; when
//! none is present the defaults apply.

use std::fs;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::{Deserialize, Deserializer};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "SDKBRIDGE_CONFIG";

/// File looked up in the working directory when no path is given.
pub const DEFAULT_FILE: &str = "sdkbridge.toml";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Syntax or schema error; the message carries line and column.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Default filter; `RUST_LOG` overrides it when set.
    #[serde(deserialize_with = "level_filter")]
    pub level: LevelFilter,
    pub style: LogStyle,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: LevelFilter::Info,
            style: LogStyle::Auto,
        }
    }
}

/// Whether log output is colored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStyle {
    /// Color when stderr is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

fn level_filter<'de, D: Deserializer<'de>>(deserializer: D) -> Result<LevelFilter, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse()
        .map_err(|_| serde::de::Error::custom(format!("unknown log level {raw:?}")))
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_toml_str(&text)
    }

    /// Loads the first config file found, or the defaults.
    ///
    /// An explicit path or `SDKBRIDGE_CONFIG` must exist; the working
    /// directory fallback is optional.
    pub fn discover(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        if let Some(path) = explicit {
            return Config::load(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
            return Config::load(Path::new(&path));
        }
        let fallback = Path::new(DEFAULT_FILE);
        if fallback.is_file() {
            return Config::load(fallback);
        }
        Ok(Config::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.log.level, LevelFilter::Info);
        assert_eq!(config.log.style, LogStyle::Auto);
    }

    #[test]
    fn log_section_is_parsed() {
        let config = Config::from_toml_str(
            r#"
            [log]
            level = "trace"
            style = "never"
            "#,
        )
        .unwrap();
        assert_eq!(config.log.level, LevelFilter::Trace);
        assert_eq!(config.log.style, LogStyle::Never);
    }

    #[test]
    fn level_is_case_insensitive() {
        let config = Config::from_toml_str("[log]\nlevel = \"WARN\"\n").unwrap();
        assert_eq!(config.log.level, LevelFilter::Warn);
    }

    #[test]
    fn unknown_level_is_rejected_with_location() {
        let err = Config::from_toml_str("[log]\nlevel = \"loud\"\n").unwrap_err();
        let text = err.to_string();
        assert!(text.contains("unknown log level \"loud\""), "{text}");
        assert!(text.contains("line 2"), "{text}");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = Config::from_toml_str("[log]\nlevle = \"info\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sdkbridge.toml");
        fs::write(&path, "[log]\nlevel = \"debug\"\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.log.level, LevelFilter::Debug);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = Config::discover(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }
}
