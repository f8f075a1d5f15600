use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::join::{JoinMode, JoinSettings};

#[derive(Deserialize, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub esc_quit: bool,

    #[serde(default)]
    pub station: Station,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub join: JoinConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Deserialize, Debug)]
pub struct Station {
    #[serde(default = "default_start_scanning")]
    pub start_scanning: char,

    #[serde(default = "default_refresh")]
    pub refresh: char,
}

impl Default for Station {
    fn default() -> Self {
        Self {
            start_scanning: default_start_scanning(),
            refresh: default_refresh(),
        }
    }
}

fn default_start_scanning() -> char {
    's'
}

fn default_refresh() -> char {
    'r'
}

#[derive(Deserialize, Debug)]
pub struct ScanConfig {
    /// How long to wait for fresh results after requesting a scan
    #[serde(default = "default_results_timeout_ms")]
    pub results_timeout_ms: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            results_timeout_ms: default_results_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_results_timeout_ms() -> u64 {
    10_000
}

fn default_poll_interval_ms() -> u64 {
    500
}

#[derive(Deserialize, Debug)]
pub struct JoinConfig {
    #[serde(default)]
    pub mode: JoinMode,

    /// Association checks after a join request, 0 trusts the request
    #[serde(default = "default_confirm_attempts")]
    pub confirm_attempts: u32,

    #[serde(default = "default_confirm_interval_ms")]
    pub confirm_interval_ms: u64,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            mode: JoinMode::default(),
            confirm_attempts: default_confirm_attempts(),
            confirm_interval_ms: default_confirm_interval_ms(),
        }
    }
}

fn default_confirm_attempts() -> u32 {
    10
}

fn default_confirm_interval_ms() -> u64 {
    1000
}

impl JoinConfig {
    pub fn settings(&self) -> JoinSettings {
        JoinSettings {
            mode: self.mode,
            confirm_attempts: self.confirm_attempts,
            confirm_interval: Duration::from_millis(self.confirm_interval_ms),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load the config file, falling back to defaults when there is none.
    pub fn new(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Config::default()),
            },
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wlscan").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert!(!config.esc_quit);
        assert_eq!(config.station.start_scanning, 's');
        assert_eq!(config.station.refresh, 'r');
        assert_eq!(config.scan.results_timeout_ms, 10_000);
        assert_eq!(config.join.mode, JoinMode::Bssid);
        assert_eq!(config.join.confirm_attempts, 10);
        assert_eq!(config.log.level, "info");
        assert!(config.log.file.is_none());
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
            esc_quit = true

            [station]
            start_scanning = "a"

            [join]
            mode = "ssid"
            confirm_interval_ms = 250
            "#,
        )
        .unwrap();

        assert!(config.esc_quit);
        assert_eq!(config.station.start_scanning, 'a');
        assert_eq!(config.station.refresh, 'r');

        let settings = config.join.settings();
        assert_eq!(settings.mode, JoinMode::Ssid);
        assert_eq!(settings.confirm_attempts, 10);
        assert_eq!(settings.confirm_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_join_mode() {
        assert!(Config::parse("[join]\nmode = \"mac\"\n").is_err());
    }

    #[test]
    fn test_missing_explicit_file() {
        let path = Path::new("/nonexistent/wlscan/config.toml");
        assert!(Config::new(Some(path)).is_err());
    }
}
