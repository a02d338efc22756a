//! Configuration loading and management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ag_live::DriverSettings;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use url::Url;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Liveness endpoint polled with `?eventId=...`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_url: Option<Url>,

    /// Clock resolution in milliseconds.
    pub tick_interval_ms: u64,

    /// Liveness poll cadence in milliseconds.
    pub poll_interval_ms: u64,

    /// Upper bound on one liveness request in milliseconds.
    pub poll_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            status_url: None,
            tick_interval_ms: 1_000,
            poll_interval_ms: 300,
            poll_timeout_ms: 5_000,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (AGENDA_*)
        figment = figment.merge(Env::prefixed("AGENDA_"));

        figment.extract()
    }

    /// Driver timings, with zero values replaced by defaults.
    pub fn driver_settings(&self) -> DriverSettings {
        let defaults = DriverSettings::default();
        DriverSettings {
            tick_interval: millis_or(self.tick_interval_ms, defaults.tick_interval),
            poll_interval: millis_or(self.poll_interval_ms, defaults.poll_interval),
            poll_timeout: millis_or(self.poll_timeout_ms, defaults.poll_timeout),
        }
    }
}

fn millis_or(ms: u64, fallback: Duration) -> Duration {
    if ms == 0 {
        fallback
    } else {
        Duration::from_millis(ms)
    }
}

/// Returns the platform-specific config directory for agenda.
///
/// On Linux: `~/.config/agenda`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("agenda"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    #[test]
    fn test_default_driver_settings_match_runtime_defaults() {
        assert_eq!(Config::default().driver_settings(), DriverSettings::default());
    }

    #[test]
    fn test_zero_intervals_fall_back_to_defaults() {
        let config = Config {
            tick_interval_ms: 0,
            poll_interval_ms: 0,
            poll_timeout_ms: 0,
            ..Config::default()
        };
        assert_eq!(config.driver_settings(), DriverSettings::default());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
status_url = "https://api.example.com/stream-status"
poll_interval_ms = 750
"#
        )
        .unwrap();
        file.flush().unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();
        assert_eq!(
            config.status_url.as_ref().map(Url::as_str),
            Some("https://api.example.com/stream-status")
        );
        assert_eq!(
            config.driver_settings().poll_interval,
            Duration::from_millis(750)
        );
    }

    #[test]
    fn test_dirs_config_path_ends_with_agenda() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "agenda");
    }
}
