use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TTL_MILLIS: u64 = 300_000;
pub const DEFAULT_REQUEST_TIMEOUT_MILLIS: u64 = 10_000;
pub const DEFAULT_REFRESH_INTERVAL_MILLIS: u64 = 300_000;

const MAX_TTL_MILLIS: u64 = 24 * 60 * 60 * 1000;
const MAX_REQUEST_TIMEOUT_MILLIS: u64 = 5 * 60 * 1000;
const MAX_REFRESH_INTERVAL_MILLIS: u64 = 24 * 60 * 60 * 1000;

/// Validated, immutable weather settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherConfig {
    base_url: String,
    ttl_millis: u64,
    request_timeout_millis: u64,
    refresh_interval_millis: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            ttl_millis: DEFAULT_TTL_MILLIS,
            request_timeout_millis: DEFAULT_REQUEST_TIMEOUT_MILLIS,
            refresh_interval_millis: DEFAULT_REFRESH_INTERVAL_MILLIS,
        }
    }
}

impl WeatherConfig {
    pub fn new(
        base_url: impl Into<String>,
        ttl_millis: u64,
        request_timeout_millis: u64,
        refresh_interval_millis: u64,
    ) -> Result<Self, ConfigError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }

        check("ttl_millis", ttl_millis, MAX_TTL_MILLIS)?;
        check(
            "request_timeout_millis",
            request_timeout_millis,
            MAX_REQUEST_TIMEOUT_MILLIS,
        )?;
        check(
            "refresh_interval_millis",
            refresh_interval_millis,
            MAX_REFRESH_INTERVAL_MILLIS,
        )?;

        Ok(Self {
            base_url,
            ttl_millis,
            request_timeout_millis,
            refresh_interval_millis,
        })
    }

    /// Base URL of the site serving `/api/weather`, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn ttl_millis(&self) -> u64 {
        self.ttl_millis
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_millis)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_millis)
    }
}

fn check(field: &'static str, value: u64, max: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Zero { field });
    }
    if value > max {
        return Err(ConfigError::TooLarge { field, value, max });
    }
    Ok(())
}

/// Settings as stored on disk. Every field is optional; missing ones fall back to defaults.
///
/// Example TOML:
/// base_url = "https://chautari.example.com"
/// ttl_millis = 300000
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub ttl_millis: Option<u64>,
    pub request_timeout_millis: Option<u64>,
    pub refresh_interval_millis: Option<u64>,
}

impl ConfigFile {
    /// Resolve into validated settings.
    pub fn to_weather_config(&self) -> Result<WeatherConfig, ConfigError> {
        WeatherConfig::new(
            self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
            self.ttl_millis.unwrap_or(DEFAULT_TTL_MILLIS),
            self.request_timeout_millis
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MILLIS),
            self.refresh_interval_millis
                .unwrap_or(DEFAULT_REFRESH_INTERVAL_MILLIS),
        )
    }

    /// Read the saved settings. A missing file yields all-`None` fields, which
    /// `to_weather_config` resolves to the built-in defaults.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: ConfigFile = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.to_weather_config()
            .context("Refusing to save invalid configuration")?;

        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(path = %path.display(), "Saved config file");
        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("np", "batoko-chautari", "chautari")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = ConfigFile::default()
            .to_weather_config()
            .expect("defaults must validate");

        assert_eq!(cfg, WeatherConfig::default());
        assert_eq!(cfg.ttl_millis(), 300_000);
        assert_eq!(cfg.request_timeout(), Duration::from_secs(10));
        assert_eq!(cfg.refresh_interval(), Duration::from_secs(300));
    }

    #[test]
    fn rejects_zero_values() {
        let err = WeatherConfig::new("http://x", 0, 10, 10).unwrap_err();
        assert_eq!(err, ConfigError::Zero { field: "ttl_millis" });

        let err = WeatherConfig::new("http://x", 10, 0, 10).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Zero {
                field: "request_timeout_millis"
            }
        );

        let err = WeatherConfig::new("http://x", 10, 10, 0).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Zero {
                field: "refresh_interval_millis"
            }
        );
    }

    #[test]
    fn rejects_oversized_timeout() {
        let err = WeatherConfig::new("http://x", 10, 3_600_000, 10).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::TooLarge {
                field: "request_timeout_millis",
                ..
            }
        ));
    }

    #[test]
    fn trims_base_url() {
        let cfg = WeatherConfig::new(" https://chautari.example.com/ ", 1, 1, 1).expect("valid");
        assert_eq!(cfg.base_url(), "https://chautari.example.com");

        assert_eq!(
            WeatherConfig::new("  ", 1, 1, 1).unwrap_err(),
            ConfigError::EmptyBaseUrl
        );
    }

    #[test]
    fn parses_partial_toml() {
        let file: ConfigFile = toml::from_str(
            r#"
            base_url = "https://chautari.example.com"
            ttl_millis = 60000
            "#,
        )
        .expect("valid toml");

        let cfg = file.to_weather_config().expect("valid config");
        assert_eq!(cfg.ttl_millis(), 60_000);
        assert_eq!(cfg.request_timeout(), Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MILLIS));
    }
}
