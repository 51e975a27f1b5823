use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{AppError, ConfigError};

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application configuration directory (alarm store lives here)
    pub config_dir: PathBuf,

    pub alarms: AlarmsConfig,

    pub weather: WeatherConfig,

    pub location: LocationConfig,

    pub display: DisplayConfig,

    pub siren: SirenConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmsConfig {
    /// Alarm list file name, relative to `config_dir`
    pub store_file: String,
}

impl Default for AlarmsConfig {
    fn default() -> Self {
        Self {
            store_file: "zenclock_alarms.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Amap REST base URL
    pub api_base_url: String,

    /// Amap web-service key. Left out of the written file when empty;
    /// `ZENCLOCK_AMAP_KEY` fills it in at load time.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_key: String,

    /// Area code tried after every resolved candidate failed (Beijing)
    pub fallback_area: String,

    /// Refresh interval in minutes (0 = fetch once at startup)
    pub refresh_minutes: u32,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://restapi.amap.com".to_string(),
            api_key: String::new(),
            fallback_area: "110000".to_string(),
            refresh_minutes: 30,
            request_timeout_secs: 10,
        }
    }
}

pub const AMAP_KEY_ENV: &str = "ZENCLOCK_AMAP_KEY";

impl WeatherConfig {
    /// Take the key from the environment unless the file already has one
    fn apply_env(&mut self) {
        if self.api_key.trim().is_empty() {
            if let Ok(key) = std::env::var(AMAP_KEY_ENV) {
                self.api_key = key;
            }
        }
    }
}

/// Fixed coordinates; the terminal has no geolocation of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// `false` withholds the location from the weather lookup entirely
    pub share: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            share: true,
            latitude: None,
            longitude: None,
        }
    }
}

impl LocationConfig {
    /// Both halves of the coordinate pair, if configured.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Screen size used for background image requests
    pub screen_width: u32,
    pub screen_height: u32,

    /// Seconds of inactivity before controls hide
    pub controls_hide_secs: u64,

    /// Random landscape image service
    pub background_base_url: String,

    /// Background refresh interval in minutes (0 = manual only)
    pub background_refresh_minutes: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            screen_width: 1920,
            screen_height: 1080,
            controls_hide_secs: 3,
            background_base_url: "https://picsum.photos".to_string(),
            background_refresh_minutes: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SirenConfig {
    pub base_hz: f32,
    pub peak_hz: f32,
    /// Siren stops by itself after this many seconds
    pub duration_secs: u64,
}

impl Default for SirenConfig {
    fn default() -> Self {
        Self {
            base_hz: 440.0,
            peak_hz: 880.0,
            duration_secs: 60,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            alarms: AlarmsConfig::default(),
            weather: WeatherConfig::default(),
            location: LocationConfig::default(),
            display: DisplayConfig::default(),
            siren: SirenConfig::default(),
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("zenclock")
}

impl Config {
    /// Load configuration from the default path, creating it if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let mut config = Self::default();
            if let Some(parent) = path.parent() {
                config.config_dir = parent.to_path_buf();
            }
            config.save_to(path)?;
            config.weather.apply_env();
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| AppError::from(ConfigError::ParseError(e.to_string())))?;
        config.weather.apply_env();

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged; errors fail the load.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(AppError::from(ConfigError::Invalid(validation.error_summary())).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.api_base_url, "weather.api_base_url", &mut result);
        self.validate_url(
            &self.display.background_base_url,
            "display.background_base_url",
            &mut result,
        );

        if self.weather.api_key.trim().is_empty() {
            result.add_warning(
                "weather.api_key",
                "No Amap key configured - the weather panel will show placeholders",
            );
        }

        if self.weather.fallback_area.trim().is_empty() {
            result.add_error("weather.fallback_area", "Fallback area code must not be empty");
        }

        if self.weather.refresh_minutes > 1440 {
            result.add_warning(
                "weather.refresh_minutes",
                "Weather refresh interval is more than 24 hours",
            );
        }

        if self.weather.request_timeout_secs == 0 {
            result.add_error("weather.request_timeout_secs", "Timeout must be greater than 0");
        }

        match (self.location.latitude, self.location.longitude) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    result.add_error("location.latitude", "Latitude must be within -90..=90");
                }
                if !(-180.0..=180.0).contains(&lon) {
                    result.add_error("location.longitude", "Longitude must be within -180..=180");
                }
            }
            (None, None) => {
                result.add_warning("location", "No coordinates configured - weather disabled");
            }
            _ => {
                result.add_error("location", "Latitude and longitude must be set together");
            }
        }

        if self.display.screen_width == 0 {
            result.add_error("display.screen_width", "Screen width must be greater than 0");
        }
        if self.display.screen_height == 0 {
            result.add_error("display.screen_height", "Screen height must be greater than 0");
        }

        if self.siren.duration_secs == 0 {
            result.add_warning("siren.duration_secs", "Siren disabled (0 seconds)");
        }
        if self.siren.base_hz <= 0.0 || self.siren.peak_hz <= 0.0 {
            result.add_error("siren", "Siren frequencies must be positive");
        }

        if self.alarms.store_file.trim().is_empty() {
            result.add_error("alarms.store_file", "Alarm store file name must not be empty");
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Full path of the alarm list file
    pub fn alarm_store_path(&self) -> PathBuf {
        self.config_dir.join(&self.alarms.store_file)
    }

    /// Save configuration to the default path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("zenclock");

        Ok(config_dir.join("config.toml"))
    }
}
