//! Error types shared across ZenClock crates.
//!
//! Each failure the clock can surface maps to one short line of text via
//! `user_message()`; the full error goes to the log.

use thiserror::Error;

/// Any failure the desk or the CLI reports to the user.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Alarm storage: {0}")]
    Storage(#[from] StorageError),

    #[error("Config: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather: {0}")]
    Weather(#[from] WeatherError),
}

impl AppError {
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Storage(_) => "Alarms could not be saved.",
            AppError::Config(ConfigError::Invalid(_)) => "Invalid configuration. Check your settings.",
            AppError::Config(ConfigError::ParseError(_)) => {
                "Configuration file is malformed. Check your settings."
            }
            AppError::Weather(e) => e.user_message(),
        }
    }
}

/// Transport-level failure classes for HTTP calls.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("request timed out")]
    Timeout,

    #[error("HTTP {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    InvalidResponse(String),
}

/// Writing the alarm list failed.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cannot write {path}: {message}")]
    WriteFailed { path: String, message: String },

    #[error("cannot encode alarms: {0}")]
    Serialize(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid settings: {0}")]
    Invalid(String),

    #[error("cannot parse config file: {0}")]
    ParseError(String),
}

/// Why the weather panel has nothing to show.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("location sharing is off")]
    LocationDenied,

    #[error("no coordinates available")]
    LocationUnsupported,

    #[error("reverse geocode rejected: {0}")]
    GeocodeFailed(String),

    #[error("weather request failed: {0}")]
    ApiError(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::LocationDenied => "Location access denied.",
            WeatherError::LocationUnsupported => "Geolocation not supported.",
            WeatherError::GeocodeFailed(_) | WeatherError::ApiError(_) => {
                "Unable to fetch weather."
            }
        }
    }
}

/// Classify a reqwest failure for logging.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            return NetworkError::Timeout;
        }
        if self.is_decode() {
            return NetworkError::InvalidResponse(self.to_string());
        }
        match self.status() {
            Some(status) => NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            },
            None => NetworkError::ConnectionFailed(self.to_string()),
        }
    }
}
