//! Amap weather REST client.

use reqwest::{Client, Response};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use zenclock_core::WeatherConfig;

use crate::types::{ForecastCast, LiveWeather, WeatherError};

const USER_AGENT: &str = "ZenClock/0.1.0";

#[derive(Debug, Deserialize)]
struct LiveResponse {
    status: String,
    #[serde(default)]
    info: String,
    #[serde(default)]
    lives: Vec<LiveWeather>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    status: String,
    #[serde(default)]
    forecasts: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    #[serde(default)]
    casts: Vec<ForecastCast>,
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl WeatherProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// GET `{base}{path}?key=..&params`, failing on transport errors and non-2xx.
    pub(crate) async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<Response, WeatherError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?
            .error_for_status()?;
        Ok(response)
    }

    /// Current conditions for an area code or name.
    ///
    /// `Ok(None)` means the provider answered but had nothing for `area`.
    pub async fn live(&self, area: &str) -> Result<Option<LiveWeather>, WeatherError> {
        if area.trim().is_empty() {
            return Ok(None);
        }

        let response = self
            .get(
                "/v3/weather/weatherInfo",
                &[("city", area), ("extensions", "base")],
            )
            .await?;

        let body: LiveResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(format!("live weather response: {}", e)))?;

        if body.status != "1" {
            tracing::debug!("Live weather for {} rejected: {}", area, body.info);
            return Ok(None);
        }

        Ok(body.lives.into_iter().next())
    }

    /// Multi-day forecast for an area; today is the first entry.
    pub async fn forecast(&self, area: &str) -> Result<Vec<ForecastCast>, WeatherError> {
        let response = self
            .get(
                "/v3/weather/weatherInfo",
                &[("city", area), ("extensions", "all")],
            )
            .await?;

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(format!("forecast response: {}", e)))?;

        if body.status != "1" {
            return Ok(Vec::new());
        }

        Ok(body
            .forecasts
            .into_iter()
            .next()
            .map(|f| f.casts)
            .unwrap_or_default())
    }
}
