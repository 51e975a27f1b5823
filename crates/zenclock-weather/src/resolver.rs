//! Coordinates to panel-ready weather.
//!
//! Reverse geocode once, then walk the area candidates (most precise
//! first) until one yields current conditions. If none does, try the
//! fallback area once; if that also fails, return the "unavailable"
//! placeholder instead of an error. The forecast is always requested for
//! the area that produced the current conditions.

use zenclock_core::WeatherConfig;

use crate::provider::WeatherProvider;
use crate::types::{format_weather, Coordinates, ForecastDay, LiveWeather, WeatherData, WeatherError};

/// Forecast rows shown (today is skipped)
const FORECAST_DAYS: usize = 3;

#[derive(Debug, Clone)]
pub struct WeatherResolver {
    provider: WeatherProvider,
    fallback_area: String,
}

impl WeatherResolver {
    pub fn new(provider: WeatherProvider, fallback_area: impl Into<String>) -> Self {
        Self {
            provider,
            fallback_area: fallback_area.into(),
        }
    }

    pub fn from_config(config: &WeatherConfig) -> Result<Self, WeatherError> {
        Ok(Self::new(WeatherProvider::new(config)?, config.fallback_area.clone()))
    }

    /// Full lookup for `coords`.
    ///
    /// Errors only when reverse geocoding fails; every later failure ends in
    /// a degraded but well-formed [`WeatherData`].
    pub async fn resolve(&self, coords: &Coordinates) -> Result<WeatherData, WeatherError> {
        let area = self.provider.reverse_geocode(coords).await?;
        let candidates = area.candidates();
        Ok(self.fetch_with_fallback(&candidates, area.display_name()).await)
    }

    /// Try `candidates` in order, then the fallback area, then give up with
    /// the placeholder.
    pub async fn fetch_with_fallback(&self, candidates: &[String], location: String) -> WeatherData {
        let (area, live) = match self.first_live(candidates).await {
            Some(found) => found,
            None => {
                tracing::warn!(
                    "Weather fetch failed for all candidates {:?}, falling back to {}",
                    candidates,
                    self.fallback_area
                );
                match self.try_live(&self.fallback_area).await {
                    Some(live) => (self.fallback_area.clone(), live),
                    None => {
                        tracing::error!("Live weather unavailable, even for the fallback area");
                        return WeatherData::unavailable();
                    }
                }
            }
        };

        let forecast = self.forecast_for(&area).await;
        tracing::info!("Weather resolved via area {}", area);
        format_weather(&live, location, forecast)
    }

    async fn first_live(&self, candidates: &[String]) -> Option<(String, LiveWeather)> {
        for area in candidates {
            if let Some(live) = self.try_live(area).await {
                return Some((area.clone(), live));
            }
        }
        None
    }

    async fn try_live(&self, area: &str) -> Option<LiveWeather> {
        match self.provider.live(area).await {
            Ok(Some(live)) => Some(live),
            Ok(None) => {
                tracing::warn!("No live weather for area {}", area);
                None
            }
            Err(e) => {
                tracing::warn!("Live weather fetch failed for area {}: {}", area, e);
                None
            }
        }
    }

    /// Days 2..=4 of the forecast for `area`; empty when the forecast call fails.
    async fn forecast_for(&self, area: &str) -> Vec<ForecastDay> {
        match self.provider.forecast(area).await {
            Ok(casts) => casts
                .iter()
                .skip(1)
                .take(FORECAST_DAYS)
                .map(|c| c.to_forecast_day())
                .collect(),
            Err(e) => {
                tracing::warn!("Forecast fetch failed for area {}: {}", area, e);
                Vec::new()
            }
        }
    }
}
