use serde::{Deserialize, Serialize};
use zenclock_core::{AppError, ReqwestErrorExt};

/// Geographic coordinates in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Amap order: `lon,lat`, six decimals
    pub fn to_amap_location(&self) -> String {
        format!("{:.6},{:.6}", self.longitude, self.latitude)
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Administrative breakdown returned by reverse geocoding.
/// Empty strings mean the provider had no value for that level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaComponents {
    pub adcode: String,
    pub district: String,
    pub city: String,
    pub province: String,
}

impl AreaComponents {
    /// Area identifiers to try, most precise first, without blanks or repeats.
    pub fn candidates(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(4);
        for value in [&self.adcode, &self.district, &self.city, &self.province] {
            let value = value.trim();
            if !value.is_empty() && !out.iter().any(|c| c == value) {
                out.push(value.to_string());
            }
        }
        out
    }

    /// Name shown on the panel: district, then city, then province, then adcode
    pub fn display_name(&self) -> String {
        [&self.district, &self.city, &self.province, &self.adcode]
            .into_iter()
            .find(|v| !v.trim().is_empty())
            .cloned()
            .unwrap_or_default()
    }
}

/// One forecast row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub day: String,
    pub temp: String,
    pub condition: String,
}

/// Everything the weather panel shows, already formatted for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherData {
    pub temp: String,
    pub condition: String,
    pub location: String,
    pub humidity: String,
    pub wind: String,
    pub forecast: Vec<ForecastDay>,
}

impl WeatherData {
    /// Placeholder returned when no area, not even the fallback, produced data
    pub fn unavailable() -> Self {
        Self {
            temp: "--".to_string(),
            condition: "数据不可用".to_string(),
            location: "离线".to_string(),
            humidity: "-".to_string(),
            wind: "-".to_string(),
            forecast: Vec::new(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        *self == Self::unavailable()
    }
}

/// Current conditions record from the provider (`lives[0]`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LiveWeather {
    #[serde(default)]
    pub weather: String,
    #[serde(default)]
    pub temperature: String,
    #[serde(default)]
    pub humidity: String,
    #[serde(default)]
    pub winddirection: String,
    #[serde(default)]
    pub windpower: String,
}

/// One day of the provider forecast (`forecasts[0].casts[i]`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ForecastCast {
    #[serde(default)]
    pub week: String,
    #[serde(default)]
    pub dayweather: String,
    #[serde(default)]
    pub nightweather: String,
    #[serde(default)]
    pub daytemp: String,
    #[serde(default)]
    pub nighttemp: String,
}

impl ForecastCast {
    pub fn to_forecast_day(&self) -> ForecastDay {
        let condition = if self.dayweather == self.nightweather {
            self.dayweather.clone()
        } else {
            format!("{}转{}", self.dayweather, self.nightweather)
        };

        ForecastDay {
            day: weekday_name(&self.week).to_string(),
            temp: format!("{}° / {}°", self.daytemp, self.nighttemp),
            condition,
        }
    }
}

/// Chinese day name for the provider's ISO weekday code ("1" = Monday)
pub fn weekday_name(code: &str) -> &'static str {
    match code.trim() {
        "1" => "周一",
        "2" => "周二",
        "3" => "周三",
        "4" => "周四",
        "5" => "周五",
        "6" => "周六",
        "7" => "周日",
        _ => "未知",
    }
}

/// Assemble panel data from the live record and area names
pub fn format_weather(live: &LiveWeather, location: String, forecast: Vec<ForecastDay>) -> WeatherData {
    WeatherData {
        temp: format!("{}°C", live.temperature),
        condition: live.weather.clone(),
        location,
        humidity: format!("{}%", live.humidity),
        wind: format!("{}风 {}级", live.winddirection, live.windpower),
        forecast,
    }
}

/// Location service errors
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Location sharing is turned off")]
    PermissionDenied,
    #[error("No location source configured")]
    Unsupported,
    #[error("Coordinates out of range: {0}, {1}")]
    Invalid(f64, f64),
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Location error: {0}")]
    Location(#[from] LocationError),
    #[error("Reverse geocode failed: {0}")]
    Geocode(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<WeatherError> for zenclock_core::WeatherError {
    fn from(e: WeatherError) -> Self {
        use zenclock_core::WeatherError as Panel;
        match e {
            WeatherError::Location(LocationError::PermissionDenied) => Panel::LocationDenied,
            WeatherError::Location(_) => Panel::LocationUnsupported,
            WeatherError::Geocode(info) => Panel::GeocodeFailed(info),
            WeatherError::Network(e) => Panel::ApiError(e.into_network_error().to_string()),
            WeatherError::Parse(msg) => Panel::ApiError(msg),
        }
    }
}

impl From<WeatherError> for AppError {
    fn from(e: WeatherError) -> Self {
        AppError::Weather(e.into())
    }
}
