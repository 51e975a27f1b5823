//! Reverse geocoding: coordinates to administrative areas via Amap `regeo`.

use serde::{Deserialize, Deserializer};

use crate::provider::WeatherProvider;
use crate::types::{AreaComponents, Coordinates, WeatherError};

#[derive(Debug, Deserialize)]
struct RegeoResponse {
    status: String,
    #[serde(default)]
    info: String,
    regeocode: Option<Regeocode>,
}

#[derive(Debug, Deserialize)]
struct Regeocode {
    #[serde(rename = "addressComponent")]
    address_component: AddressComponent,
}

/// Amap sends `[]` instead of `""` for levels it has no value for
#[derive(Debug, Deserialize)]
struct AddressComponent {
    #[serde(default, deserialize_with = "string_or_first")]
    adcode: String,
    #[serde(default, deserialize_with = "string_or_first")]
    district: String,
    #[serde(default, deserialize_with = "string_or_first")]
    city: String,
    #[serde(default, deserialize_with = "string_or_first")]
    province: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    One(String),
    Many(Vec<String>),
}

fn string_or_first<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<StringOrList>::deserialize(deserializer)? {
        Some(StringOrList::One(s)) => s,
        Some(StringOrList::Many(list)) => list.into_iter().next().unwrap_or_default(),
        None => String::new(),
    })
}

impl WeatherProvider {
    /// Resolve coordinates to `{adcode, district, city, province}`.
    ///
    /// Any failure here is fatal for a weather lookup: there is nothing to
    /// build area candidates from.
    pub async fn reverse_geocode(&self, coords: &Coordinates) -> Result<AreaComponents, WeatherError> {
        let location = coords.to_amap_location();
        let response = self
            .get(
                "/v3/geocode/regeo",
                &[("location", location.as_str()), ("extensions", "base")],
            )
            .await?;

        let body: RegeoResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(format!("regeo response: {}", e)))?;

        if body.status != "1" {
            tracing::error!("Reverse geocode failed: {}", body.info);
            return Err(WeatherError::Geocode(body.info));
        }

        let component = body
            .regeocode
            .ok_or_else(|| WeatherError::Parse("regeo response without regeocode".into()))?
            .address_component;

        let area = AreaComponents {
            adcode: component.adcode,
            district: component.district,
            city: component.city,
            province: component.province,
        };

        tracing::info!("Reverse geocoded {} to {:?}", location, area);
        Ok(area)
    }
}
