//! Where the clock is. A terminal has no geolocation service, so the only
//! source is the configured coordinate pair, and only when sharing is on.

use zenclock_core::LocationConfig;

use crate::types::{Coordinates, LocationError};

/// Coordinates for the weather lookup, read once at startup.
pub fn get_current_location(config: &LocationConfig) -> Result<Coordinates, LocationError> {
    if !config.share {
        return Err(LocationError::PermissionDenied);
    }
    let (latitude, longitude) = config.coordinates().ok_or(LocationError::Unsupported)?;
    let coords = Coordinates::new(latitude, longitude);
    if !coords.is_valid() {
        return Err(LocationError::Invalid(latitude, longitude));
    }
    Ok(coords)
}
