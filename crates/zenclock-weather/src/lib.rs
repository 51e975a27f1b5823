//! Weather for ZenClock
//!
//! Resolves coordinates to an administrative area with Amap reverse
//! geocoding, then fetches current conditions and a short forecast,
//! degrading to a placeholder rather than failing.

pub mod geocode;
pub mod location;
pub mod provider;
pub mod resolver;
pub mod types;

pub use location::get_current_location;
pub use provider::WeatherProvider;
pub use resolver::WeatherResolver;
pub use types::*;
