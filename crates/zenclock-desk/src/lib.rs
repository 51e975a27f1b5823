//! The desk clock itself: ties the clock tick, alarms, siren, weather panel
//! and display state together and drives them from one loop.

pub mod clock;
pub mod command;
pub mod desk;
pub mod display;
pub mod render;
pub mod runner;
pub mod weather_panel;
pub mod weather_service;

pub use clock::ClockFace;
pub use command::Command;
pub use desk::DeskClock;
pub use display::{Background, Controls};
pub use weather_panel::{PanelView, WeatherPanel};
pub use weather_service::{WeatherService, WeatherServiceMessage};
