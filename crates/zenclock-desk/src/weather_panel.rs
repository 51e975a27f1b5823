//! Weather panel state.

use zenclock_core::AppError;
use zenclock_weather::WeatherData;

/// What the panel should show right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelView<'a> {
    Error(&'a str),
    Loading,
    Ready(&'a WeatherData),
    Empty,
}

#[derive(Debug, Clone, Default)]
pub struct WeatherPanel {
    loading: bool,
    data: Option<WeatherData>,
    error: Option<String>,
}

impl WeatherPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fetch has started. Clears a previous error; keeps previous data.
    pub fn begin_loading(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn apply(&mut self, result: Result<WeatherData, AppError>) {
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(e) => {
                tracing::warn!("Weather panel error: {}", e);
                self.error = Some(e.user_message().to_string());
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn data(&self) -> Option<&WeatherData> {
        self.data.as_ref()
    }

    pub fn view(&self) -> PanelView<'_> {
        if let Some(error) = &self.error {
            return PanelView::Error(error);
        }
        match (&self.data, self.loading) {
            (Some(data), _) => PanelView::Ready(data),
            (None, true) => PanelView::Loading,
            (None, false) => PanelView::Empty,
        }
    }
}
