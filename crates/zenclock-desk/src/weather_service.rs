//! Weather backend: async weather fetching.
//! Network work runs on spawned tasks; results come back over a channel.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use zenclock_core::{AppError, Component, ComponentContext};
use zenclock_weather::{Coordinates, WeatherData, WeatherResolver};

/// Messages sent from async operations back to the desk loop
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Result of resolving weather for the configured location
    FetchDone(Result<WeatherData, AppError>),
}

/// Clonable handle; every clone shares the channel and the shutdown token.
#[derive(Clone)]
pub struct WeatherService {
    resolver: Arc<WeatherResolver>,
    tx: mpsc::UnboundedSender<WeatherServiceMessage>,
    cancel: CancellationToken,
}

impl WeatherService {
    pub fn new(resolver: WeatherResolver) -> (Self, mpsc::UnboundedReceiver<WeatherServiceMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let service = Self {
            resolver: Arc::new(resolver),
            tx,
            cancel: CancellationToken::new(),
        };
        (service, rx)
    }

    /// Start a lookup for `coords`. Sends `FetchDone` when complete, unless
    /// the service was shut down first, in which case the result is dropped.
    pub fn request_fetch(&self, coords: Coordinates) {
        if self.cancel.is_cancelled() {
            tracing::debug!("Weather service shut down, ignoring fetch request");
            return;
        }

        let resolver = self.resolver.clone();
        let tx = self.tx.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("Weather fetch abandoned on shutdown");
                }
                result = resolver.resolve(&coords) => {
                    if cancel.is_cancelled() {
                        return;
                    }
                    let result = result.map_err(AppError::from);
                    let _ = tx.send(WeatherServiceMessage::FetchDone(result));
                }
            }
        });
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Component for WeatherService {
    fn id(&self) -> &str {
        "weather"
    }

    fn name(&self) -> &str {
        "Weather service"
    }

    fn initialize(&mut self, _ctx: &ComponentContext) -> anyhow::Result<()> {
        Ok(())
    }

    fn shutdown(&mut self) -> anyhow::Result<()> {
        self.cancel.cancel();
        Ok(())
    }
}
