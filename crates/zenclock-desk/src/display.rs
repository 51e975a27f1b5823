//! Display state that is not about time or weather: control visibility and
//! the background slideshow.

use std::time::{Duration, Instant};

use zenclock_core::DisplayConfig;

/// On-screen controls: visible at start, shown again on any interaction,
/// hidden once the user has been idle for `hide_after`.
#[derive(Debug, Clone)]
pub struct Controls {
    visible: bool,
    hide_after: Duration,
    hide_at: Option<Instant>,
}

impl Controls {
    pub fn new(hide_after: Duration) -> Self {
        Self {
            visible: true,
            hide_after,
            hide_at: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn interact(&mut self, at: Instant) {
        self.visible = true;
        self.hide_at = Some(at + self.hide_after);
    }

    pub fn tick(&mut self, at: Instant) {
        if matches!(self.hide_at, Some(deadline) if at >= deadline) {
            self.visible = false;
            self.hide_at = None;
        }
    }
}

/// Random landscape backdrop, re-requested with a cache-busting timestamp.
#[derive(Debug, Clone)]
pub struct Background {
    base_url: String,
    width: u32,
    height: u32,
    current: Option<String>,
}

impl Background {
    pub fn new(config: &DisplayConfig) -> Self {
        Self {
            base_url: config.background_base_url.trim_end_matches('/').to_string(),
            width: config.screen_width,
            height: config.screen_height,
            current: None,
        }
    }

    pub fn url_for(&self, timestamp_ms: i64) -> String {
        format!(
            "{}/{}/{}?nature,landscape&blur=3&t={}",
            self.base_url, self.width, self.height, timestamp_ms
        )
    }

    /// Pick a new image.
    pub fn refresh(&mut self, timestamp_ms: i64) -> &str {
        let url = self.url_for(timestamp_ms);
        tracing::debug!("Background -> {}", url);
        self.current.insert(url)
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controls_visible_until_first_idle_timeout() {
        let start = Instant::now();
        let mut controls = Controls::new(Duration::from_secs(3));

        controls.tick(start + Duration::from_secs(60));
        assert!(controls.is_visible());

        controls.interact(start);
        controls.tick(start + Duration::from_secs(2));
        assert!(controls.is_visible());
        controls.tick(start + Duration::from_secs(3));
        assert!(!controls.is_visible());
    }

    #[test]
    fn test_interaction_extends_deadline() {
        let start = Instant::now();
        let mut controls = Controls::new(Duration::from_secs(3));

        controls.interact(start);
        controls.interact(start + Duration::from_secs(2));
        controls.tick(start + Duration::from_secs(4));
        assert!(controls.is_visible());
        controls.tick(start + Duration::from_secs(5));
        assert!(!controls.is_visible());
    }

    #[test]
    fn test_background_url_uses_screen_size_and_timestamp() {
        let config = DisplayConfig {
            screen_width: 2560,
            screen_height: 1440,
            background_base_url: "https://picsum.photos/".into(),
            ..DisplayConfig::default()
        };
        let mut bg = Background::new(&config);
        assert!(bg.current().is_none());

        let url = bg.refresh(1_760_000_000_000).to_string();
        assert_eq!(
            url,
            "https://picsum.photos/2560/1440?nature,landscape&blur=3&t=1760000000000"
        );
        assert_eq!(bg.current(), Some(url.as_str()));
        assert_ne!(bg.refresh(1_760_000_000_001), url);
    }
}
