//! Desk controller.
//!
//! Owns every piece of mutable clock state: the alarm list and its store,
//! the per-minute matcher, the siren, the currently ringing alarm, display
//! state and the weather panel. The run loop feeds it clock readings and
//! user commands; nothing here reads the clock itself.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use zenclock_alarm::{Alarm, AlarmBook, AlarmMatcher, AlarmStore, Siren};
use zenclock_core::{AppError, Config};

use crate::display::{Background, Controls};
use crate::weather_panel::WeatherPanel;

pub const FOOTER: &str = "ZenClock v2.0";

pub struct DeskClock {
    book: AlarmBook,
    store: AlarmStore,
    matcher: AlarmMatcher,
    siren: Siren,
    ringing: Option<Alarm>,
    fullscreen: bool,
    controls: Controls,
    background: Background,
    weather: WeatherPanel,
}

impl DeskClock {
    /// Build the desk from config, loading saved alarms.
    pub fn new(config: &Config, siren: Siren) -> Self {
        let store = AlarmStore::new(config.alarm_store_path());
        let book = AlarmBook::new(store.load());

        Self {
            book,
            store,
            matcher: AlarmMatcher::new(),
            siren,
            ringing: None,
            fullscreen: false,
            controls: Controls::new(Duration::from_secs(config.display.controls_hide_secs)),
            background: Background::new(&config.display),
            weather: WeatherPanel::new(),
        }
    }

    /// One clock tick. Returns the alarm that started ringing, if any.
    pub fn tick(&mut self, now: &NaiveDateTime, at: Instant) -> Option<Alarm> {
        self.controls.tick(at);

        let alarm = self.matcher.check(now, self.book.alarms())?;
        tracing::info!("Alarm ringing: {}", alarm.time);
        self.ringing = Some(alarm.clone());
        self.siren.start();
        Some(alarm)
    }

    /// Stop the ringing alarm.
    pub fn dismiss(&mut self) {
        if self.ringing.take().is_some() {
            tracing::info!("Alarm dismissed");
        }
        self.siren.stop();
    }

    /// User did something: show the controls and make sure the siren can play.
    pub fn interact(&mut self, at: Instant) {
        self.controls.interact(at);
        self.siren.unlock();
    }

    pub fn add_alarm(&mut self, time: &str, label: Option<String>) -> Result<Alarm> {
        let mut next = self.book.clone();
        let alarm = next.add(time, label)?;
        self.commit(next)?;
        Ok(alarm)
    }

    /// Returns false if no alarm matched `id` (exact or unique prefix).
    pub fn toggle_alarm(&mut self, id: &str) -> Result<bool> {
        let Some(id) = self.book.resolve_id(id).map(str::to_string) else {
            return Ok(false);
        };
        let mut next = self.book.clone();
        next.toggle(&id);
        self.commit(next)?;
        Ok(true)
    }

    /// Returns false if no alarm matched `id` (exact or unique prefix).
    pub fn delete_alarm(&mut self, id: &str) -> Result<bool> {
        let Some(id) = self.book.resolve_id(id).map(str::to_string) else {
            return Ok(false);
        };
        let mut next = self.book.clone();
        next.delete(&id);
        self.commit(next)?;
        Ok(true)
    }

    /// The live list only becomes `next` once `next` is on disk.
    fn commit(&mut self, next: AlarmBook) -> Result<()> {
        self.store
            .save(next.alarms())
            .map_err(AppError::from)
            .with_context(|| format!("saving alarms to {:?}", self.store.path()))?;
        self.book = next;
        Ok(())
    }

    pub fn toggle_fullscreen(&mut self) -> bool {
        self.fullscreen = !self.fullscreen;
        tracing::debug!("Fullscreen: {}", self.fullscreen);
        self.fullscreen
    }

    pub fn refresh_background(&mut self, timestamp_ms: i64) -> &str {
        self.background.refresh(timestamp_ms)
    }

    /// Silence everything; safe to call more than once.
    pub fn shutdown(&mut self) {
        self.ringing = None;
        self.siren.stop();
    }

    pub fn alarms(&self) -> &[Alarm] {
        self.book.alarms()
    }

    pub fn ringing(&self) -> Option<&Alarm> {
        self.ringing.as_ref()
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Footer is only shown outside fullscreen
    pub fn footer(&self) -> Option<&'static str> {
        (!self.fullscreen).then_some(FOOTER)
    }

    pub fn controls_visible(&self) -> bool {
        self.controls.is_visible()
    }

    pub fn background(&self) -> Option<&str> {
        self.background.current()
    }

    pub fn weather(&self) -> &WeatherPanel {
        &self.weather
    }

    pub fn weather_mut(&mut self) -> &mut WeatherPanel {
        &mut self.weather
    }

    pub fn siren(&self) -> &Siren {
        &self.siren
    }
}
