//! Once-per-minute alarm matching.
//!
//! The clock polls every second; the matcher turns that into at most one
//! trigger per minute. The marker is a single value shared by every alarm,
//! so when two enabled alarms share a minute only the first in list order
//! rings.

use chrono::Timelike;

use crate::alarm::{Alarm, AlarmTime};

#[derive(Debug, Clone, Default)]
pub struct AlarmMatcher {
    last_matched_minute: Option<AlarmTime>,
}

impl AlarmMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minute of the most recent trigger, if any.
    pub fn last_matched_minute(&self) -> Option<AlarmTime> {
        self.last_matched_minute
    }

    /// Check `alarms` against the clock reading `now`.
    ///
    /// Returns the alarm to ring, or `None`. A minute that already produced a
    /// trigger never produces another; a minute that was never observed is
    /// not made up later.
    pub fn check<T: Timelike>(&mut self, now: &T, alarms: &[Alarm]) -> Option<Alarm> {
        let current = AlarmTime::of(now);
        if self.last_matched_minute == Some(current) {
            return None;
        }

        let matched = alarms.iter().find(|a| a.enabled && a.time == current)?;

        tracing::info!("Alarm {} matched at {}", matched.id, current);
        self.last_matched_minute = Some(current);
        Some(matched.clone())
    }
}
