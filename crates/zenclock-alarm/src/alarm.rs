//! Alarm records and the in-memory alarm list.

use chrono::Timelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlarmError {
    #[error("Invalid alarm time '{0}', expected HH:MM")]
    InvalidTime(String),
}

/// Wall-clock time of day with minute precision, written as zero-padded `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AlarmTime {
    hour: u8,
    minute: u8,
}

impl AlarmTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, AlarmError> {
        if hour > 23 || minute > 59 {
            return Err(AlarmError::InvalidTime(format!("{}:{}", hour, minute)));
        }
        Ok(Self { hour, minute })
    }

    /// Truncate a clock reading to its minute.
    pub fn of<T: Timelike>(now: &T) -> Self {
        // Timelike guarantees hour < 24 and minute < 60
        Self {
            hour: now.hour() as u8,
            minute: now.minute() as u8,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl fmt::Display for AlarmTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for AlarmTime {
    type Err = AlarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AlarmError::InvalidTime(s.to_string());

        let (h, m) = s.split_once(':').ok_or_else(invalid)?;
        if h.len() != 2 || m.len() != 2 {
            return Err(invalid());
        }
        if !s.bytes().all(|b| b.is_ascii_digit() || b == b':') {
            return Err(invalid());
        }
        let hour: u8 = h.parse().map_err(|_| invalid())?;
        let minute: u8 = m.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl TryFrom<String> for AlarmTime {
    type Error = AlarmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AlarmTime> for String {
    fn from(value: AlarmTime) -> Self {
        value.to_string()
    }
}

/// A single alarm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alarm {
    pub id: String,
    pub time: AlarmTime,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Alarm {
    /// New enabled alarm with a fresh id.
    pub fn new(time: AlarmTime, label: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            time,
            enabled: true,
            label,
        }
    }
}

/// Ordered alarm list.
///
/// Sorted by time of day when an alarm is added; toggling and deleting keep
/// the current order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlarmBook {
    alarms: Vec<Alarm>,
}

impl AlarmBook {
    pub fn new(alarms: Vec<Alarm>) -> Self {
        Self { alarms }
    }

    pub fn alarms(&self) -> &[Alarm] {
        &self.alarms
    }

    pub fn get(&self, id: &str) -> Option<&Alarm> {
        self.alarms.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }

    /// Add an enabled alarm and re-sort the list by time.
    pub fn add(&mut self, time: &str, label: Option<String>) -> Result<Alarm, AlarmError> {
        let time: AlarmTime = time.trim().parse()?;
        let label = label.map(|l| l.trim().to_string()).filter(|l| !l.is_empty());
        let alarm = Alarm::new(time, label);

        self.alarms.push(alarm.clone());
        self.alarms.sort_by(|a, b| a.time.cmp(&b.time));

        tracing::info!("Added alarm {} at {}", alarm.id, time);
        Ok(alarm)
    }

    /// Flip `enabled` for the alarm with `id`. Returns false if no alarm matched.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.alarms.iter_mut().find(|a| a.id == id) {
            Some(alarm) => {
                alarm.enabled = !alarm.enabled;
                tracing::debug!("Alarm {} enabled={}", id, alarm.enabled);
                true
            }
            None => false,
        }
    }

    /// Remove the alarm with `id`. Returns false if no alarm matched.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.alarms.len();
        self.alarms.retain(|a| a.id != id);
        self.alarms.len() != before
    }

    /// Resolve a user-typed id: exact match first, then a unique prefix.
    pub fn resolve_id(&self, needle: &str) -> Option<&str> {
        if let Some(alarm) = self.get(needle) {
            return Some(&alarm.id);
        }
        let mut matches = self.alarms.iter().filter(|a| a.id.starts_with(needle));
        match (matches.next(), matches.next()) {
            (Some(only), None) if !needle.is_empty() => Some(&only.id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_parse_time() {
        let t: AlarmTime = "07:05".parse().unwrap();
        assert_eq!((t.hour(), t.minute()), (7, 5));
        assert_eq!(t.to_string(), "07:05");
    }

    #[test]
    fn test_parse_time_rejects_malformed() {
        for bad in ["7:05", "24:00", "12:60", "1200", "ab:cd", "", "12:5"] {
            assert!(bad.parse::<AlarmTime>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_time_of_clock_reading() {
        let now = NaiveTime::from_hms_opt(9, 3, 59).unwrap();
        assert_eq!(AlarmTime::of(&now).to_string(), "09:03");
    }

    #[test]
    fn test_alarm_serializes_time_as_string() {
        let alarm = Alarm {
            id: "1".to_string(),
            time: "06:30".parse().unwrap(),
            enabled: true,
            label: None,
        };
        let json = serde_json::to_string(&alarm).unwrap();
        assert_eq!(json, r#"{"id":"1","time":"06:30","enabled":true}"#);
    }

    #[test]
    fn test_add_sorts_by_time() {
        let mut book = AlarmBook::default();
        book.add("08:00", None).unwrap();
        book.add("06:30", Some("gym".into())).unwrap();
        book.add("23:59", None).unwrap();

        let times: Vec<String> = book.alarms().iter().map(|a| a.time.to_string()).collect();
        assert_eq!(times, vec!["06:30", "08:00", "23:59"]);
        assert!(book.alarms().iter().all(|a| a.enabled));
        assert_eq!(book.alarms()[0].label.as_deref(), Some("gym"));
    }

    #[test]
    fn test_add_assigns_unique_ids() {
        let mut book = AlarmBook::default();
        let a = book.add("07:00", None).unwrap().id;
        let b = book.add("07:00", None).unwrap().id;
        assert_ne!(a, b);
    }

    #[test]
    fn test_add_rejects_invalid_time() {
        let mut book = AlarmBook::default();
        assert!(book.add("25:00", None).is_err());
        assert!(book.is_empty());
    }

    #[test]
    fn test_double_toggle_restores_state() {
        let mut book = AlarmBook::default();
        let id = book.add("07:00", None).unwrap().id;

        assert!(book.toggle(&id));
        assert!(!book.get(&id).unwrap().enabled);
        assert!(book.toggle(&id));
        assert!(book.get(&id).unwrap().enabled);
    }

    #[test]
    fn test_toggle_and_delete_unknown_id() {
        let mut book = AlarmBook::default();
        book.add("07:00", None).unwrap();
        assert!(!book.toggle("missing"));
        assert!(!book.delete("missing"));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_mutations_keep_order() {
        let mut book = AlarmBook::new(vec![
            Alarm::new("09:00".parse().unwrap(), None),
            Alarm::new("07:00".parse().unwrap(), None),
        ]);
        let first = book.alarms()[0].id.clone();
        let second = book.alarms()[1].id.clone();

        book.toggle(&first);
        assert_eq!(book.alarms()[0].id, first);

        assert!(book.delete(&first));
        assert_eq!(book.alarms()[0].id, second);
    }

    #[test]
    fn test_resolve_id_prefix() {
        let mut book = AlarmBook::default();
        let id = book.add("07:00", None).unwrap().id;
        assert_eq!(book.resolve_id(&id[..8]), Some(id.as_str()));
        assert_eq!(book.resolve_id(""), None);
        assert_eq!(book.resolve_id("zzzz"), None);
    }
}
