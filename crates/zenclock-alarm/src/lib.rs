//! Alarm list, per-minute alarm matching and the siren for ZenClock.

pub mod alarm;
pub mod matcher;
pub mod siren;
pub mod store;

pub use alarm::{Alarm, AlarmBook, AlarmError, AlarmTime};
pub use matcher::AlarmMatcher;
pub use siren::{Siren, SirenPattern, TerminalBell, ToneSink};
pub use store::AlarmStore;
