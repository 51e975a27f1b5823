//! Plain-text frame for the terminal.

use std::fmt::Write;

use chrono::NaiveDateTime;

use crate::clock::ClockFace;
use crate::desk::DeskClock;
use crate::weather_panel::PanelView;

/// Clear screen and home the cursor
pub const CLEAR: &str = "\x1b[2J\x1b[H";

const CONTROLS_HINT: &str = "[f] 全屏  [b] 换背景  [w] 刷新天气  [a HH:MM] 添加闹钟  [l] 列表  [q] 退出";

pub fn render_frame(desk: &DeskClock, now: &NaiveDateTime) -> String {
    let mut out = String::new();
    let face = ClockFace::at(now);

    if desk.controls_visible() {
        let _ = writeln!(out, "{}", CONTROLS_HINT);
        out.push('\n');
    }

    let _ = writeln!(out, "    {}:{}:{}", face.hours, face.minutes, face.seconds);
    let _ = writeln!(out, "    {}", face.date);
    out.push('\n');

    if let Some(alarm) = desk.ringing() {
        let _ = write!(out, "⏰ 闹钟响了! {}", alarm.time);
        if let Some(label) = &alarm.label {
            let _ = write!(out, "  {}", label);
        }
        let _ = writeln!(out, "  [d] 停止");
        out.push('\n');
    }

    match desk.weather().view() {
        PanelView::Error(message) => {
            let _ = writeln!(out, "{}", message);
        }
        PanelView::Loading => {
            let _ = writeln!(out, "Loading weather...");
        }
        PanelView::Ready(data) => {
            let _ = writeln!(out, "{}  {}  {}", data.location, data.temp, data.condition);
            let _ = writeln!(out, "湿度 {}  {}", data.humidity, data.wind);
            for day in &data.forecast {
                let _ = writeln!(out, "  {}  {}  {}", day.day, day.temp, day.condition);
            }
        }
        PanelView::Empty => {}
    }

    if let Some(url) = desk.background() {
        out.push('\n');
        let _ = writeln!(out, "bg: {}", url);
    }

    if let Some(footer) = desk.footer() {
        out.push('\n');
        let _ = writeln!(out, "{}", footer);
    }

    out
}

/// Alarm list as printed by `l` and `zenclock alarm list`
pub fn render_alarms(alarms: &[zenclock_alarm::Alarm]) -> String {
    if alarms.is_empty() {
        return "No alarms set.\n".to_string();
    }
    let mut out = String::new();
    for alarm in alarms {
        let short_id: String = alarm.id.chars().take(8).collect();
        let _ = write!(
            out,
            "{}  {}  {}",
            short_id,
            alarm.time,
            if alarm.enabled { "on " } else { "off" }
        );
        if let Some(label) = &alarm.label {
            let _ = write!(out, "  {}", label);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use zenclock_alarm::{Siren, SirenPattern, ToneSink};
    use zenclock_core::{Config, WeatherError};
    use zenclock_weather::{ForecastDay, WeatherData};

    struct Mute;

    impl ToneSink for Mute {
        fn tone(&self, _frequency_hz: f32) {}
        fn silence(&self) {}
    }

    fn desk(dir: &std::path::Path) -> DeskClock {
        let config = Config {
            config_dir: dir.to_path_buf(),
            ..Config::default()
        };
        let siren = Siren::new(
            SirenPattern::default(),
            Arc::new(|| Arc::new(Mute) as Arc<dyn ToneSink>),
        );
        DeskClock::new(&config, siren)
    }

    fn monday_morning() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(7, 5, 9)
            .unwrap()
    }

    #[test]
    fn test_idle_frame() {
        let dir = tempfile::tempdir().unwrap();
        let desk = desk(dir.path());
        let frame = render_frame(&desk, &monday_morning());

        assert!(frame.contains("07:05:09"));
        assert!(frame.contains("2026年10月19日星期一"));
        assert!(frame.contains(CONTROLS_HINT));
        assert!(frame.contains("ZenClock v2.0"));
        assert!(!frame.contains("闹钟响了"));
    }

    #[test]
    fn test_fullscreen_and_hidden_controls() {
        let dir = tempfile::tempdir().unwrap();
        let mut desk = desk(dir.path());
        let start = Instant::now();
        desk.toggle_fullscreen();
        desk.interact(start);
        desk.tick(&monday_morning(), start + Duration::from_secs(10));

        let frame = render_frame(&desk, &monday_morning());
        assert!(!frame.contains("ZenClock v2.0"));
        assert!(!frame.contains(CONTROLS_HINT));
    }

    #[test]
    fn test_weather_states() {
        let dir = tempfile::tempdir().unwrap();
        let mut desk = desk(dir.path());

        desk.weather_mut().begin_loading();
        assert!(render_frame(&desk, &monday_morning()).contains("Loading weather..."));

        desk.weather_mut().apply(Ok(WeatherData {
            temp: "18°C".into(),
            condition: "晴".into(),
            location: "朝阳区".into(),
            humidity: "40%".into(),
            wind: "北风 ≤3级".into(),
            forecast: vec![ForecastDay {
                day: "星期二".into(),
                temp: "20°/9°".into(),
                condition: "多云".into(),
            }],
        }));
        let frame = render_frame(&desk, &monday_morning());
        assert!(frame.contains("朝阳区  18°C  晴"));
        assert!(frame.contains("星期二  20°/9°  多云"));

        desk.weather_mut().apply(Err(WeatherError::LocationUnsupported.into()));
        assert!(render_frame(&desk, &monday_morning()).contains("Geolocation not supported."));
    }

    #[tokio::test]
    async fn test_ringing_banner() {
        let dir = tempfile::tempdir().unwrap();
        let mut desk = desk(dir.path());
        desk.add_alarm("07:05", Some("起床".into())).unwrap();
        desk.tick(&monday_morning(), Instant::now());

        let frame = render_frame(&desk, &monday_morning());
        assert!(frame.contains("⏰ 闹钟响了! 07:05  起床  [d] 停止"));

        desk.dismiss();
        assert!(!render_frame(&desk, &monday_morning()).contains("闹钟响了"));
    }

    #[test]
    fn test_background_line() {
        let dir = tempfile::tempdir().unwrap();
        let mut desk = desk(dir.path());
        desk.refresh_background(42);
        assert!(render_frame(&desk, &monday_morning()).contains("&t=42"));
    }

    #[test]
    fn test_alarm_list_with_non_ascii_id() {
        let alarm: zenclock_alarm::Alarm = serde_json::from_str(
            r#"{"id":"早上闹钟提醒一下吧","time":"07:00","enabled":true}"#,
        )
        .unwrap();
        let listing = render_alarms(&[alarm]);
        assert_eq!(listing, "早上闹钟提醒一下  07:00  on \n");
    }

    #[test]
    fn test_alarm_list() {
        let dir = tempfile::tempdir().unwrap();
        let mut desk = desk(dir.path());
        assert_eq!(render_alarms(desk.alarms()), "No alarms set.\n");

        let a = desk.add_alarm("09:15", None).unwrap();
        desk.toggle_alarm(&a.id).unwrap();
        let listing = render_alarms(desk.alarms());
        assert!(listing.starts_with(&a.id[..8]));
        assert!(listing.contains("09:15  off"));
    }
}
