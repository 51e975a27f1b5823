//! Clock face formatting.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

/// Digits and date line for one clock reading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockFace {
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
    pub date: String,
}

impl ClockFace {
    pub fn at(now: &NaiveDateTime) -> Self {
        Self {
            hours: format!("{:02}", now.hour()),
            minutes: format!("{:02}", now.minute()),
            seconds: format!("{:02}", now.second()),
            date: long_date_zh(now),
        }
    }
}

/// `2026年10月19日星期一`
pub fn long_date_zh(now: &NaiveDateTime) -> String {
    format!(
        "{}年{}月{}日{}",
        now.year(),
        now.month(),
        now.day(),
        weekday_zh(now.weekday())
    )
}

fn weekday_zh(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "星期一",
        Weekday::Tue => "星期二",
        Weekday::Wed => "星期三",
        Weekday::Thu => "星期四",
        Weekday::Fri => "星期五",
        Weekday::Sat => "星期六",
        Weekday::Sun => "星期日",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_face_is_zero_padded() {
        let now = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(7, 5, 3)
            .unwrap();
        let face = ClockFace::at(&now);
        assert_eq!((face.hours.as_str(), face.minutes.as_str(), face.seconds.as_str()), ("07", "05", "03"));
        assert_eq!(face.date, "2026年10月19日星期一");
    }

    #[test]
    fn test_date_has_no_leading_zeros() {
        let now = NaiveDate::from_ymd_opt(2027, 1, 3)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert_eq!(long_date_zh(&now), "2027年1月3日星期日");
    }
}
