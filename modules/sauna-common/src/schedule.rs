//! Weekly opening hours and the "is it open right now?" check.
//!
//! Each weekday holds either the literal `closed` (any case) or an interval
//! written `HH:MM-HH:MM`. Anything else is treated as closed; nothing here
//! returns an error.

use std::sync::LazyLock;

use chrono::{Datelike, Local, Timelike, Weekday};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Table keys indexed by `Weekday::num_days_from_sunday`.
const DAY_KEYS: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// Display order for the weekly summary.
const WEEK: [(Weekday, &str); 7] = [
    (Weekday::Mon, "Mon"),
    (Weekday::Tue, "Tue"),
    (Weekday::Wed, "Wed"),
    (Weekday::Thu, "Thu"),
    (Weekday::Fri, "Fri"),
    (Weekday::Sat, "Sat"),
    (Weekday::Sun, "Sun"),
];

static INTERVAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{2}):([0-9]{2})-([0-9]{2}):([0-9]{2})").expect("interval pattern is valid")
});

/// Lowercase English key used for `weekday` in an opening-hours table.
pub fn day_key(weekday: Weekday) -> &'static str {
    DAY_KEYS[weekday.num_days_from_sunday() as usize]
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningHours {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monday: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thursday: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friday: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturday: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunday: Option<String>,
}

/// One day's open interval as `hour * 100 + minute` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyInterval {
    pub opens: u32,
    pub closes: u32,
}

impl DailyInterval {
    /// Both ends inclusive. Intervals that wrap past midnight never contain anything.
    pub fn contains(&self, hhmm: u32) -> bool {
        self.opens <= hhmm && hhmm <= self.closes
    }
}

/// Find the first `HH:MM-HH:MM` run inside `entry`.
pub fn parse_interval(entry: &str) -> Option<DailyInterval> {
    let caps = INTERVAL.captures(entry)?;
    let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
    Some(DailyInterval {
        opens: field(1)? * 100 + field(2)?,
        closes: field(3)? * 100 + field(4)?,
    })
}

fn is_closed_marker(entry: &str) -> bool {
    entry.eq_ignore_ascii_case("closed")
}

impl OpeningHours {
    pub fn entry(&self, weekday: Weekday) -> Option<&str> {
        let slot = match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        };
        slot.as_deref()
    }

    /// Look up an entry by its table key (`"monday"` … `"sunday"`).
    pub fn entry_by_key(&self, key: &str) -> Option<&str> {
        let weekday = WEEK
            .iter()
            .map(|(day, _)| *day)
            .find(|day| day_key(*day) == key)?;
        self.entry(weekday)
    }

    pub fn set(&mut self, weekday: Weekday, value: impl Into<String>) {
        let slot = match weekday {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        };
        *slot = Some(value.into());
    }

    /// Weekdays with no entry at all, Monday first.
    pub fn missing_days(&self) -> impl Iterator<Item = Weekday> + '_ {
        WEEK.iter()
            .map(|(day, _)| *day)
            .filter(|day| self.entry(*day).is_none())
    }

    pub fn interval(&self, weekday: Weekday) -> Option<DailyInterval> {
        let entry = self.entry(weekday)?;
        if is_closed_marker(entry) {
            return None;
        }
        parse_interval(entry)
    }

    pub fn is_open_at<T: Datelike + Timelike>(&self, at: &T) -> bool {
        let now = at.hour() * 100 + at.minute();
        self.interval(at.weekday())
            .is_some_and(|interval| interval.contains(now))
    }

    pub fn is_open_now(&self) -> bool {
        self.is_open_at(&Local::now())
    }

    /// `Mon: 09:00-21:00` lines, Monday to Sunday. Missing days read `Closed`.
    pub fn format_weekly(&self) -> String {
        WEEK.iter()
            .map(|(day, label)| {
                let hours = self
                    .entry(*day)
                    .filter(|h| !h.is_empty())
                    .unwrap_or("Closed");
                format!("{label}: {hours}")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    // 2024-06-03 is a Monday.
    fn at(day_offset: u32, hour: u32, minute: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3 + day_offset)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn monday_only(entry: &str) -> OpeningHours {
        OpeningHours {
            monday: Some(entry.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn day_keys_follow_sunday_first_indexing() {
        assert_eq!(day_key(Weekday::Sun), "sunday");
        assert_eq!(day_key(Weekday::Mon), "monday");
        assert_eq!(day_key(Weekday::Sat), "saturday");
    }

    #[test]
    fn open_just_before_closing() {
        assert!(monday_only("09:00-21:00").is_open_at(&at(0, 20, 59)));
    }

    #[test]
    fn closing_minute_is_still_open() {
        assert!(monday_only("09:00-21:00").is_open_at(&at(0, 21, 0)));
    }

    #[test]
    fn closed_after_closing_time() {
        assert!(!monday_only("09:00-21:00").is_open_at(&at(0, 21, 1)));
    }

    #[test]
    fn opening_minute_is_open() {
        let hours = monday_only("09:00-21:00");
        assert!(hours.is_open_at(&at(0, 9, 0)));
        assert!(!hours.is_open_at(&at(0, 8, 59)));
    }

    #[test]
    fn closed_marker_ignores_case_and_time() {
        for marker in ["Closed", "closed", "CLOSED", "cLoSeD"] {
            let hours = OpeningHours {
                tuesday: Some(marker.to_string()),
                ..Default::default()
            };
            for hour in [0, 6, 12, 18, 23] {
                assert!(!hours.is_open_at(&at(1, hour, 30)));
            }
        }
    }

    #[test]
    fn missing_minutes_degrade_to_closed() {
        assert_eq!(parse_interval("09-21"), None);
        assert!(!monday_only("09-21").is_open_at(&at(0, 12, 0)));
    }

    #[test]
    fn absent_day_is_closed() {
        // Tuesday has no entry.
        assert!(!monday_only("00:00-23:59").is_open_at(&at(1, 12, 0)));
    }

    #[test]
    fn single_digit_hours_do_not_parse() {
        assert_eq!(parse_interval("9:00-21:00"), None);
    }

    #[test]
    fn interval_may_be_embedded_in_text() {
        assert_eq!(
            parse_interval("Summer 07:30-22:15 (weather permitting)"),
            Some(DailyInterval { opens: 730, closes: 2215 })
        );
    }

    #[test]
    fn overnight_interval_never_opens() {
        let hours = monday_only("22:00-02:00");
        assert!(!hours.is_open_at(&at(0, 23, 0)));
        assert!(!hours.is_open_at(&at(0, 1, 0)));
    }

    #[test]
    fn sunday_entry_is_used_on_sunday() {
        let hours = OpeningHours {
            sunday: Some("10:00-16:00".to_string()),
            ..Default::default()
        };
        assert!(hours.is_open_at(&at(6, 11, 0)));
        assert!(!hours.is_open_at(&at(0, 11, 0)));
    }

    #[test]
    fn entry_by_key_maps_names_to_days() {
        let hours = monday_only("09:00-21:00");
        assert_eq!(hours.entry_by_key("monday"), Some("09:00-21:00"));
        assert_eq!(hours.entry_by_key("tuesday"), None);
        assert_eq!(hours.entry_by_key("funday"), None);
    }

    #[test]
    fn weekly_summary_fills_gaps_with_closed() {
        let mut hours = monday_only("09:00-21:00");
        hours.set(Weekday::Sat, "");
        hours.set(Weekday::Sun, "closed");
        assert_eq!(
            hours.format_weekly(),
            "Mon: 09:00-21:00\nTue: Closed\nWed: Closed\nThu: Closed\nFri: Closed\nSat: Closed\nSun: closed"
        );
    }

    #[test]
    fn missing_days_lists_gaps_in_week_order() {
        let mut hours = monday_only("09:00-21:00");
        for day in [Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri] {
            hours.set(day, "closed");
        }
        let missing: Vec<_> = hours.missing_days().collect();
        assert_eq!(missing, vec![Weekday::Sat, Weekday::Sun]);
    }
}
