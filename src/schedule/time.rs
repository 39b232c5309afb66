//! Clock time parsing and formatting for "HH:MM" strings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::ClockFormat;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("expected a time like HH:MM, got {0:?}")]
    Format(String),
    #[error("hour {0} is out of range (0-23)")]
    Hour(u16),
    #[error("minute {0} is out of range (0-59)")]
    Minute(u16),
}

/// Parse "HH:MM" into minutes since midnight.
///
/// Each component must be one or two ASCII digits. Anything else, including
/// seconds ("09:00:00"), signs or whitespace, is rejected.
pub fn to_minutes(time: &str) -> Result<u16, TimeParseError> {
    let format_error = || TimeParseError::Format(time.to_string());

    let (hours, minutes) = time.split_once(':').ok_or_else(format_error)?;
    let hours = parse_component(hours).ok_or_else(format_error)?;
    let minutes = parse_component(minutes).ok_or_else(format_error)?;

    if hours > 23 {
        return Err(TimeParseError::Hour(hours));
    }
    if minutes > 59 {
        return Err(TimeParseError::Minute(minutes));
    }

    Ok(hours * 60 + minutes)
}

fn parse_component(part: &str) -> Option<u16> {
    if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// A wall-clock time of day with minute granularity, stored as minutes since midnight.
///
/// Serialized as the zero-padded "HH:MM" string used in the activities file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self(hour * 60 + minute))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }
}

impl FromStr for ClockTime {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        to_minutes(s).map(Self)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = TimeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(time: ClockTime) -> Self {
        time.to_string()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Format a time according to the clock format setting ("14:30" or "2:30pm")
pub fn format_clock_time(time: ClockTime, clock_format: ClockFormat) -> String {
    match clock_format {
        ClockFormat::Hour24 => time.to_string(),
        ClockFormat::Hour12 => {
            let (h12, ampm) = to_12_hour(time.hour());
            format!("{}:{:02}{}", h12, time.minute(), ampm)
        }
    }
}

/// Label for an hour line on the grid. Accepts 24 for the end-of-day line.
pub fn format_hour_label(hour: u8, clock_format: ClockFormat) -> String {
    match clock_format {
        ClockFormat::Hour24 => format!("{}:00", hour),
        ClockFormat::Hour12 => {
            let (h12, ampm) = to_12_hour(u16::from(hour % 24));
            format!("{}{}", h12, ampm)
        }
    }
}

fn to_12_hour(hour: u16) -> (u16, &'static str) {
    match hour {
        0 => (12, "am"),
        1..=11 => (hour, "am"),
        12 => (12, "pm"),
        _ => (hour - 12, "pm"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_times() {
        assert_eq!(to_minutes("08:00"), Ok(480));
        assert_eq!(to_minutes("23:59"), Ok(1439));
        assert_eq!(to_minutes("00:00"), Ok(0));
        assert_eq!(to_minutes("9:05"), Ok(545));
    }

    #[test]
    fn rejects_out_of_range_components() {
        assert_eq!(to_minutes("24:00"), Err(TimeParseError::Hour(24)));
        assert_eq!(to_minutes("12:60"), Err(TimeParseError::Minute(60)));
    }

    #[test]
    fn rejects_malformed_input() {
        for input in ["", "0800", "8", ":30", "08:", "08:00:00", "-1:30", " 8:00", "ab:cd", "123:00", "08:5x"] {
            assert!(
                matches!(to_minutes(input), Err(TimeParseError::Format(_))),
                "{input:?} should be a format error"
            );
        }
    }

    #[test]
    fn clock_time_displays_zero_padded() {
        let time: ClockTime = "9:05".parse().unwrap();
        assert_eq!(time.to_string(), "09:05");
        assert_eq!(time.hour(), 9);
        assert_eq!(time.minute(), 5);
    }

    #[test]
    fn clock_time_serializes_as_string() {
        let time = ClockTime::from_hm(14, 30).unwrap();
        assert_eq!(serde_json::to_string(&time).unwrap(), "\"14:30\"");

        let parsed: ClockTime = serde_json::from_str("\"07:15\"").unwrap();
        assert_eq!(parsed.minutes(), 435);

        assert!(serde_json::from_str::<ClockTime>("\"25:00\"").is_err());
    }

    #[test]
    fn from_minutes_rejects_end_of_day() {
        assert!(ClockTime::from_minutes(1439).is_some());
        assert!(ClockTime::from_minutes(MINUTES_PER_DAY).is_none());
    }

    #[test]
    fn formats_twelve_hour_clock() {
        let fmt = |s: &str| format_clock_time(s.parse().unwrap(), ClockFormat::Hour12);
        assert_eq!(fmt("00:15"), "12:15am");
        assert_eq!(fmt("09:00"), "9:00am");
        assert_eq!(fmt("12:30"), "12:30pm");
        assert_eq!(fmt("14:30"), "2:30pm");
    }

    #[test]
    fn hour_labels() {
        assert_eq!(format_hour_label(6, ClockFormat::Hour24), "6:00");
        assert_eq!(format_hour_label(22, ClockFormat::Hour12), "10pm");
        assert_eq!(format_hour_label(24, ClockFormat::Hour12), "12am");
    }
}
