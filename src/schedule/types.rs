use chrono::Weekday;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time::ClockTime;

/// Indigo, used when an activity has no color of its own
pub const DEFAULT_COLOR: &str = "#4f46e5";

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// Column index, Monday = 0
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }

    pub fn short_label(self) -> &'static str {
        &self.label()[..3]
    }

    pub fn initial(self) -> &'static str {
        &self.label()[..1]
    }

    pub fn from_weekday(weekday: Weekday) -> Self {
        Day::ALL[weekday.num_days_from_monday() as usize]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub day: Day,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    #[serde(default = "default_color")]
    pub color: String,
}

impl Activity {
    /// New activity with a fresh id and the default color
    pub fn new(title: impl Into<String>, day: Day, start_time: ClockTime, end_time: ClockTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: None,
            day,
            start_time,
            end_time,
            color: default_color(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Half-open `[start, end)` interval in minutes since midnight
    pub fn interval(&self) -> (u16, u16) {
        (self.start_time.minutes(), self.end_time.minutes())
    }

    pub fn time_range(&self) -> String {
        format!("{} - {}", self.start_time, self.end_time)
    }

    /// Color as RGB, falling back to the default when the stored value is not a hex color
    pub fn rgb(&self) -> [u8; 3] {
        parse_hex_color(&self.color)
            .or_else(|| parse_hex_color(DEFAULT_COLOR))
            .unwrap_or([0x4f, 0x46, 0xe5])
    }
}

/// Parse "#rrggbb" (leading '#' optional)
pub fn parse_hex_color(color: &str) -> Option<[u8; 3]> {
    let hex = color.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    Some([(value >> 16) as u8, (value >> 8) as u8, value as u8])
}

pub fn to_hex_color(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    #[test]
    fn day_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Day::Wednesday).unwrap(), "\"wednesday\"");
        let day: Day = serde_json::from_str("\"sunday\"").unwrap();
        assert_eq!(day, Day::Sunday);
    }

    #[test]
    fn day_labels_and_weekday_mapping() {
        assert_eq!(Day::Thursday.short_label(), "Thu");
        assert_eq!(Day::Saturday.initial(), "S");
        assert_eq!(Day::from_weekday(Weekday::Mon), Day::Monday);
        assert_eq!(Day::from_weekday(Weekday::Sun), Day::Sunday);
        assert_eq!(Day::Sunday.index(), 6);
    }

    #[test]
    fn activity_uses_stored_field_names() {
        let activity = Activity::new("Math class", Day::Monday, at("08:00"), at("09:30"));
        let json = serde_json::to_value(&activity).unwrap();

        assert_eq!(json["startTime"], "08:00");
        assert_eq!(json["endTime"], "09:30");
        assert_eq!(json["day"], "monday");
        assert_eq!(json["color"], DEFAULT_COLOR);
        assert!(json.get("description").is_none());
    }

    #[test]
    fn activity_reads_record_without_color() {
        let raw = r#"{"id":"a1","title":"Gym","day":"friday","startTime":"18:00","endTime":"19:00"}"#;
        let activity: Activity = serde_json::from_str(raw).unwrap();
        assert_eq!(activity.color, DEFAULT_COLOR);
        assert_eq!(activity.interval(), (1080, 1140));
    }

    #[test]
    fn fresh_ids_are_unique() {
        let a = Activity::new("A", Day::Monday, at("08:00"), at("09:00"));
        let b = Activity::new("A", Day::Monday, at("08:00"), at("09:00"));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#4f46e5"), Some([0x4f, 0x46, 0xe5]));
        assert_eq!(parse_hex_color("FF0000"), Some([255, 0, 0]));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        assert_eq!(to_hex_color([0x4f, 0x46, 0xe5]), DEFAULT_COLOR);

        let odd = Activity::new("A", Day::Monday, at("08:00"), at("09:00")).with_color("teal");
        assert_eq!(odd.rgb(), [0x4f, 0x46, 0xe5]);
    }
}
