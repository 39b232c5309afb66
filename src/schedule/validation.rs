//! Validation of the add-activity form.

use std::fmt;

use super::time::ClockTime;
use super::types::{parse_hex_color, to_hex_color, Activity, Day, DEFAULT_COLOR};

pub const MIN_TITLE_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Days,
    Color,
    StartTime(Day),
    EndTime(Day),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: Field, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// First message for a field, if any
    pub fn for_field(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join(" "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Raw times typed for one selected weekday
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySlot {
    pub day: Day,
    pub start: String,
    pub end: String,
}

impl DaySlot {
    pub fn new(day: Day) -> Self {
        Self {
            day,
            start: String::new(),
            end: String::new(),
        }
    }
}

/// Unvalidated form contents. One activity is produced per slot, all sharing
/// title, description and color.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityDraft {
    pub title: String,
    pub description: String,
    pub color: String,
    pub slots: Vec<DaySlot>,
}

impl ActivityDraft {
    pub fn validate(&self) -> Result<Vec<Activity>, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let title = self.title.trim();
        if title.chars().count() < MIN_TITLE_CHARS {
            errors.push(Field::Title, "Title must be at least 2 characters.");
        }

        let color = if self.color.trim().is_empty() {
            Some(DEFAULT_COLOR.to_string())
        } else {
            parse_hex_color(&self.color).map(to_hex_color)
        };
        if color.is_none() {
            errors.push(Field::Color, "Color must be a hex value like #4f46e5.");
        }

        if self.slots.is_empty() {
            errors.push(Field::Days, "Select at least one day.");
        }

        let mut times = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            let start = parse_slot_time(&slot.start, Field::StartTime(slot.day), "start", &mut errors);
            let end = parse_slot_time(&slot.end, Field::EndTime(slot.day), "end", &mut errors);
            if let (Some(start), Some(end)) = (start, end) {
                if start >= end {
                    errors.push(Field::EndTime(slot.day), "End time must be after start time.");
                } else {
                    times.push((slot.day, start, end));
                }
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let description = self.description.trim();
        let color = color.unwrap_or_else(|| DEFAULT_COLOR.to_string());
        Ok(times
            .into_iter()
            .map(|(day, start, end)| {
                let activity = Activity::new(title, day, start, end).with_color(color.clone());
                if description.is_empty() {
                    activity
                } else {
                    activity.with_description(description)
                }
            })
            .collect())
    }
}

fn parse_slot_time(raw: &str, field: Field, which: &str, errors: &mut ValidationErrors) -> Option<ClockTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.push(field, format!("Please select the {} time.", which));
        return None;
    }
    match raw.parse::<ClockTime>() {
        Ok(time) => Some(time),
        Err(e) => {
            errors.push(field, format!("Invalid {} time: {}.", which, e));
            None
        }
    }
}
