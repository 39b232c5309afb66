mod collection;
mod conflict;
mod layout;
mod time;
mod types;
mod validation;

pub use collection::{ActivityCollection, ScheduleError, ACTIVITIES_KEY};
pub use conflict::{find_conflict, find_conflicts, overlaps, BatchPolicy, Conflict};
pub use layout::{GridPosition, HourMark, VisibleWindow, DEFAULT_END_HOUR, DEFAULT_START_HOUR};
pub use time::{format_clock_time, format_hour_label, to_minutes, ClockTime, TimeParseError, MINUTES_PER_DAY};
pub use types::{parse_hex_color, to_hex_color, Activity, Day, DEFAULT_COLOR};
pub use validation::{ActivityDraft, DaySlot, Field, FieldError, ValidationErrors, MIN_TITLE_CHARS};
