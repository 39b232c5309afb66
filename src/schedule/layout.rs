//! Maps activity times onto the vertical axis of the weekly grid.

use super::types::Activity;

pub const DEFAULT_START_HOUR: u8 = 6;
pub const DEFAULT_END_HOUR: u8 = 22;

/// The range of hours drawn on the grid, `[start_hour, end_hour)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleWindow {
    start_hour: u8,
    end_hour: u8,
}

impl Default for VisibleWindow {
    fn default() -> Self {
        Self {
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
        }
    }
}

/// Vertical placement as percentages of the window height.
///
/// Not clamped: an activity that starts before the window has a negative
/// `top_percent`, one that ends after it extends past 100%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPosition {
    pub top_percent: f32,
    pub height_percent: f32,
}

impl GridPosition {
    /// Pixel (y, height) inside a region starting at `top` with height `height`
    pub fn to_pixels(&self, top: f32, height: f32) -> (f32, f32) {
        (
            top + self.top_percent / 100.0 * height,
            self.height_percent / 100.0 * height,
        )
    }

    pub fn bottom_percent(&self) -> f32 {
        self.top_percent + self.height_percent
    }

    /// Whether any part falls inside the window
    pub fn is_visible(&self) -> bool {
        self.top_percent < 100.0 && self.bottom_percent() > 0.0
    }
}

/// An hour line on the grid with its offset from the top of the window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourMark {
    pub hour: u8,
    pub offset_percent: f32,
}

impl VisibleWindow {
    /// `None` unless `start_hour < end_hour <= 24`
    pub fn new(start_hour: u8, end_hour: u8) -> Option<Self> {
        (start_hour < end_hour && end_hour <= 24).then_some(Self { start_hour, end_hour })
    }

    pub fn start_hour(&self) -> u8 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u8 {
        self.end_hour
    }

    pub fn span_minutes(&self) -> u16 {
        u16::from(self.end_hour - self.start_hour) * 60
    }

    pub fn position(&self, start_minutes: u16, end_minutes: u16) -> GridPosition {
        let span = f32::from(self.span_minutes());
        let window_start = f32::from(self.start_hour) * 60.0;
        let start = f32::from(start_minutes);
        let end = f32::from(end_minutes);

        GridPosition {
            top_percent: (start - window_start) / span * 100.0,
            height_percent: (end - start) / span * 100.0,
        }
    }

    pub fn position_of(&self, activity: &Activity) -> GridPosition {
        let (start, end) = activity.interval();
        self.position(start, end)
    }

    /// One mark per hour from `start_hour` through `end_hour` inclusive
    pub fn hour_marks(&self) -> Vec<HourMark> {
        let count = self.end_hour - self.start_hour;
        (0..=count)
            .map(|i| HourMark {
                hour: self.start_hour + i,
                offset_percent: f32::from(i) / f32::from(count) * 100.0,
            })
            .collect()
    }

    /// Minutes since midnight at a fraction (0.0 top, 1.0 bottom) of the window height,
    /// snapped down to `snap` minutes and kept inside the window
    pub fn minutes_at(&self, fraction: f32, snap: u16) -> u16 {
        let span = self.span_minutes();
        let offset = (fraction.clamp(0.0, 1.0) * f32::from(span)) as u16;
        let snap = snap.max(1);
        let snapped = (offset / snap) * snap;
        u16::from(self.start_hour) * 60 + snapped.min(span - snap.min(span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::types::Day;

    #[test]
    fn afternoon_hour_in_default_window() {
        let window = VisibleWindow::default();
        let pos = window.position(840, 900);
        assert_eq!(pos.top_percent, 50.0);
        assert_eq!(pos.height_percent, 6.25);
    }

    #[test]
    fn window_edges() {
        let window = VisibleWindow::default();
        let pos = window.position(360, 1320);
        assert_eq!(pos.top_percent, 0.0);
        assert_eq!(pos.height_percent, 100.0);
        assert!(pos.is_visible());
    }

    #[test]
    fn positions_outside_window_are_not_clamped() {
        let window = VisibleWindow::default();

        let early = window.position(300, 420);
        assert!(early.top_percent < 0.0);
        assert_eq!(early.height_percent, 12.5);
        assert!(early.is_visible());

        let late = window.position(1350, 1410);
        assert!(late.top_percent > 100.0);
        assert!(!late.is_visible());
    }

    #[test]
    fn position_of_activity() {
        let window = VisibleWindow::new(8, 16).unwrap();
        let activity = Activity::new("Review", Day::Tuesday, "13:00".parse().unwrap(), "14:30".parse().unwrap());
        let pos = window.position_of(&activity);
        assert_eq!(pos.top_percent, 62.5);
        assert_eq!(pos.height_percent, 18.75);
    }

    #[test]
    fn pixels_scale_with_region() {
        let pos = GridPosition { top_percent: 50.0, height_percent: 6.25 };
        assert_eq!(pos.to_pixels(100.0, 960.0), (580.0, 60.0));
    }

    #[test]
    fn rejects_empty_or_inverted_windows() {
        assert!(VisibleWindow::new(10, 10).is_none());
        assert!(VisibleWindow::new(12, 8).is_none());
        assert!(VisibleWindow::new(0, 25).is_none());
        assert!(VisibleWindow::new(0, 24).is_some());
    }

    #[test]
    fn hour_marks_cover_both_ends() {
        let marks = VisibleWindow::default().hour_marks();
        assert_eq!(marks.len(), 17);
        assert_eq!(marks[0].hour, 6);
        assert_eq!(marks[0].offset_percent, 0.0);
        assert_eq!(marks[8].offset_percent, 50.0);
        assert_eq!(marks[16].hour, 22);
        assert_eq!(marks[16].offset_percent, 100.0);
    }

    #[test]
    fn minutes_at_snaps_inside_window() {
        let window = VisibleWindow::default();
        assert_eq!(window.minutes_at(0.0, 15), 360);
        assert_eq!(window.minutes_at(0.5, 15), 840);
        assert_eq!(window.minutes_at(0.55, 15), 885);
        assert_eq!(window.minutes_at(1.0, 15), 1305);
    }
}
