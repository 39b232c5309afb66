use chrono::{Datelike, Local};
use egui::{pos2, vec2, Align2, Color32, FontId, Rect, RichText, Sense, Stroke, Ui};

use super::theme::{phosphor_fill_family, text_on, Palette};
use crate::config::ClockFormat;
use crate::schedule::{format_clock_time, format_hour_label, Activity, ClockTime, Day, VisibleWindow};

/// Below this width the planner switches to the tap-to-open layout
pub const COMPACT_WIDTH: f32 = 640.0;

const HEADER_HEIGHT: f32 = 32.0;
const HOUR_LABEL_WIDTH: f32 = 56.0;
const COMPACT_HOUR_LABEL_WIDTH: f32 = 36.0;
const MIN_HOUR_HEIGHT: f32 = 24.0;
const ADD_SNAP_MINUTES: u16 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    /// Narrow window: tap opens a details modal
    Compact,
    /// Hover shows a tooltip and an inline delete button
    Regular,
}

impl DeviceClass {
    pub fn from_width(width: f32) -> Self {
        if width < COMPACT_WIDTH {
            DeviceClass::Compact
        } else {
            DeviceClass::Regular
        }
    }

    pub fn is_compact(self) -> bool {
        self == DeviceClass::Compact
    }
}

/// Result from schedule view interactions
#[derive(Default)]
pub struct ScheduleResult {
    pub remove: Option<String>,           // activity id
    pub selected: Option<String>,         // activity id, compact tap
    pub add_at: Option<(Day, ClockTime)>, // double-click on an empty slot
    pub grid_rect: Option<Rect>,          // screen area of headers + grid, for capture
}

pub fn day_header_label(day: Day, device: DeviceClass, column_width: f32) -> &'static str {
    match device {
        DeviceClass::Compact => day.initial(),
        DeviceClass::Regular if column_width < 90.0 => day.short_label(),
        DeviceClass::Regular => day.label(),
    }
}

pub fn activity_color(activity: &Activity) -> Color32 {
    let [r, g, b] = activity.rgb();
    Color32::from_rgb(r, g, b)
}

pub fn time_range_label(activity: &Activity, clock_format: ClockFormat) -> String {
    format!(
        "{} - {}",
        format_clock_time(activity.start_time, clock_format),
        format_clock_time(activity.end_time, clock_format)
    )
}

/// Details shown in the hover tooltip and in the compact modal
pub fn activity_details(ui: &mut Ui, activity: &Activity, clock_format: ClockFormat) {
    ui.horizontal(|ui| {
        ui.label(
            RichText::new(egui_phosphor::regular::CIRCLE)
                .family(phosphor_fill_family())
                .color(activity_color(activity)),
        );
        ui.label(RichText::new(&activity.title).strong());
    });
    ui.label(format!("{}, {}", activity.day.label(), time_range_label(activity, clock_format)));
    if let Some(description) = &activity.description {
        ui.add_space(4.0);
        ui.label(RichText::new(description).weak());
    }
}

pub fn render_schedule_view(
    ui: &mut Ui,
    activities: &[Activity],
    window: VisibleWindow,
    clock_format: ClockFormat,
    device: DeviceClass,
    palette: Palette,
) -> ScheduleResult {
    let mut result = ScheduleResult::default();
    let today = Day::from_weekday(Local::now().weekday());

    let label_width = if device.is_compact() { COMPACT_HOUR_LABEL_WIDTH } else { HOUR_LABEL_WIDTH };
    let available = ui.available_size();
    let num_hours = f32::from(window.end_hour() - window.start_hour());
    // Fill the panel so the whole week is on screen at once
    let body_height = (available.y - HEADER_HEIGHT).max(num_hours * MIN_HOUR_HEIGHT);

    let (grid_rect, _) = ui.allocate_exact_size(vec2(available.x, HEADER_HEIGHT + body_height), Sense::hover());
    result.grid_rect = Some(grid_rect);

    let day_width = (grid_rect.width() - label_width) / Day::ALL.len() as f32;
    let body = Rect::from_min_max(
        pos2(grid_rect.min.x + label_width, grid_rect.min.y + HEADER_HEIGHT),
        grid_rect.max,
    );
    let column_rect = |day: Day| {
        Rect::from_min_size(
            pos2(body.min.x + day.index() as f32 * day_width, body.min.y),
            vec2(day_width, body.height()),
        )
    };

    let painter = ui.painter().clone();
    painter.rect_filled(body, 0.0, palette.grid_fill);

    // Day headers, today's column and column separators
    for day in Day::ALL {
        let col = column_rect(day);
        let is_today = day == today;
        if is_today {
            painter.rect_filled(col, 0.0, palette.today_fill);
        }
        painter.text(
            pos2(col.center().x, grid_rect.min.y + HEADER_HEIGHT / 2.0),
            Align2::CENTER_CENTER,
            day_header_label(day, device, day_width),
            FontId::proportional(14.0),
            if is_today { palette.accent } else { palette.text },
        );
        painter.line_segment(
            [pos2(col.min.x, grid_rect.min.y + 4.0), pos2(col.min.x, body.max.y)],
            Stroke::new(1.0, palette.grid_line),
        );
    }
    painter.line_segment(
        [pos2(body.max.x, grid_rect.min.y + 4.0), pos2(body.max.x, body.max.y)],
        Stroke::new(1.0, palette.grid_line),
    );

    // Hour guide lines and labels
    for mark in window.hour_marks() {
        let y = body.min.y + mark.offset_percent / 100.0 * body.height();
        let is_edge = mark.hour == window.start_hour() || mark.hour == window.end_hour();
        painter.line_segment(
            [pos2(body.min.x, y), pos2(body.max.x, y)],
            Stroke::new(1.0, if is_edge { palette.grid_line } else { palette.hour_line }),
        );
        painter.text(
            pos2(body.min.x - 6.0, y),
            Align2::RIGHT_CENTER,
            format_hour_label(mark.hour, clock_format),
            FontId::proportional(11.0),
            palette.secondary_text,
        );
    }

    let blocks: Vec<(&Activity, Rect)> = activities
        .iter()
        .filter_map(|activity| {
            let position = window.position_of(activity);
            if !position.is_visible() {
                return None;
            }
            let (y, height) = position.to_pixels(body.min.y, body.height());
            let col = column_rect(activity.day);
            Some((
                activity,
                Rect::from_min_size(pos2(col.min.x + 2.0, y + 1.0), vec2(day_width - 4.0, (height - 2.0).max(2.0))),
            ))
        })
        .collect();

    let pointer = ui.ctx().pointer_hover_pos();
    let over_block = pointer.map_or(false, |pos| blocks.iter().any(|(_, rect)| rect.contains(pos)));

    // Double-click on empty space opens the add dialog at that slot
    for day in Day::ALL {
        let col_response = ui.interact(column_rect(day), ui.id().with(("day_col", day.index())), Sense::click());
        if col_response.double_clicked() && !over_block {
            if let Some(pos) = col_response.interact_pointer_pos() {
                let fraction = (pos.y - body.min.y) / body.height();
                let minutes = window.minutes_at(fraction, ADD_SNAP_MINUTES);
                if let Some(time) = ClockTime::from_minutes(minutes) {
                    result.add_at = Some((day, time));
                }
            }
        }
    }

    // Blocks can reach outside the window; clip them to the grid body
    let block_painter = painter.with_clip_rect(body);
    for (activity, rect) in &blocks {
        paint_activity_block(&block_painter, *rect, activity, clock_format, device);

        let hit_rect = rect.intersect(body);
        let response = ui.interact(hit_rect, ui.id().with(("activity", &activity.id)), Sense::click());

        match device {
            DeviceClass::Compact => {
                if response.clicked() {
                    result.selected = Some(activity.id.clone());
                }
            }
            DeviceClass::Regular => {
                let hovered = pointer.map_or(false, |pos| hit_rect.contains(pos));
                if hovered {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
                response.on_hover_ui(|ui| activity_details(ui, activity, clock_format));

                if hovered && hit_rect.height() >= 18.0 && hit_rect.width() >= 36.0 {
                    let delete_rect = Rect::from_min_size(pos2(hit_rect.max.x - 20.0, hit_rect.min.y + 2.0), vec2(18.0, 18.0));
                    let delete_response = ui
                        .interact(delete_rect, ui.id().with(("delete", &activity.id)), Sense::click())
                        .on_hover_text("Remove activity");
                    let fill = activity_color(activity);
                    let icon_color = if delete_response.hovered() { palette.danger } else { text_on(fill) };
                    painter.rect_filled(delete_rect, 4.0, fill);
                    painter.text(
                        delete_rect.center(),
                        Align2::CENTER_CENTER,
                        egui_phosphor::regular::TRASH,
                        FontId::proportional(13.0),
                        icon_color,
                    );
                    if delete_response.clicked() {
                        result.remove = Some(activity.id.clone());
                    }
                }
            }
        }
    }

    result
}

/// Paint a single activity block (no interaction - that's handled by caller)
fn paint_activity_block(
    painter: &egui::Painter,
    rect: Rect,
    activity: &Activity,
    clock_format: ClockFormat,
    device: DeviceClass,
) {
    let fill = activity_color(activity);
    let text_color = text_on(fill);
    painter.rect_filled(rect, 4.0, fill);

    let text_painter = painter.with_clip_rect(rect.intersect(painter.clip_rect()));
    let padding = if device.is_compact() { 3.0 } else { 6.0 };
    let font_size = if device.is_compact() { 11.0 } else { 13.0 };
    let wrap_width = (rect.width() - padding * 2.0).max(1.0);

    let title = text_painter.layout(
        activity.title.clone(),
        FontId::proportional(font_size),
        text_color,
        wrap_width,
    );
    let title_height = title.size().y;
    text_painter.galley(rect.min + vec2(padding, padding / 2.0), title, text_color);

    if !device.is_compact() && rect.height() > title_height + 20.0 {
        text_painter.text(
            rect.min + vec2(padding, padding / 2.0 + title_height + 2.0),
            Align2::LEFT_TOP,
            time_range_label(activity, clock_format),
            FontId::proportional(11.0),
            text_color,
        );
    }
}

/// Button with a plain background that lightens on hover
pub fn text_button(ui: &mut Ui, text: &str, text_color: Color32) -> egui::Response {
    let btn_bg = ui.visuals().widgets.inactive.bg_fill;
    let btn_hover = ui.visuals().widgets.hovered.bg_fill;
    let font_id = FontId::proportional(15.0);
    let padding = vec2(16.0, 8.0);

    let size = ui.fonts(|f| f.layout_no_wrap(text.to_string(), font_id.clone(), text_color).size());
    let (rect, response) = ui.allocate_exact_size(size + padding * 2.0, Sense::click());
    let bg = if response.hovered() { btn_hover } else { btn_bg };
    ui.painter().rect_filled(rect, 6.0, bg);
    ui.painter().text(rect.center(), Align2::CENTER_CENTER, text, font_id, text_color);
    response
}

/// Icon-only toolbar button, dim until hovered
pub fn icon_button(ui: &mut Ui, icon: &str, color: Color32, hover_color: Color32) -> egui::Response {
    let font_id = FontId::proportional(18.0);
    let size = ui.fonts(|f| f.layout_no_wrap(icon.to_string(), font_id.clone(), color).size());
    let (rect, response) = ui.allocate_exact_size(size + vec2(8.0, 4.0), Sense::click());
    let col = if response.hovered() { hover_color } else { color };
    ui.painter().text(rect.center(), Align2::CENTER_CENTER, icon, font_id, col);
    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_class_threshold() {
        assert_eq!(DeviceClass::from_width(375.0), DeviceClass::Compact);
        assert_eq!(DeviceClass::from_width(639.9), DeviceClass::Compact);
        assert_eq!(DeviceClass::from_width(640.0), DeviceClass::Regular);
        assert_eq!(DeviceClass::from_width(1280.0), DeviceClass::Regular);
    }

    #[test]
    fn header_labels_shrink_with_space() {
        assert_eq!(day_header_label(Day::Wednesday, DeviceClass::Regular, 140.0), "Wednesday");
        assert_eq!(day_header_label(Day::Wednesday, DeviceClass::Regular, 80.0), "Wed");
        assert_eq!(day_header_label(Day::Wednesday, DeviceClass::Compact, 80.0), "W");
    }

    #[test]
    fn time_range_follows_clock_format() {
        let activity = Activity::new("Lab", Day::Thursday, "13:00".parse().unwrap(), "14:30".parse().unwrap());
        assert_eq!(time_range_label(&activity, ClockFormat::Hour24), "13:00 - 14:30");
        assert_eq!(time_range_label(&activity, ClockFormat::Hour12), "1:00pm - 2:30pm");
        assert_eq!(activity_color(&activity), Color32::from_rgb(0x4f, 0x46, 0xe5));
    }
}
