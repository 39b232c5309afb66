use anyhow::{Context, Result};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};
use std::path::Path;

use crate::schedule::{Activity, Day};

pub const SHEET_NAME: &str = "Schedule";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetCell {
    pub text: String,
    pub color: [u8; 3],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub label: String,
    pub cells: [Option<SheetCell>; 7],
}

/// One row per hour of the day, one column per weekday
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetGrid {
    pub rows: Vec<SheetRow>,
}

impl SheetGrid {
    pub fn cell(&self, hour: usize, day: Day) -> Option<&SheetCell> {
        self.rows.get(hour).and_then(|row| row.cells[day.index()].as_ref())
    }
}

/// Lay activities out on an hour-by-day grid.
///
/// An activity fills every hour it touches. Two activities sharing an hour
/// cell are stacked on separate lines and the cell takes the first one's color.
pub fn build_sheet(activities: &[Activity]) -> SheetGrid {
    let mut rows: Vec<SheetRow> = (0..24)
        .map(|hour| SheetRow {
            label: format!("{}:00", hour),
            cells: Default::default(),
        })
        .collect();

    for activity in activities {
        let (start, end) = activity.interval();
        let first = usize::from(start / 60);
        let last = usize::from(end.saturating_sub(1) / 60).max(first);

        for hour in first..=last {
            let text = if first == last {
                format!("{} ({} - {})", activity.title, activity.start_time, activity.end_time)
            } else if hour == first {
                format!("{} ({})", activity.title, activity.start_time)
            } else if hour == last {
                format!("{} ({})", activity.title, activity.end_time)
            } else {
                activity.title.clone()
            };

            let cell = &mut rows[hour].cells[activity.day.index()];
            match cell {
                Some(existing) => {
                    existing.text.push('\n');
                    existing.text.push_str(&text);
                }
                None => {
                    *cell = Some(SheetCell {
                        text,
                        color: activity.rgb(),
                    })
                }
            }
        }
    }

    SheetGrid { rows }
}

pub fn write_xlsx(grid: &SheetGrid, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let header = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);
    sheet.write_string_with_format(0, 0, "Hour", &header)?;
    sheet.set_column_width(0, 8)?;
    for day in Day::ALL {
        let col = day.index() as u16 + 1;
        sheet.write_string_with_format(0, col, day.label(), &header)?;
        sheet.set_column_width(col, 24)?;
    }
    sheet.set_freeze_panes(1, 1)?;

    for (i, row) in grid.rows.iter().enumerate() {
        let row_num = i as u32 + 1;
        sheet.write_string(row_num, 0, &row.label)?;
        for (col, cell) in row.cells.iter().enumerate() {
            let Some(cell) = cell else { continue };
            let format = Format::new()
                .set_background_color(Color::RGB(rgb_to_u32(cell.color)))
                .set_font_color(text_color_for(cell.color))
                .set_text_wrap()
                .set_border(FormatBorder::Thin);
            sheet.write_string_with_format(row_num, col as u16 + 1, &cell.text, &format)?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn rgb_to_u32([r, g, b]: [u8; 3]) -> u32 {
    (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Black on light fills, white on dark ones
fn text_color_for([r, g, b]: [u8; 3]) -> Color {
    let luma = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
    if luma > 150.0 {
        Color::Black
    } else {
        Color::White
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(title: &str, day: Day, start: &str, end: &str) -> Activity {
        Activity::new(title, day, start.parse().unwrap(), end.parse().unwrap())
    }

    #[test]
    fn has_a_row_per_hour() {
        let grid = build_sheet(&[]);
        assert_eq!(grid.rows.len(), 24);
        assert_eq!(grid.rows[0].label, "0:00");
        assert_eq!(grid.rows[23].label, "23:00");
        assert!(grid.rows.iter().all(|r| r.cells.iter().all(Option::is_none)));
    }

    #[test]
    fn single_hour_activity_shows_full_range() {
        let grid = build_sheet(&[activity("Lunch", Day::Wednesday, "12:15", "12:45")]);
        let cell = grid.cell(12, Day::Wednesday).unwrap();
        assert_eq!(cell.text, "Lunch (12:15 - 12:45)");
        assert_eq!(cell.color, [0x4f, 0x46, 0xe5]);
        assert!(grid.cell(13, Day::Wednesday).is_none());
    }

    #[test]
    fn multi_hour_activity_spans_rows() {
        let grid = build_sheet(&[activity("Study", Day::Monday, "09:30", "12:15")
            .with_color("#10b981")]);

        assert_eq!(grid.cell(9, Day::Monday).unwrap().text, "Study (09:30)");
        assert_eq!(grid.cell(10, Day::Monday).unwrap().text, "Study");
        assert_eq!(grid.cell(11, Day::Monday).unwrap().text, "Study");
        assert_eq!(grid.cell(12, Day::Monday).unwrap().text, "Study (12:15)");
        assert_eq!(grid.cell(12, Day::Monday).unwrap().color, [0x10, 0xb9, 0x81]);
        assert!(grid.cell(8, Day::Monday).is_none());
        assert!(grid.cell(9, Day::Tuesday).is_none());
    }

    #[test]
    fn ending_on_the_hour_stops_at_previous_row() {
        let grid = build_sheet(&[activity("Run", Day::Sunday, "07:00", "09:00")]);
        assert_eq!(grid.cell(7, Day::Sunday).unwrap().text, "Run (07:00)");
        assert_eq!(grid.cell(8, Day::Sunday).unwrap().text, "Run (09:00)");
        assert!(grid.cell(9, Day::Sunday).is_none());
    }

    #[test]
    fn shared_hour_stacks_titles() {
        let grid = build_sheet(&[
            activity("Call", Day::Friday, "10:00", "10:30"),
            activity("Email", Day::Friday, "10:30", "11:00").with_color("#ef4444"),
        ]);
        let cell = grid.cell(10, Day::Friday).unwrap();
        assert_eq!(cell.text, "Call (10:00 - 10:30)\nEmail (10:30 - 11:00)");
        assert_eq!(cell.color, [0x4f, 0x46, 0xe5]);
    }

    #[test]
    fn contrast_text_color() {
        assert_eq!(text_color_for([255, 255, 255]), Color::Black);
        assert_eq!(text_color_for([0x4f, 0x46, 0xe5]), Color::White);
        assert_eq!(rgb_to_u32([0x12, 0x34, 0x56]), 0x123456);
    }

    #[test]
    fn writes_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.xlsx");
        let grid = build_sheet(&[activity("Swim", Day::Tuesday, "06:00", "07:30")]);

        write_xlsx(&grid, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
