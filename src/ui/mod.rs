mod app;
mod theme;
mod views;

pub use app::PlannerApp;
pub use theme::{setup_fonts, setup_theme, Palette};
pub use views::{render_schedule_view, DeviceClass, ScheduleResult, COMPACT_WIDTH};
