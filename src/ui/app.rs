use eframe::egui;
use egui::{Color32, RichText};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};

use crate::config::{ClockFormat, Config, Theme};
use crate::export::{self, ExportFormat, ExportJob};
use crate::schedule::{
    parse_hex_color, to_hex_color, ActivityCollection, ActivityDraft, ClockTime, Conflict, Day, DaySlot, Field,
    ScheduleError, ValidationErrors, VisibleWindow, DEFAULT_COLOR,
};
use crate::storage::KeyValueStore;
use super::theme::{dialog_colors, Palette};
use super::views::{self, DeviceClass};

pub struct PlannerApp {
    config: Config,
    collection: ActivityCollection,
    window: VisibleWindow,

    // Add dialog
    show_dialog: bool,
    dialog_title: String,
    dialog_description: String,
    dialog_color: Color32,
    dialog_days: [bool; 7],
    dialog_slots: Vec<DaySlot>,  // one per weekday, Monday first
    dialog_errors: ValidationErrors,
    dialog_conflicts: Vec<Conflict>,

    // Compact layout: details modal for a tapped activity
    selected_activity: Option<String>,

    // Settings dialog
    show_settings: bool,
    settings_font_scale: f32,
    settings_clock_format: ClockFormat,
    settings_theme: Theme,
    settings_start_hour: u8,
    settings_end_hour: u8,
    settings_default_color: Color32,
    settings_export_dir: String,
    settings_open_after_export: bool,
    settings_check_siblings: bool,
    settings_error: Option<String>,

    // Export
    exporting: bool,
    capture: CaptureState,
    grid_rect: Option<egui::Rect>,

    // Status
    status_message: Option<(String, bool)>, // (message, is_error)

    // Async communication
    ctx: egui::Context,
    runtime: Option<tokio::runtime::Runtime>,
    result_rx: Receiver<AsyncResult>,
    result_tx: Sender<AsyncResult>,
}

enum AsyncResult {
    ExportFinished(ExportFormat, Result<PathBuf, String>),
}

/// Screenshot round trip for PDF and PNG exports
#[derive(Debug, Clone, Copy, PartialEq)]
enum CaptureState {
    Idle,
    Requested(ExportFormat),  // send the command next frame, once menus have closed
    Waiting(ExportFormat),    // waiting for the screenshot event
}

impl PlannerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, store: Box<dyn KeyValueStore>) -> Self {
        let config = Config::load().unwrap_or_else(|e| {
            log::warn!("Using default settings: {:#}", e);
            Config::default()
        });
        super::setup_fonts(&cc.egui_ctx);
        super::setup_theme(&cc.egui_ctx, config.theme);

        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => Some(runtime),
            Err(e) => {
                log::warn!("No background runtime, exports will run inline: {}", e);
                None
            }
        };
        let (result_tx, result_rx) = channel();

        let collection = ActivityCollection::open(store).with_batch_policy(config.batch_policy());
        let window = config.visible_window();
        let default_color = config_color(&config);

        Self {
            show_settings: false,
            settings_font_scale: config.font_scale,
            settings_clock_format: config.clock_format,
            settings_theme: config.theme,
            settings_start_hour: config.schedule_start_hour,
            settings_end_hour: config.schedule_end_hour,
            settings_default_color: default_color,
            settings_export_dir: config.export_dir.as_ref().map(|p| p.display().to_string()).unwrap_or_default(),
            settings_open_after_export: config.open_after_export,
            settings_check_siblings: config.check_batch_siblings,
            settings_error: None,
            config,
            collection,
            window,
            show_dialog: false,
            dialog_title: String::new(),
            dialog_description: String::new(),
            dialog_color: default_color,
            dialog_days: [false; 7],
            dialog_slots: Day::ALL.iter().map(|day| DaySlot::new(*day)).collect(),
            dialog_errors: ValidationErrors::default(),
            dialog_conflicts: Vec::new(),
            selected_activity: None,
            exporting: false,
            capture: CaptureState::Idle,
            grid_rect: None,
            status_message: None,
            ctx: cc.egui_ctx.clone(),
            runtime,
            result_rx,
            result_tx,
        }
    }

    fn check_async_results(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                AsyncResult::ExportFinished(format, Ok(path)) => {
                    self.exporting = false;
                    self.status_message = Some((format!("Saved {}", path.display()), false));
                    if self.config.open_after_export {
                        if let Err(e) = open::that(&path) {
                            log::warn!("Could not open {}: {}", path.display(), e);
                        }
                    }
                    log::debug!("{} export finished", format.label());
                }
                AsyncResult::ExportFinished(format, Err(e)) => {
                    self.exporting = false;
                    self.status_message = Some((format!("{} export failed: {}", format.label(), e), true));
                }
            }
        }
    }

    fn open_add_dialog(&mut self, preset: Option<(Day, ClockTime)>) {
        self.dialog_title.clear();
        self.dialog_description.clear();
        self.dialog_color = config_color(&self.config);
        self.dialog_days = [false; 7];
        self.dialog_slots = Day::ALL.iter().map(|day| DaySlot::new(*day)).collect();
        self.dialog_errors = ValidationErrors::default();
        self.dialog_conflicts.clear();

        if let Some((day, start)) = preset {
            self.dialog_days[day.index()] = true;
            let slot = &mut self.dialog_slots[day.index()];
            slot.start = start.to_string();
            if let Some(end) = ClockTime::from_minutes(start.minutes() + 60) {
                slot.end = end.to_string();
            }
        }

        self.show_dialog = true;
    }

    fn save_dialog(&mut self) {
        let draft = ActivityDraft {
            title: self.dialog_title.clone(),
            description: self.dialog_description.clone(),
            color: to_hex_color([self.dialog_color.r(), self.dialog_color.g(), self.dialog_color.b()]),
            slots: Day::ALL
                .iter()
                .filter(|day| self.dialog_days[day.index()])
                .map(|day| self.dialog_slots[day.index()].clone())
                .collect(),
        };

        self.dialog_conflicts.clear();
        let batch = match draft.validate() {
            Ok(batch) => batch,
            Err(errors) => {
                self.dialog_errors = errors;
                return;
            }
        };
        self.dialog_errors = ValidationErrors::default();

        let count = batch.len();
        match self.collection.add_batch(batch) {
            Ok(()) => {
                self.show_dialog = false;
                let noun = if count == 1 { "activity" } else { "activities" };
                self.status_message = Some((format!("Added {} {}", count, noun), false));
            }
            Err(ScheduleError::Conflicts(conflicts)) => {
                self.dialog_conflicts = conflicts;
            }
            Err(ScheduleError::Storage(e)) => {
                // The activities are in the grid but will not survive a restart
                log::error!("{:#}", e);
                self.show_dialog = false;
                self.status_message = Some((format!("{:#}", e), true));
            }
        }
    }

    fn remove_activity(&mut self, id: &str) {
        match self.collection.remove(id) {
            Ok(true) => self.status_message = Some(("Removed activity".to_string(), false)),
            Ok(false) => {}
            Err(e) => {
                log::error!("{:#}", e);
                self.status_message = Some((format!("{:#}", e), true));
            }
        }
        if self.selected_activity.as_deref() == Some(id) {
            self.selected_activity = None;
        }
    }

    fn save_settings(&mut self) {
        let Some(window) = VisibleWindow::new(self.settings_start_hour, self.settings_end_hour) else {
            self.settings_error = Some("The day must start before it ends.".to_string());
            return;
        };
        self.settings_error = None;

        self.config.font_scale = self.settings_font_scale;
        self.config.clock_format = self.settings_clock_format;
        self.config.schedule_start_hour = self.settings_start_hour;
        self.config.schedule_end_hour = self.settings_end_hour;
        self.config.default_color = to_hex_color([
            self.settings_default_color.r(),
            self.settings_default_color.g(),
            self.settings_default_color.b(),
        ]);
        let export_dir = self.settings_export_dir.trim();
        self.config.export_dir = (!export_dir.is_empty()).then(|| PathBuf::from(export_dir));
        self.config.open_after_export = self.settings_open_after_export;
        self.config.check_batch_siblings = self.settings_check_siblings;
        if self.config.theme != self.settings_theme {
            self.config.theme = self.settings_theme;
            super::setup_theme(&self.ctx, self.config.theme);
        }

        self.window = window;
        self.collection.set_batch_policy(self.config.batch_policy());

        match self.config.save() {
            Ok(_) => self.show_settings = false,
            Err(e) => {
                log::error!("Failed to save settings: {:#}", e);
                self.status_message = Some((format!("Failed to save: {}", e), true));
            }
        }
    }

    fn open_settings(&mut self) {
        self.settings_font_scale = self.config.font_scale;
        self.settings_clock_format = self.config.clock_format;
        self.settings_theme = self.config.theme;
        self.settings_start_hour = self.config.schedule_start_hour;
        self.settings_end_hour = self.config.schedule_end_hour;
        self.settings_default_color = config_color(&self.config);
        self.settings_export_dir = self
            .config
            .export_dir
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        self.settings_open_after_export = self.config.open_after_export;
        self.settings_check_siblings = self.config.check_batch_siblings;
        self.settings_error = None;
        self.show_settings = true;
    }

    fn toggle_theme(&mut self) {
        self.config.theme = self.config.theme.toggled();
        self.settings_theme = self.config.theme;
        super::setup_theme(&self.ctx, self.config.theme);
        if let Err(e) = self.config.save() {
            log::warn!("Failed to save theme: {:#}", e);
        }
    }

    fn start_export(&mut self, format: ExportFormat) {
        if self.exporting {
            return;
        }
        if let Err(e) = export::ensure_exportable(self.collection.activities()) {
            self.status_message = Some((e.to_string(), true));
            return;
        }

        self.exporting = true;
        self.status_message = None;
        if format.needs_capture() {
            self.capture = CaptureState::Requested(format);
            self.ctx.request_repaint();
        } else {
            self.spawn_export(ExportJob::Spreadsheet(self.collection.list()));
        }
    }

    fn spawn_export(&mut self, job: ExportJob) {
        let dir = self.config.export_dir();
        let tx = self.result_tx.clone();
        let ctx = self.ctx.clone();

        let task = move || {
            let format = job.format();
            let result = job.run(&dir).map_err(|e| {
                log::error!("{} export failed: {:#}", format.label(), e);
                format!("{:#}", e)
            });
            let _ = tx.send(AsyncResult::ExportFinished(format, result));
            ctx.request_repaint();
        };

        match &self.runtime {
            Some(runtime) => {
                runtime.spawn_blocking(task);
            }
            None => task(),
        }
    }

    /// Drive the screenshot round trip for capture-based exports
    fn handle_capture(&mut self, ctx: &egui::Context) {
        match self.capture {
            CaptureState::Idle => {}
            CaptureState::Requested(format) => {
                ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot);
                self.capture = CaptureState::Waiting(format);
                ctx.request_repaint();
            }
            CaptureState::Waiting(format) => {
                let screenshot = ctx.input(|i| {
                    i.events.iter().find_map(|event| match event {
                        egui::Event::Screenshot { image, .. } => Some(image.clone()),
                        _ => None,
                    })
                });
                let Some(screenshot) = screenshot else {
                    ctx.request_repaint();
                    return;
                };

                self.capture = CaptureState::Idle;
                let job = self
                    .grid_rect
                    .and_then(|rect| export::crop_grid(&screenshot, rect, ctx.pixels_per_point()))
                    .and_then(|grid| ExportJob::from_capture(format, grid));
                match job {
                    Some(job) => self.spawn_export(job),
                    None => {
                        log::error!("Screenshot did not contain the schedule grid");
                        self.exporting = false;
                        self.status_message = Some(("Could not capture the schedule".to_string(), true));
                    }
                }
            }
        }
    }

    fn render_toolbar(&mut self, ui: &mut egui::Ui, device: DeviceClass) {
        let palette = Palette::for_theme(self.config.theme);

        ui.horizontal(|ui| {
            ui.label(RichText::new("Weekplan").heading().strong().color(palette.text));
            ui.add_space(12.0);

            let add_text = if device.is_compact() {
                egui_phosphor::regular::PLUS.to_string()
            } else {
                format!("{} Add activity", egui_phosphor::regular::PLUS)
            };
            if views::text_button(ui, &add_text, palette.text).clicked() {
                self.open_add_dialog(None);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let icon_color = palette.secondary_text;
                let hover_color = palette.text;

                if views::icon_button(ui, egui_phosphor::regular::GEAR, icon_color, hover_color)
                    .on_hover_text("Settings")
                    .clicked()
                {
                    self.open_settings();
                }

                let (theme_icon, theme_hint) = match self.config.theme {
                    Theme::Dark => (egui_phosphor::regular::SUN, "Light theme"),
                    Theme::Light => (egui_phosphor::regular::MOON, "Dark theme"),
                };
                if views::icon_button(ui, theme_icon, icon_color, hover_color)
                    .on_hover_text(theme_hint)
                    .clicked()
                {
                    self.toggle_theme();
                }

                // Export menu
                if self.exporting {
                    ui.spinner();
                    ui.label(RichText::new("Exporting...").color(icon_color));
                } else {
                    let export_menu_id = ui.make_persistent_id("export_menu");
                    let export_icon = format!("{} {}", egui_phosphor::regular::EXPORT, egui_phosphor::regular::CARET_DOWN);
                    let export_response = views::icon_button(ui, &export_icon, icon_color, hover_color)
                        .on_hover_text("Export");
                    if export_response.clicked() {
                        ui.memory_mut(|mem| mem.toggle_popup(export_menu_id));
                    }

                    let mut chosen = None;
                    egui::popup::popup_below_widget(
                        ui,
                        export_menu_id,
                        &export_response,
                        egui::PopupCloseBehavior::CloseOnClick,
                        |ui| {
                            ui.set_min_width(180.0);
                            ui.style_mut().spacing.button_padding = egui::vec2(12.0, 8.0);
                            for format in ExportFormat::ALL {
                                let icon = match format {
                                    ExportFormat::Spreadsheet => egui_phosphor::regular::FILE_XLS,
                                    ExportFormat::Pdf => egui_phosphor::regular::FILE_PDF,
                                    ExportFormat::Image => egui_phosphor::regular::FILE_PNG,
                                };
                                let text = RichText::new(format!("{} {}", icon, format.label()));
                                if ui.add(egui::Button::new(text).frame(false)).clicked() {
                                    chosen = Some(format);
                                }
                            }
                        },
                    );
                    if let Some(format) = chosen {
                        self.start_export(format);
                    }
                }
            });
        });
    }

    fn render_add_dialog(&mut self, ctx: &egui::Context, device: DeviceClass) {
        let palette = Palette::for_theme(self.config.theme);
        let mut save_requested = false;
        let mut close_requested = false;

        let (content_bg, frame_color) = dialog_colors(self.config.theme);
        let dialog_frame = egui::Frame::none()
            .fill(content_bg)
            .stroke(egui::Stroke::new(2.0, frame_color))
            .rounding(egui::Rounding::same(8.0))
            .inner_margin(egui::Margin::same(20.0));
        let width = if device.is_compact() { 320.0 } else { 520.0 };

        egui::Window::new("Add activity")
            .collapsible(false)
            .resizable(false)
            .default_width(width)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(dialog_frame)
            .show(ctx, |ui| {
                ui.set_min_width(width);
                egui::ScrollArea::vertical().max_height(ctx.screen_rect().height() * 0.7).show(ui, |ui| {
                    egui::Grid::new("add_activity_grid")
                        .num_columns(2)
                        .spacing([12.0, 10.0])
                        .show(ui, |ui| {
                            ui.label("Title");
                            ui.vertical(|ui| {
                                ui.add(
                                    egui::TextEdit::singleline(&mut self.dialog_title)
                                        .desired_width(width - 120.0)
                                        .hint_text("Math class"),
                                );
                                field_error(ui, &self.dialog_errors, Field::Title, palette.danger);
                            });
                            ui.end_row();

                            ui.label("Description");
                            ui.add(
                                egui::TextEdit::multiline(&mut self.dialog_description)
                                    .desired_width(width - 120.0)
                                    .desired_rows(2)
                                    .hint_text("Optional"),
                            );
                            ui.end_row();

                            ui.label("Color");
                            ui.vertical(|ui| {
                                ui.horizontal(|ui| {
                                    ui.color_edit_button_srgba(&mut self.dialog_color);
                                    let hex = to_hex_color([self.dialog_color.r(), self.dialog_color.g(), self.dialog_color.b()]);
                                    ui.label(RichText::new(hex).monospace().color(palette.secondary_text));
                                });
                                field_error(ui, &self.dialog_errors, Field::Color, palette.danger);
                            });
                            ui.end_row();

                            ui.label("Days");
                            ui.vertical(|ui| {
                                ui.horizontal_wrapped(|ui| {
                                    for day in Day::ALL {
                                        let label = if device.is_compact() { day.short_label() } else { day.label() };
                                        ui.checkbox(&mut self.dialog_days[day.index()], label);
                                    }
                                });
                                field_error(ui, &self.dialog_errors, Field::Days, palette.danger);
                            });
                            ui.end_row();
                        });

                    // One start/end pair per selected day
                    let selected: Vec<Day> = Day::ALL.into_iter().filter(|d| self.dialog_days[d.index()]).collect();
                    if !selected.is_empty() {
                        ui.add_space(8.0);
                        egui::Grid::new("add_activity_times")
                            .num_columns(3)
                            .spacing([12.0, 8.0])
                            .show(ui, |ui| {
                                ui.label("");
                                ui.label(RichText::new("Start").color(palette.secondary_text));
                                ui.label(RichText::new("End").color(palette.secondary_text));
                                ui.end_row();

                                for day in selected {
                                    let slot = &mut self.dialog_slots[day.index()];
                                    ui.label(day.label());
                                    ui.vertical(|ui| {
                                        ui.add(egui::TextEdit::singleline(&mut slot.start).desired_width(80.0).hint_text("09:00"));
                                        field_error(ui, &self.dialog_errors, Field::StartTime(day), palette.danger);
                                    });
                                    ui.vertical(|ui| {
                                        ui.add(egui::TextEdit::singleline(&mut slot.end).desired_width(80.0).hint_text("10:00"));
                                        field_error(ui, &self.dialog_errors, Field::EndTime(day), palette.danger);
                                    });
                                    ui.end_row();
                                }
                            });
                    }

                    if !self.dialog_conflicts.is_empty() {
                        ui.add_space(12.0);
                        egui::Frame::none()
                            .stroke(egui::Stroke::new(1.0, palette.danger))
                            .rounding(4.0)
                            .inner_margin(8.0)
                            .show(ui, |ui| {
                                ui.label(RichText::new("Schedule conflicts detected:").color(palette.danger).strong());
                                for conflict in &self.dialog_conflicts {
                                    ui.label(RichText::new(format!("- {}", conflict)).color(palette.danger));
                                }
                            });
                    }
                });

                ui.add_space(16.0);
                ui.horizontal(|ui| {
                    if views::text_button(ui, "Save", palette.text).clicked() {
                        save_requested = true;
                    }
                    if views::text_button(ui, "Cancel", palette.secondary_text).clicked() {
                        close_requested = true;
                    }
                });
            });

        if save_requested {
            self.save_dialog();
        }
        if close_requested || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.show_dialog = false;
        }
    }

    fn render_details_modal(&mut self, ctx: &egui::Context) {
        let Some(id) = self.selected_activity.clone() else { return };
        let Some(activity) = self.collection.get(&id).cloned() else {
            self.selected_activity = None;
            return;
        };

        let palette = Palette::for_theme(self.config.theme);
        let (content_bg, frame_color) = dialog_colors(self.config.theme);
        let dialog_frame = egui::Frame::none()
            .fill(content_bg)
            .stroke(egui::Stroke::new(2.0, frame_color))
            .rounding(egui::Rounding::same(8.0))
            .inner_margin(egui::Margin::same(20.0));

        let mut remove = false;
        let mut close = false;
        egui::Window::new("Activity")
            .collapsible(false)
            .resizable(false)
            .default_width(300.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(dialog_frame)
            .show(ctx, |ui| {
                views::activity_details(ui, &activity, self.config.clock_format);
                ui.add_space(16.0);
                ui.horizontal(|ui| {
                    let remove_text = format!("{} Remove activity", egui_phosphor::regular::TRASH);
                    if views::text_button(ui, &remove_text, palette.danger).clicked() {
                        remove = true;
                    }
                    if views::text_button(ui, "Close", palette.secondary_text).clicked() {
                        close = true;
                    }
                });
            });

        if remove {
            self.remove_activity(&id);
        }
        if close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.selected_activity = None;
        }
    }

    fn render_settings(&mut self, ui: &mut egui::Ui) {
        let palette = Palette::for_theme(self.config.theme);
        let section_color = palette.secondary_text;

        // === Display ===
        ui.label(RichText::new("Display").color(section_color).strong());
        ui.add_space(8.0);

        egui::Grid::new("display_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("Font scale");
                ui.horizontal(|ui| {
                    ui.add(egui::Slider::new(&mut self.settings_font_scale, 0.75..=2.0).show_value(false));
                    ui.label(format!("{:.0}%", self.settings_font_scale * 100.0));
                });
                ui.end_row();

                ui.label("Clock format");
                ui.horizontal(|ui| {
                    ui.radio_value(&mut self.settings_clock_format, ClockFormat::Hour24, "14:30");
                    ui.radio_value(&mut self.settings_clock_format, ClockFormat::Hour12, "2:30pm");
                });
                ui.end_row();

                ui.label("Theme");
                ui.horizontal(|ui| {
                    ui.radio_value(&mut self.settings_theme, Theme::Dark, "Dark");
                    ui.radio_value(&mut self.settings_theme, Theme::Light, "Light");
                });
                ui.end_row();

                ui.label("Visible hours");
                ui.horizontal(|ui| {
                    ui.add(egui::DragValue::new(&mut self.settings_start_hour).range(0..=23).suffix(":00"));
                    ui.label("to");
                    ui.add(egui::DragValue::new(&mut self.settings_end_hour).range(1..=24).suffix(":00"));
                });
                ui.end_row();
            });

        ui.add_space(20.0);

        // === Activities ===
        ui.label(RichText::new("Activities").color(section_color).strong());
        ui.add_space(8.0);

        egui::Grid::new("activity_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("Default color");
                ui.color_edit_button_srgba(&mut self.settings_default_color);
                ui.end_row();

                ui.label("Conflicts");
                ui.checkbox(&mut self.settings_check_siblings, "Also check days added together");
                ui.end_row();
            });

        ui.add_space(20.0);

        // === Export ===
        ui.label(RichText::new("Export").color(section_color).strong());
        ui.add_space(8.0);

        let default_dir = Config::default().export_dir();
        egui::Grid::new("export_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("Folder");
                ui.add(
                    egui::TextEdit::singleline(&mut self.settings_export_dir)
                        .hint_text(default_dir.display().to_string())
                        .desired_width(320.0),
                );
                ui.end_row();

                ui.label("");
                ui.checkbox(&mut self.settings_open_after_export, "Open file after export");
                ui.end_row();
            });

        if let Some(error) = &self.settings_error {
            ui.add_space(12.0);
            ui.label(RichText::new(error).color(palette.danger));
        }

        ui.add_space(24.0);

        ui.horizontal(|ui| {
            if views::text_button(ui, "Save", palette.text).clicked() {
                self.save_settings();
            }
            if views::text_button(ui, "Cancel", palette.secondary_text).clicked() {
                self.show_settings = false;
            }
        });
    }

    fn render_status(&mut self, ui: &mut egui::Ui) {
        let palette = Palette::for_theme(self.config.theme);
        let mut dismiss_message = false;
        let mut copy_message: Option<String> = None;

        if let Some((msg, is_error)) = &self.status_message {
            let color = if *is_error { palette.danger } else { palette.success };
            let dim_color = palette.secondary_text;
            ui.horizontal(|ui| {
                ui.add(egui::Label::new(RichText::new(msg).color(color)));
                ui.add_space(8.0);

                let copy_btn = ui.add(
                    egui::Label::new(RichText::new(egui_phosphor::regular::COPY).size(14.0).color(dim_color))
                        .sense(egui::Sense::click()),
                );
                if copy_btn.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
                if copy_btn.clicked() {
                    copy_message = Some(msg.clone());
                }

                let close_btn = ui.add(
                    egui::Label::new(RichText::new(egui_phosphor::regular::X).size(14.0).color(dim_color))
                        .sense(egui::Sense::click()),
                );
                if close_btn.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
                if close_btn.clicked() {
                    dismiss_message = true;
                }
            });
        }

        if let Some(text) = copy_message {
            ui.ctx().copy_text(text);
        }
        if dismiss_message {
            self.status_message = None;
        }
    }
}

impl eframe::App for PlannerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Pinch-to-zoom (trackpad pinch or Ctrl+scroll)
        let zoom_delta = ctx.input(|i| i.zoom_delta());
        if zoom_delta != 1.0 {
            self.config.font_scale = (self.config.font_scale * zoom_delta).clamp(0.75, 2.5);
            if (zoom_delta - 1.0).abs() > 0.01 {
                let _ = self.config.save();
            }
        }
        ctx.set_pixels_per_point(self.config.font_scale);

        self.check_async_results();
        self.handle_capture(ctx);

        let device = DeviceClass::from_width(ctx.screen_rect().width());

        if self.show_dialog {
            self.render_add_dialog(ctx, device);
        }

        if device.is_compact() {
            self.render_details_modal(ctx);
        } else {
            self.selected_activity = None;
        }

        if self.show_settings {
            let (content_bg, frame_color) = dialog_colors(self.config.theme);
            let dialog_frame = egui::Frame::none()
                .fill(content_bg)
                .stroke(egui::Stroke::new(2.0, frame_color))
                .rounding(egui::Rounding::same(8.0))
                .inner_margin(egui::Margin::same(20.0));

            egui::Window::new("Settings")
                .collapsible(false)
                .resizable(false)
                .default_width(560.0)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .frame(dialog_frame)
                .show(ctx, |ui| {
                    self.render_settings(ui);
                });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().inner_margin(egui::Margin::symmetric(12.0, 8.0)))
            .show(ctx, |ui| {
                self.render_toolbar(ui, device);
                ui.add_space(4.0);
                self.render_status(ui);

                if self.collection.is_empty() {
                    let hint = if device.is_compact() {
                        "Tap + to add your first activity."
                    } else {
                        "Double-click an empty slot or use Add activity to plan your week."
                    };
                    ui.label(RichText::new(hint).weak());
                }
                ui.add_space(4.0);

                let palette = Palette::for_theme(self.config.theme);
                let result = views::render_schedule_view(
                    ui,
                    self.collection.activities(),
                    self.window,
                    self.config.clock_format,
                    device,
                    palette,
                );
                self.grid_rect = result.grid_rect;

                if let Some(id) = result.remove {
                    self.remove_activity(&id);
                }
                if let Some(id) = result.selected {
                    self.selected_activity = Some(id);
                }
                if let Some(preset) = result.add_at {
                    if !self.show_dialog {
                        self.open_add_dialog(Some(preset));
                    }
                }
            });
    }
}

/// The configured default color, or indigo if the config holds something unparseable
fn config_color(config: &Config) -> Color32 {
    let [r, g, b] = parse_hex_color(&config.default_color)
        .or_else(|| parse_hex_color(DEFAULT_COLOR))
        .unwrap_or([0x4f, 0x46, 0xe5]);
    Color32::from_rgb(r, g, b)
}

/// Inline message under a form field
fn field_error(ui: &mut egui::Ui, errors: &ValidationErrors, field: Field, color: Color32) {
    if let Some(message) = errors.for_field(field) {
        ui.label(RichText::new(message).small().color(color));
    }
}
