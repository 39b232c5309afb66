use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};

use crate::config::Theme;

/// Font family for filled Phosphor icons
pub fn phosphor_fill_family() -> FontFamily {
    FontFamily::Name("phosphor-fill".into())
}

pub fn setup_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();

    // Phosphor Regular icons as fallback in Proportional family
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);

    // Phosphor Fill as a separate family, with the default proportional fonts behind it
    fonts.font_data.insert(
        "phosphor-fill".into(),
        egui_phosphor::Variant::Fill.font_data(),
    );
    let mut fill_family = vec!["phosphor-fill".to_owned()];
    if let Some(proportional) = fonts.families.get(&FontFamily::Proportional) {
        fill_family.extend(proportional.iter().cloned());
    }
    fonts.families.insert(phosphor_fill_family(), fill_family);

    ctx.set_fonts(fonts);
}

/// Colors used by the planner's own painting, per theme
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color32,
    pub grid_fill: Color32,
    pub today_fill: Color32,
    pub grid_line: Color32,
    pub hour_line: Color32,
    pub text: Color32,
    pub secondary_text: Color32,
    pub accent: Color32,
    pub danger: Color32,
    pub success: Color32,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                background: Color32::BLACK,
                grid_fill: Color32::from_rgb(20, 20, 18),
                today_fill: Color32::from_rgb(28, 34, 44),
                grid_line: Color32::from_rgb(56, 56, 52),
                hour_line: Color32::from_rgb(36, 36, 34),
                text: Color32::WHITE,
                secondary_text: Color32::from_rgb(176, 176, 168),
                accent: Color32::from_rgb(99, 102, 241),
                danger: Color32::from_rgb(239, 68, 68),
                success: Color32::from_rgb(34, 197, 94),
            },
            Theme::Light => Self {
                background: Color32::from_rgb(250, 250, 249),
                grid_fill: Color32::WHITE,
                today_fill: Color32::from_rgb(238, 242, 255),
                grid_line: Color32::from_rgb(214, 211, 209),
                hour_line: Color32::from_rgb(235, 233, 231),
                text: Color32::from_rgb(28, 25, 23),
                secondary_text: Color32::from_rgb(87, 83, 78),
                accent: Color32::from_rgb(79, 70, 229),
                danger: Color32::from_rgb(220, 38, 38),
                success: Color32::from_rgb(22, 163, 74),
            },
        }
    }
}

pub fn setup_theme(ctx: &egui::Context, theme: Theme) {
    let mut style = Style::default();
    let palette = Palette::for_theme(theme);

    let mut visuals = match theme {
        Theme::Dark => {
            let mut visuals = Visuals::dark();
            // Widget colors - warm grays (R=G > B for warmth)
            visuals.faint_bg_color = Color32::from_rgb(20, 20, 18);
            visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(40, 40, 38);
            visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, Color32::from_rgb(176, 176, 168));
            visuals.widgets.inactive.bg_fill = Color32::from_rgb(56, 56, 52);
            visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, Color32::from_rgb(200, 200, 192));
            visuals.widgets.hovered.bg_fill = Color32::from_rgb(80, 80, 74);
            visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, Color32::WHITE);
            visuals
        }
        Theme::Light => Visuals::light(),
    };

    visuals.panel_fill = palette.background;
    visuals.window_fill = palette.background;
    visuals.extreme_bg_color = palette.grid_fill;

    visuals.widgets.active.bg_fill = palette.accent;
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);
    visuals.selection.bg_fill = palette.accent;
    visuals.selection.stroke = Stroke::new(1.0, Color32::WHITE);
    visuals.hyperlink_color = palette.accent;

    visuals.widgets.noninteractive.rounding = Rounding::same(6.0);
    visuals.widgets.inactive.rounding = Rounding::same(6.0);
    visuals.widgets.hovered.rounding = Rounding::same(6.0);
    visuals.widgets.active.rounding = Rounding::same(6.0);
    visuals.window_rounding = Rounding::same(8.0);

    style.visuals = visuals;

    // Font sizes - scaled as a whole through pixels_per_point
    style.text_styles = [
        (TextStyle::Small, FontId::new(12.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(14.0, FontFamily::Monospace)),
    ]
    .into();

    style.spacing.item_spacing = egui::vec2(10.0, 8.0);
    style.spacing.button_padding = egui::vec2(14.0, 8.0);
    style.spacing.window_margin = egui::Margin::same(20.0);

    ctx.set_style(style);
}

/// Returns (content_bg, frame_color) for dialogs
pub fn dialog_colors(theme: Theme) -> (Color32, Color32) {
    let palette = Palette::for_theme(theme);
    (palette.background, palette.grid_line)
}

/// Readable label color on top of an activity fill
pub fn text_on(fill: Color32) -> Color32 {
    let luma = 0.299 * f32::from(fill.r()) + 0.587 * f32::from(fill.g()) + 0.114 * f32::from(fill.b());
    if luma > 150.0 {
        Color32::from_rgb(28, 25, 23)
    } else {
        Color32::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_contrast() {
        assert_eq!(text_on(Color32::from_rgb(79, 70, 229)), Color32::WHITE);
        assert_ne!(text_on(Color32::from_rgb(250, 204, 21)), Color32::WHITE);
    }
}
