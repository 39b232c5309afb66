#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;

use weekplan::storage::open_default_store;
use weekplan::ui::PlannerApp;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1200.0, 860.0])
        .with_min_inner_size([360.0, 560.0])
        .with_title("Weekplan");

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let store = open_default_store();
    eframe::run_native(
        "Weekplan",
        options,
        Box::new(|cc| Ok(Box::new(PlannerApp::new(cc, store)))),
    )
}
