//! Weekly activity planner: a seven-day grid of timed activities with
//! conflict checking, local persistence and spreadsheet/PDF/PNG export.

pub mod config;
pub mod export;
pub mod schedule;
pub mod storage;
pub mod ui;
