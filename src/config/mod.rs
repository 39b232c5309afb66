use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::schedule::{BatchPolicy, VisibleWindow, DEFAULT_COLOR, DEFAULT_END_HOUR, DEFAULT_START_HOUR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ClockFormat {
    #[default]
    Hour24,      // "14:30"
    Hour12,      // "2:30pm"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,
    #[serde(default)]
    pub clock_format: ClockFormat,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_schedule_start_hour")]
    pub schedule_start_hour: u8,
    #[serde(default = "default_schedule_end_hour")]
    pub schedule_end_hour: u8,
    #[serde(default = "default_color")]
    pub default_color: String,
    /// Where exports are written; the download directory when unset
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub open_after_export: bool,
    /// Also reject overlaps between days submitted together
    #[serde(default)]
    pub check_batch_siblings: bool,
}

fn default_schedule_start_hour() -> u8 {
    DEFAULT_START_HOUR  // 6am
}

fn default_schedule_end_hour() -> u8 {
    DEFAULT_END_HOUR  // 10pm
}

fn default_true() -> bool {
    true
}

fn default_font_scale() -> f32 {
    1.0
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            font_scale: 1.0,
            clock_format: ClockFormat::Hour24,
            theme: Theme::Dark,
            schedule_start_hour: DEFAULT_START_HOUR,
            schedule_end_hour: DEFAULT_END_HOUR,
            default_color: default_color(),
            export_dir: None,
            open_after_export: true,
            check_batch_siblings: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            serde_json::from_str(&contents)
                .context("Failed to parse config file")
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "weekplan", "weekplan")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Grid window from the configured hours, or the 6-22 default if they don't form a range
    pub fn visible_window(&self) -> VisibleWindow {
        VisibleWindow::new(self.schedule_start_hour, self.schedule_end_hour).unwrap_or_else(|| {
            log::warn!(
                "Ignoring schedule hours {}-{}, using defaults",
                self.schedule_start_hour,
                self.schedule_end_hour
            );
            VisibleWindow::default()
        })
    }

    pub fn batch_policy(&self) -> BatchPolicy {
        if self.check_batch_siblings {
            BatchPolicy::IncludeSiblings
        } else {
            BatchPolicy::ExistingOnly
        }
    }

    /// Configured export directory, else the user's download directory, else the working directory
    pub fn export_dir(&self) -> PathBuf {
        if let Some(dir) = &self.export_dir {
            return dir.clone();
        }
        directories::UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(|d| d.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.schedule_start_hour, 6);
        assert_eq!(config.schedule_end_hour, 22);
        assert_eq!(config.default_color, DEFAULT_COLOR);
        assert_eq!(config.theme, Theme::Dark);
        assert!(config.open_after_export);
        assert_eq!(config.batch_policy(), BatchPolicy::ExistingOnly);
    }

    #[test]
    fn invalid_hours_fall_back_to_default_window() {
        let config = Config {
            schedule_start_hour: 20,
            schedule_end_hour: 8,
            ..Config::default()
        };
        assert_eq!(config.visible_window(), VisibleWindow::default());

        let config = Config {
            schedule_start_hour: 7,
            schedule_end_hour: 19,
            ..Config::default()
        };
        assert_eq!(config.visible_window().start_hour(), 7);
    }

    #[test]
    fn explicit_export_dir_wins() {
        let config = Config {
            export_dir: Some(PathBuf::from("/tmp/plans")),
            ..Config::default()
        };
        assert_eq!(config.export_dir(), PathBuf::from("/tmp/plans"));
    }

    #[test]
    fn theme_toggles() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }
}
