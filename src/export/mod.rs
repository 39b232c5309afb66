//! Export sinks for the weekly schedule.
//!
//! Every export works on an owned snapshot taken when the user clicks, so a
//! job can run off the UI thread without touching the live collection.

mod pdf;
mod raster;
mod spreadsheet;

use anyhow::{ensure, Context, Result};
use image::RgbaImage;
use std::fs;
use std::path::{Path, PathBuf};

use crate::schedule::Activity;

pub use pdf::{fit_to_page, write_pdf, Placement, PAGE_HEIGHT, PAGE_MARGIN, PAGE_WIDTH};
pub use raster::{crop_grid, flatten_to_rgb, write_png};
pub use spreadsheet::{build_sheet, write_xlsx, SheetCell, SheetGrid, SheetRow};

pub const EMPTY_SCHEDULE_MESSAGE: &str = "No activities to export";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Spreadsheet,
    Pdf,
    Image,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Spreadsheet, ExportFormat::Pdf, ExportFormat::Image];

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => "Excel spreadsheet",
            ExportFormat::Pdf => "PDF document",
            ExportFormat::Image => "PNG image",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => "xlsx",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Image => "png",
        }
    }

    pub fn file_name(self) -> String {
        format!("my-schedule.{}", self.extension())
    }

    /// PDF and PNG are rendered from a capture of the on-screen grid
    pub fn needs_capture(self) -> bool {
        !matches!(self, ExportFormat::Spreadsheet)
    }
}

/// A ready-to-run export over a snapshot
pub enum ExportJob {
    Spreadsheet(Vec<Activity>),
    Pdf(RgbaImage),
    Image(RgbaImage),
}

impl ExportJob {
    /// Job for a capture-based format; `None` for the spreadsheet
    pub fn from_capture(format: ExportFormat, grid: RgbaImage) -> Option<Self> {
        match format {
            ExportFormat::Pdf => Some(ExportJob::Pdf(grid)),
            ExportFormat::Image => Some(ExportJob::Image(grid)),
            ExportFormat::Spreadsheet => None,
        }
    }

    pub fn format(&self) -> ExportFormat {
        match self {
            ExportJob::Spreadsheet(_) => ExportFormat::Spreadsheet,
            ExportJob::Pdf(_) => ExportFormat::Pdf,
            ExportJob::Image(_) => ExportFormat::Image,
        }
    }

    /// Write the export into `dir`, returning the created file
    pub fn run(self, dir: &Path) -> Result<PathBuf> {
        let path = output_path(dir, self.format())?;
        match self {
            ExportJob::Spreadsheet(activities) => {
                ensure_exportable(&activities)?;
                write_xlsx(&build_sheet(&activities), &path)?;
            }
            ExportJob::Pdf(grid) => write_pdf(&grid, &path)?,
            ExportJob::Image(grid) => write_png(&grid, &path)?,
        }
        log::info!("Exported schedule to {}", path.display());
        Ok(path)
    }
}

pub fn ensure_exportable(activities: &[Activity]) -> Result<()> {
    ensure!(!activities.is_empty(), EMPTY_SCHEDULE_MESSAGE);
    Ok(())
}

/// Create `dir` if needed and return the target path for `format` inside it
pub fn output_path(dir: &Path, format: ExportFormat) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
    Ok(dir.join(format.file_name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Day;

    #[test]
    fn file_names() {
        assert_eq!(ExportFormat::Spreadsheet.file_name(), "my-schedule.xlsx");
        assert_eq!(ExportFormat::Pdf.file_name(), "my-schedule.pdf");
        assert_eq!(ExportFormat::Image.file_name(), "my-schedule.png");
        assert!(!ExportFormat::Spreadsheet.needs_capture());
        assert!(ExportFormat::Image.needs_capture());
    }

    #[test]
    fn capture_jobs() {
        let grid = RgbaImage::new(4, 4);
        assert_eq!(
            ExportJob::from_capture(ExportFormat::Pdf, grid.clone()).map(|j| j.format()),
            Some(ExportFormat::Pdf)
        );
        assert!(ExportJob::from_capture(ExportFormat::Spreadsheet, grid).is_none());
    }

    #[test]
    fn empty_collection_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let err = ExportJob::Spreadsheet(Vec::new()).run(dir.path()).unwrap_err();
        assert_eq!(err.to_string(), EMPTY_SCHEDULE_MESSAGE);
        assert!(!dir.path().join("my-schedule.xlsx").exists());
    }

    #[test]
    fn spreadsheet_job_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports");
        let activity = Activity::new("Yoga", Day::Saturday, "09:00".parse().unwrap(), "10:00".parse().unwrap());

        let path = ExportJob::Spreadsheet(vec![activity]).run(&target).unwrap();
        assert_eq!(path, target.join("my-schedule.xlsx"));
        assert!(path.exists());
    }

    #[test]
    fn image_job_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let grid = RgbaImage::from_pixel(40, 20, image::Rgba([79, 70, 229, 255]));

        let path = ExportJob::Image(grid).run(dir.path()).unwrap();
        let reloaded = image::open(&path).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (40, 20));
    }
}
