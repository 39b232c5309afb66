use anyhow::{ensure, Context, Result};
use image::RgbaImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::Path;

use super::raster::flatten_to_rgb;

/// Landscape A4 in points
pub const PAGE_WIDTH: f32 = 841.89;
pub const PAGE_HEIGHT: f32 = 595.28;
/// 10mm
pub const PAGE_MARGIN: f32 = 28.35;

/// Where the image lands on the page, in points from the bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Scale an image to fit inside the page margins, keeping its aspect ratio, centered
pub fn fit_to_page(image_width: u32, image_height: u32) -> Placement {
    let available_width = PAGE_WIDTH - 2.0 * PAGE_MARGIN;
    let available_height = PAGE_HEIGHT - 2.0 * PAGE_MARGIN;

    let scale = (available_width / image_width.max(1) as f32).min(available_height / image_height.max(1) as f32);
    let width = image_width as f32 * scale;
    let height = image_height as f32 * scale;

    Placement {
        x: (PAGE_WIDTH - width) / 2.0,
        y: (PAGE_HEIGHT - height) / 2.0,
        width,
        height,
    }
}

/// Write a single-page PDF with the grid image centered on it
pub fn write_pdf(grid: &RgbaImage, path: &Path) -> Result<()> {
    ensure!(grid.width() > 0 && grid.height() > 0, "Schedule capture is empty");

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(grid.width()),
            "Height" => i64::from(grid.height()),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        flatten_to_rgb(grid),
    );
    let image_id = doc.add_object(image);

    let placement = fit_to_page(grid.width(), grid.height());
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    placement.width.into(),
                    0.into(),
                    0.into(),
                    placement.height.into(),
                    placement.x.into(),
                    placement.y.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().context("Failed to encode PDF page")?,
    ));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        },
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    doc.save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 0.01, "{a} != {b}");
    }

    #[test]
    fn wide_image_fills_page_width() {
        let placement = fit_to_page(1000, 500);
        assert_close(placement.width, PAGE_WIDTH - 2.0 * PAGE_MARGIN);
        assert_close(placement.height, placement.width / 2.0);
        assert_close(placement.x, PAGE_MARGIN);
        assert_close(placement.y, (PAGE_HEIGHT - placement.height) / 2.0);
    }

    #[test]
    fn tall_image_fills_page_height() {
        let placement = fit_to_page(400, 800);
        assert_close(placement.height, PAGE_HEIGHT - 2.0 * PAGE_MARGIN);
        assert_close(placement.width, placement.height / 2.0);
        assert_close(placement.y, PAGE_MARGIN);
        assert_close(placement.x + placement.width / 2.0, PAGE_WIDTH / 2.0);
    }

    #[test]
    fn small_image_is_scaled_up() {
        let placement = fit_to_page(100, 70);
        assert!(placement.width > 100.0);
        assert!(placement.x >= PAGE_MARGIN - 0.01);
        assert!(placement.y >= PAGE_MARGIN - 0.01);
    }

    #[test]
    fn writes_pdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.pdf");
        let grid = RgbaImage::from_pixel(64, 32, image::Rgba([255, 255, 255, 255]));

        write_pdf(&grid, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
    }

    #[test]
    fn rejects_empty_capture() {
        let dir = tempfile::tempdir().unwrap();
        assert!(write_pdf(&RgbaImage::new(0, 0), &dir.path().join("x.pdf")).is_err());
    }
}
