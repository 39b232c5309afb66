use anyhow::{Context, Result};
use egui::{ColorImage, Rect};
use image::{ImageFormat, RgbaImage};
use std::path::Path;

/// Cut the grid region (in points) out of a full-window screenshot.
///
/// The region is clamped to the screenshot; `None` if nothing is left.
pub fn crop_grid(screenshot: &ColorImage, region: Rect, pixels_per_point: f32) -> Option<RgbaImage> {
    let [width, height] = screenshot.size;
    let to_px = |v: f32, max: usize| ((v * pixels_per_point).round().max(0.0) as usize).min(max);

    let min_x = to_px(region.min.x, width);
    let min_y = to_px(region.min.y, height);
    let max_x = to_px(region.max.x, width);
    let max_y = to_px(region.max.y, height);
    if max_x <= min_x || max_y <= min_y {
        return None;
    }

    let mut bytes = Vec::with_capacity((max_x - min_x) * (max_y - min_y) * 4);
    for y in min_y..max_y {
        let row = &screenshot.pixels[y * width + min_x..y * width + max_x];
        for pixel in row {
            bytes.extend_from_slice(&pixel.to_srgba_unmultiplied());
        }
    }

    RgbaImage::from_raw((max_x - min_x) as u32, (max_y - min_y) as u32, bytes)
}

/// Drop alpha by compositing over white
pub fn flatten_to_rgb(grid: &RgbaImage) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(grid.as_raw().len() / 4 * 3);
    for pixel in grid.pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = u16::from(a);
        for channel in [r, g, b] {
            let blended = (u16::from(channel) * alpha + 255 * (255 - alpha)) / 255;
            rgb.push(blended as u8);
        }
    }
    rgb
}

pub fn write_png(grid: &RgbaImage, path: &Path) -> Result<()> {
    grid.save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, Color32};

    fn screenshot() -> ColorImage {
        // 20x10 image, left half red, right half blue
        let mut image = ColorImage::new([20, 10], Color32::RED);
        for y in 0..10 {
            for x in 10..20 {
                image.pixels[y * 20 + x] = Color32::BLUE;
            }
        }
        image
    }

    #[test]
    fn crops_region_in_points() {
        let region = Rect::from_min_max(pos2(5.0, 0.0), pos2(10.0, 5.0));
        let cropped = crop_grid(&screenshot(), region, 1.0).unwrap();
        assert_eq!(cropped.dimensions(), (5, 5));
        assert_eq!(cropped.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn honors_pixels_per_point() {
        let region = Rect::from_min_max(pos2(5.0, 0.0), pos2(10.0, 5.0));
        let cropped = crop_grid(&screenshot(), region, 2.0).unwrap();
        assert_eq!(cropped.dimensions(), (10, 10));
        assert_eq!(cropped.get_pixel(9, 9).0, [0, 0, 255, 255]);
    }

    #[test]
    fn clamps_to_screenshot() {
        let region = Rect::from_min_max(pos2(15.0, -4.0), pos2(40.0, 40.0));
        let cropped = crop_grid(&screenshot(), region, 1.0).unwrap();
        assert_eq!(cropped.dimensions(), (5, 10));

        let outside = Rect::from_min_max(pos2(30.0, 0.0), pos2(40.0, 5.0));
        assert!(crop_grid(&screenshot(), outside, 1.0).is_none());
    }

    #[test]
    fn flattens_over_white() {
        let mut grid = RgbaImage::new(2, 1);
        grid.put_pixel(0, 0, image::Rgba([10, 20, 30, 255]));
        grid.put_pixel(1, 0, image::Rgba([0, 0, 0, 0]));
        assert_eq!(flatten_to_rgb(&grid), vec![10, 20, 30, 255, 255, 255]);
    }
}
