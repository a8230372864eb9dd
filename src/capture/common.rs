use anyhow::{anyhow, Result};
use image::{imageops, ImageFormat, RgbaImage};
use std::path::Path;
use std::time::Instant;

use super::region::{crop_region, BoundingBox};
use crate::logger;

/// Largest edge of the preview shown after a selection
pub const THUMBNAIL_SIZE: u32 = 150;

/// Captures the whole primary screen
pub fn capture_screen_image() -> Result<RgbaImage> {
    let start = Instant::now();
    let mut capturer = super::create_capturer()?;
    let frame = capturer.capture_screen()?;
    logger::log_performance("full screen capture", start.elapsed().as_secs_f64() * 1000.0);
    Ok(frame)
}

/// Fit `image` inside a `max_size` square keeping its aspect ratio.
/// Images already small enough are returned unscaled.
pub fn thumbnail(image: &RgbaImage, max_size: u32) -> RgbaImage {
    let (w, h) = image.dimensions();
    if w <= max_size && h <= max_size {
        return image.clone();
    }

    let scale = max_size as f64 / w.max(h) as f64;
    let tw = ((w as f64 * scale).round() as u32).max(1);
    let th = ((h as f64 * scale).round() as u32).max(1);
    imageops::thumbnail(image, tw, th)
}

/// Preview thumbnail of `region` cut from an already captured screen
pub fn preview_from_screen(screen: &RgbaImage, region: &BoundingBox) -> Result<RgbaImage> {
    let cropped = crop_region(screen, region)?;
    Ok(thumbnail(&cropped, THUMBNAIL_SIZE))
}

/// Saves an image buffer as PNG
pub fn save_image_buffer(path: &Path, buffer: &RgbaImage) -> Result<()> {
    log::debug!("Saving image to {}", path.display());
    buffer
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| anyhow!("Failed to save {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnail_keeps_aspect_ratio() {
        let image = RgbaImage::new(600, 300);
        let thumb = thumbnail(&image, THUMBNAIL_SIZE);
        assert_eq!(thumb.dimensions(), (150, 75));
    }

    #[test]
    fn thumbnail_never_upscales() {
        let image = RgbaImage::new(40, 90);
        assert_eq!(thumbnail(&image, THUMBNAIL_SIZE).dimensions(), (40, 90));
    }

    #[test]
    fn preview_crops_then_shrinks() {
        let screen = RgbaImage::new(1920, 1080);
        let preview = preview_from_screen(&screen, &BoundingBox::new(100, 100, 400, 1000)).unwrap();
        assert_eq!(preview.dimensions(), (50, 150));
    }
}
