//! Fitting slide images onto a fixed-size white frame.

use crate::error::Result;
use crate::segment::{FRAME_HEIGHT, FRAME_WIDTH};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use std::path::Path;

/// Size of an image scaled down to fit within `max_w` x `max_h`, aspect preserved.
/// Images that already fit keep their size.
pub fn fit_within(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if width <= max_w && height <= max_h {
        return (width, height);
    }
    let scale = (max_w as f64 / width as f64).min(max_h as f64 / height as f64);
    let w = ((width as f64 * scale).round() as u32).clamp(1, max_w);
    let h = ((height as f64 * scale).round() as u32).clamp(1, max_h);
    (w, h)
}

/// Center an image on a white frame, shrinking it first if it is too large.
pub fn compose_on_canvas(source: &DynamicImage) -> RgbaImage {
    let (width, height) = source.dimensions();
    let (w, h) = fit_within(width, height, FRAME_WIDTH, FRAME_HEIGHT);

    let fitted = if (w, h) == (width, height) {
        source.to_rgba8()
    } else {
        source.resize_exact(w, h, FilterType::Lanczos3).to_rgba8()
    };

    let mut canvas = RgbaImage::from_pixel(FRAME_WIDTH, FRAME_HEIGHT, Rgba([255, 255, 255, 255]));
    let x = (FRAME_WIDTH - w) / 2;
    let y = (FRAME_HEIGHT - h) / 2;
    imageops::overlay(&mut canvas, &fitted, x as i64, y as i64);
    canvas
}

/// Load `input`, normalize it onto the frame, and write it to `output` as PNG.
pub fn fit_to_canvas(input: &Path, output: &Path) -> Result<()> {
    let source = image::open(input)?;
    let canvas = compose_on_canvas(&source);
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    DynamicImage::ImageRgba8(canvas).to_rgb8().save(output)?;
    Ok(())
}
