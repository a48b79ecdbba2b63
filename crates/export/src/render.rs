//! Last-resort exporter: draws each slide's extracted text onto a blank canvas.

use crate::error::{ExportError, Result};
use crate::mechanisms::SlideExporter;
use font_kit::canvas::{Canvas, Format, RasterizationOptions};
use font_kit::family_name::FamilyName;
use font_kit::font::Font;
use font_kit::hinting::HintingOptions;
use font_kit::properties::Properties;
use font_kit::source::SystemSource;
use image::{Rgb, RgbImage};
use pathfinder_geometry::transform2d::Transform2F;
use pathfinder_geometry::vector::Vector2F;
use slidecast_core::{ExtractedSlide, PlaceholderRole};
use slidecast_pptx::PptxParser;
use std::path::Path;

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;
const MARGIN: f32 = 60.0;
const TOP: f32 = 80.0;
const TITLE_SIZE: f32 = 48.0;
const TITLE_STEP: f32 = 100.0;
const BULLET_SIZE: f32 = 32.0;
const BULLET_STEP: f32 = 45.0;
const TEXT_SIZE: f32 = 24.0;
const TEXT_STEP: f32 = 35.0;
const BOTTOM_RESERVE: f32 = 100.0;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const GREY: Rgb<u8> = Rgb([128, 128, 128]);
const RED: Rgb<u8> = Rgb([200, 0, 0]);

/// Preferred font families, most specific first.
const FONT_FAMILIES: &[&str] = &["Helvetica", "Arial", "DejaVu Sans", "Liberation Sans"];

/// Text content of a slide, sorted into drawing roles.
#[derive(Debug, Default, PartialEq)]
pub struct SlideLayout {
    pub title: Option<String>,
    pub bullets: Vec<String>,
    pub other: Vec<String>,
}

impl SlideLayout {
    /// Sort slide text by placeholder role. Text outside any placeholder
    /// becomes the title if it is short and no title has been seen yet.
    pub fn from_slide(slide: &ExtractedSlide) -> Self {
        let mut layout = Self::default();

        for line in &slide.lines {
            let text = line.text.trim();
            if text.is_empty() {
                continue;
            }
            match line.placeholder {
                Some(PlaceholderRole::Title) => layout.title = Some(text.to_string()),
                Some(PlaceholderRole::Body) => layout.bullets.extend(
                    text.lines()
                        .map(str::trim)
                        .filter(|l| !l.is_empty())
                        .map(str::to_string),
                ),
                Some(PlaceholderRole::Other) => layout.other.push(text.to_string()),
                None => {
                    if layout.title.is_none() && text.chars().count() < 100 {
                        layout.title = Some(text.to_string());
                    } else {
                        layout.other.push(text.to_string());
                    }
                }
            }
        }

        layout
    }
}

/// Greedy word wrap: a word joins the current line while the line stays narrower than `max_width`.
pub fn wrap_words(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current.join(" "), word)
        };

        if measure(&candidate) < max_width {
            current.push(word);
        } else {
            if !current.is_empty() {
                lines.push(current.join(" "));
            }
            current = vec![word];
        }
    }

    if !current.is_empty() {
        lines.push(current.join(" "));
    }
    lines
}

/// Draws text onto an RGB image using a system font.
pub struct TextPainter {
    font: Font,
}

impl TextPainter {
    /// Load the first available preferred family, else any sans-serif font.
    pub fn system() -> Result<Self> {
        let mut families: Vec<FamilyName> = FONT_FAMILIES
            .iter()
            .map(|f| FamilyName::Title(f.to_string()))
            .collect();
        families.push(FamilyName::SansSerif);

        let handle = SystemSource::new()
            .select_best_match(&families, &Properties::new())
            .map_err(|e| ExportError::Render(format!("No system font available: {}", e)))?;
        let font = handle
            .load()
            .map_err(|e| ExportError::Render(format!("Failed to load font: {}", e)))?;

        log::debug!("Rendering slides with font {}", font.full_name());
        Ok(Self { font })
    }

    fn scale(&self, size: f32) -> f32 {
        size / self.font.metrics().units_per_em as f32
    }

    /// Advance width of `text` in pixels at `size`.
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        let scale = self.scale(size);
        text.chars()
            .map(|c| match self.font.glyph_for_char(c) {
                Some(glyph) => self.font.advance(glyph).map(|a| a.x() * scale).unwrap_or(0.0),
                None => size * 0.25,
            })
            .sum()
    }

    /// Draw `text` with its top edge at `y`.
    pub fn draw(&self, image: &mut RgbImage, text: &str, x: f32, y: f32, size: f32, color: Rgb<u8>) -> Result<()> {
        let scale = self.scale(size);
        let baseline = y + self.font.metrics().ascent * scale;
        let mut pen_x = x;

        for c in text.chars() {
            let Some(glyph) = self.font.glyph_for_char(c) else {
                pen_x += size * 0.25;
                continue;
            };

            let bounds = self
                .font
                .raster_bounds(
                    glyph,
                    size,
                    Transform2F::default(),
                    HintingOptions::None,
                    RasterizationOptions::GrayscaleAa,
                )
                .map_err(|e| ExportError::Render(format!("Glyph bounds for {:?}: {}", c, e)))?;

            if bounds.width() > 0 && bounds.height() > 0 {
                let mut canvas = Canvas::new(bounds.size(), Format::A8);
                self.font
                    .rasterize_glyph(
                        &mut canvas,
                        glyph,
                        size,
                        Transform2F::from_translation(-bounds.origin().to_f32()),
                        HintingOptions::None,
                        RasterizationOptions::GrayscaleAa,
                    )
                    .map_err(|e| ExportError::Render(format!("Glyph raster for {:?}: {}", c, e)))?;

                let origin = Vector2F::new(pen_x, baseline) + bounds.origin().to_f32();
                blend_coverage(image, &canvas, origin.x().round() as i64, origin.y().round() as i64, color);
            }

            pen_x += self.font.advance(glyph).map(|a| a.x() * scale).unwrap_or(0.0);
        }

        Ok(())
    }
}

/// Blend an A8 coverage mask onto the image at `(left, top)`, clipping to the image.
fn blend_coverage(image: &mut RgbImage, mask: &Canvas, left: i64, top: i64, color: Rgb<u8>) {
    let (width, height) = (mask.size.x() as i64, mask.size.y() as i64);

    for row in 0..height {
        let py = top + row;
        if py < 0 || py >= image.height() as i64 {
            continue;
        }
        for col in 0..width {
            let px = left + col;
            if px < 0 || px >= image.width() as i64 {
                continue;
            }
            let coverage = mask.pixels[row as usize * mask.stride + col as usize] as u32;
            if coverage == 0 {
                continue;
            }
            let pixel = image.get_pixel_mut(px as u32, py as u32);
            for channel in 0..3 {
                let under = pixel.0[channel] as u32;
                let over = color.0[channel] as u32;
                pixel.0[channel] = ((over * coverage + under * (255 - coverage)) / 255) as u8;
            }
        }
    }
}

/// Render one slide's layout onto a fresh canvas.
pub fn render_slide(painter: &TextPainter, layout: &SlideLayout, number: usize) -> Result<RgbImage> {
    let mut image = RgbImage::from_pixel(WIDTH, HEIGHT, WHITE);
    let (width, height) = (WIDTH as f32, HEIGHT as f32);
    let wrap_width = width - 2.0 * MARGIN;
    let limit = height - BOTTOM_RESERVE;
    let mut y = TOP;

    if let Some(title) = &layout.title {
        let x = ((width - painter.measure(title, TITLE_SIZE)) / 2.0).max(0.0);
        painter.draw(&mut image, title, x, y, TITLE_SIZE, BLACK)?;
        y += TITLE_STEP;
    }

    for bullet in &layout.bullets {
        if y > limit {
            break;
        }
        for line in wrap_words(bullet, wrap_width, |t| painter.measure(t, BULLET_SIZE)) {
            painter.draw(&mut image, &format!("• {}", line), MARGIN, y, BULLET_SIZE, BLACK)?;
            y += BULLET_STEP;
        }
    }

    for text in &layout.other {
        if y > limit {
            break;
        }
        for line in wrap_words(text, wrap_width, |t| painter.measure(t, TEXT_SIZE)) {
            painter.draw(&mut image, &line, MARGIN, y, TEXT_SIZE, GREY)?;
            y += TEXT_STEP;
        }
    }

    painter.draw(
        &mut image,
        &format!("Slide {}", number),
        width - 150.0,
        height - 40.0,
        TEXT_SIZE,
        GREY,
    )?;

    Ok(image)
}

fn render_error_slide(painter: &TextPainter, number: usize) -> Result<RgbImage> {
    let mut image = RgbImage::from_pixel(WIDTH, HEIGHT, WHITE);
    painter.draw(
        &mut image,
        &format!("Slide {} - Processing Error", number),
        50.0,
        300.0,
        TEXT_SIZE,
        RED,
    )?;
    Ok(image)
}

/// Renders slide text with a system font. Fails only when the document
/// cannot be read or no font is installed.
#[derive(Default)]
pub struct TextRenderExporter;

impl SlideExporter for TextRenderExporter {
    fn name(&self) -> &str {
        "text rendering"
    }

    fn export(&self, document: &Path, output_dir: &Path) -> Result<()> {
        let presentation = PptxParser::new().parse_path(document)?;
        let painter = TextPainter::system()?;
        log::info!(
            "Rendering {} slides from extracted text",
            presentation.slides.len()
        );

        for slide in &presentation.slides {
            let path = output_dir.join(format!("slide_{}.png", slide.number));
            let layout = SlideLayout::from_slide(slide);

            let rendered = render_slide(&painter, &layout, slide.number)
                .and_then(|image| image.save(&path).map_err(ExportError::from));

            if let Err(e) = rendered {
                log::warn!("Failed to render slide {}: {}", slide.number, e);
                match render_error_slide(&painter, slide.number) {
                    Ok(image) => {
                        if let Err(e) = image.save(&path) {
                            log::warn!("Could not write error slide {}: {}", slide.number, e);
                        }
                    }
                    Err(e) => log::warn!("Could not draw error slide {}: {}", slide.number, e),
                }
            }
        }

        Ok(())
    }
}
