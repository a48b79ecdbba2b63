//! Domain types for representing a parsed slide deck and its exported images.

use std::path::PathBuf;

/// Represents an entire presentation with its extracted content.
#[derive(Debug, Clone)]
pub struct Presentation {
    /// Original filename (without path).
    pub filename: String,

    /// Slides in presentation order.
    pub slides: Vec<ExtractedSlide>,
}

impl Presentation {
    /// Create an empty presentation for the given filename.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            slides: Vec::new(),
        }
    }

    /// Add a slide to the presentation.
    pub fn add_slide(&mut self, slide: ExtractedSlide) {
        self.slides.push(slide);
    }

    /// Look up a slide by its 1-based number.
    pub fn slide(&self, number: usize) -> Option<&ExtractedSlide> {
        self.slides.iter().find(|s| s.number == number)
    }

    /// Number of slides carrying non-empty notes.
    pub fn narrated_slide_count(&self) -> usize {
        self.slides.iter().filter(|s| s.notes.is_some()).count()
    }
}

/// The format of the source presentation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationFormat {
    /// Modern PPTX (Office Open XML).
    Pptx,
    /// Legacy PPT (OLE/CFB binary). Detected so it can be rejected clearly.
    Ppt,
}

impl PresentationFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pptx" => Some(Self::Pptx),
            "ppt" => Some(Self::Ppt),
            _ => None,
        }
    }

    /// Detect format from file magic bytes.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }

        // PPTX is a ZIP file (PK\x03\x04)
        if bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
            return Some(Self::Pptx);
        }

        // PPT is an OLE/CFB file (D0 CF 11 E0 A1 B1 1A E1)
        if bytes.len() >= 8
            && bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])
        {
            return Some(Self::Ppt);
        }

        None
    }
}

/// A single extracted slide.
#[derive(Debug, Clone, Default)]
pub struct ExtractedSlide {
    /// 1-based slide number.
    pub number: usize,

    /// Slide title, from the title placeholder or the first short text block.
    pub title: Option<String>,

    /// Text blocks extracted from this slide, in reading order.
    pub lines: Vec<SlideText>,

    /// Speaker notes for this slide, trimmed. `None` when absent or blank.
    pub notes: Option<String>,
}

impl ExtractedSlide {
    /// Create a new slide with the given number.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }

    /// Add a text block with position and placeholder information.
    pub fn add_shape_text(&mut self, text: SlideText) {
        self.lines.push(text);
    }

    /// Set the speaker notes, storing `None` for blank text.
    pub fn set_notes(&mut self, notes: &str) {
        let trimmed = notes.trim();
        self.notes = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    /// Sort text blocks by position (top-to-bottom, then left-to-right).
    pub fn sort_by_position(&mut self) {
        self.lines.sort_by(|a, b| {
            let y_cmp = a
                .y_position
                .partial_cmp(&b.y_position)
                .unwrap_or(std::cmp::Ordering::Equal);
            if y_cmp == std::cmp::Ordering::Equal {
                a.x_position
                    .partial_cmp(&b.x_position)
                    .unwrap_or(std::cmp::Ordering::Equal)
            } else {
                y_cmp
            }
        });
    }

    /// Get non-empty text blocks.
    pub fn non_empty_lines(&self) -> Vec<&str> {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .filter(|s| !s.trim().is_empty())
            .collect()
    }
}

/// Role of the placeholder a text block was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderRole {
    /// `title` or `ctrTitle` placeholder.
    Title,
    /// Body / content placeholder (including untyped `p:ph` elements).
    Body,
    /// Any other placeholder (date, footer, slide number, ...).
    Other,
}

impl PlaceholderRole {
    /// Map an OOXML `p:ph/@type` value to a role. A missing type means "obj".
    pub fn from_ph_type(ph_type: Option<&str>) -> Self {
        match ph_type {
            Some("title") | Some("ctrTitle") => Self::Title,
            None | Some("body") | Some("obj") | Some("subTitle") => Self::Body,
            Some(_) => Self::Other,
        }
    }
}

/// Text content from a shape or text frame.
#[derive(Debug, Clone)]
pub struct SlideText {
    /// The actual text content.
    pub text: String,

    /// Y position for ordering (top-to-bottom). None if unknown.
    pub y_position: Option<f64>,

    /// X position for ordering (left-to-right). None if unknown.
    pub x_position: Option<f64>,

    /// Placeholder role, if the shape is a placeholder.
    pub placeholder: Option<PlaceholderRole>,
}

impl SlideText {
    /// Create new slide text without position info.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            y_position: None,
            x_position: None,
            placeholder: None,
        }
    }

    /// Create new slide text with position info.
    pub fn with_position(text: impl Into<String>, y: f64, x: f64) -> Self {
        Self {
            text: text.into(),
            y_position: Some(y),
            x_position: Some(x),
            placeholder: None,
        }
    }

    /// Attach a placeholder role.
    pub fn with_placeholder(mut self, role: Option<PlaceholderRole>) -> Self {
        self.placeholder = role;
        self
    }
}

/// An exported slide image on disk, ordered by its 1-based index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideImage {
    /// 1-based position in the ordered image set.
    pub index: usize,
    /// Path to the PNG file.
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_magic() {
        assert_eq!(
            PresentationFormat::from_magic(b"PK\x03\x04rest"),
            Some(PresentationFormat::Pptx)
        );
        assert_eq!(
            PresentationFormat::from_magic(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]),
            Some(PresentationFormat::Ppt)
        );
        assert_eq!(PresentationFormat::from_magic(b"abc"), None);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            PresentationFormat::from_extension("PPTX"),
            Some(PresentationFormat::Pptx)
        );
        assert_eq!(PresentationFormat::from_extension("key"), None);
    }

    #[test]
    fn test_set_notes_trims_and_blanks() {
        let mut slide = ExtractedSlide::new(1);
        slide.set_notes("  Hello there \n");
        assert_eq!(slide.notes.as_deref(), Some("Hello there"));

        slide.set_notes(" \n\t ");
        assert_eq!(slide.notes, None);
    }

    #[test]
    fn test_sort_by_position() {
        let mut slide = ExtractedSlide::new(1);
        slide.add_shape_text(SlideText::with_position("bottom", 500.0, 0.0));
        slide.add_shape_text(SlideText::with_position("top right", 10.0, 300.0));
        slide.add_shape_text(SlideText::with_position("top left", 10.0, 5.0));
        slide.sort_by_position();

        assert_eq!(slide.non_empty_lines(), vec!["top left", "top right", "bottom"]);
    }

    #[test]
    fn test_placeholder_role_mapping() {
        assert_eq!(PlaceholderRole::from_ph_type(Some("title")), PlaceholderRole::Title);
        assert_eq!(PlaceholderRole::from_ph_type(Some("ctrTitle")), PlaceholderRole::Title);
        assert_eq!(PlaceholderRole::from_ph_type(None), PlaceholderRole::Body);
        assert_eq!(PlaceholderRole::from_ph_type(Some("sldNum")), PlaceholderRole::Other);
    }
}
