//! Narration map built from slide speaker notes.
//!
//! Each narrated slide is stored under its positional key (`slide_N`) and,
//! when the slide has a title, under the title as well. Lookups try the
//! title first and fall back to the positional key.

use crate::types::ExtractedSlide;
use std::collections::HashMap;

/// Positional lookup key for a 1-based slide number.
pub fn positional_key(number: usize) -> String {
    format!("slide_{}", number)
}

/// Which lookup strategy produced a narration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupSource {
    /// Matched on the slide title.
    Title,
    /// Matched on the `slide_N` key.
    Position,
}

/// A resolved narration for one slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narration<'a> {
    pub text: &'a str,
    pub source: LookupSource,
}

/// Mapping from lookup key (slide title or `slide_N`) to narration text.
///
/// Built once per run and not mutated afterwards. Entries are never empty.
#[derive(Debug, Clone, Default)]
pub struct NarrationMap {
    entries: HashMap<String, String>,
}

impl NarrationMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the map from extracted slides.
    ///
    /// Slides without notes contribute nothing. A later slide sharing a
    /// title with an earlier one replaces the earlier title entry.
    pub fn from_slides(slides: &[ExtractedSlide]) -> Self {
        let mut map = Self::new();

        for slide in slides {
            let Some(notes) = slide.notes.as_deref().map(str::trim).filter(|n| !n.is_empty())
            else {
                log::info!("Slide {}: No narration found", slide.number);
                continue;
            };

            match slide.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
                Some(title) => {
                    log::info!(
                        "Slide {} ('{}'): {} characters of narration",
                        slide.number,
                        title,
                        notes.chars().count()
                    );
                    map.insert(title, notes);
                }
                None => {
                    log::info!(
                        "Slide {} (no title): {} characters of narration",
                        slide.number,
                        notes.chars().count()
                    );
                }
            }
            map.insert(&positional_key(slide.number), notes);
        }

        map
    }

    /// Insert narration under a key. Blank text is ignored.
    pub fn insert(&mut self, key: &str, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.entries.insert(key.to_string(), text.to_string());
    }

    /// Direct lookup by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Resolve narration for a slide: title lookup first, then `slide_N`.
    pub fn resolve(&self, title: Option<&str>, number: usize) -> Option<Narration<'_>> {
        if let Some(title) = title.map(str::trim).filter(|t| !t.is_empty()) {
            if let Some(text) = self.get(title) {
                return Some(Narration {
                    text,
                    source: LookupSource::Title,
                });
            }
        }

        self.get(&positional_key(number)).map(|text| Narration {
            text,
            source: LookupSource::Position,
        })
    }

    /// Number of entries (title and positional keys counted separately).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no narration at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
