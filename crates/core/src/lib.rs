//! Core domain types, settings, and narration lookup for turning a slide
//! deck into a narrated video.

pub mod error;
pub mod naming;
pub mod narration;
pub mod settings;
pub mod types;

pub use error::{Error, Result};
pub use narration::{LookupSource, Narration, NarrationMap};
pub use settings::{Settings, Workspace};
pub use types::{
    ExtractedSlide, PlaceholderRole, Presentation, PresentationFormat, SlideImage, SlideText,
};
