//! Slide image export.
//!
//! Tries presentation tools in a fixed order (Keynote, PowerPoint,
//! LibreOffice + ImageMagick, then plain text rendering) until one leaves
//! slide PNGs behind, and discovers the resulting images in slide order.

pub mod chain;
pub mod error;
pub mod mechanisms;
pub mod process;
pub mod render;

pub use chain::{find_exported_slides, manual_export_instructions, ExportChain, ExportOutcome};
pub use error::{ExportError, Result};
pub use mechanisms::{KeynoteExporter, LibreOfficeExporter, PowerPointExporter, SlideExporter};
pub use render::TextRenderExporter;
