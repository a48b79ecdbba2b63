//! PPTX (Office Open XML) reader.
//!
//! Parses .pptx files, which are ZIP archives containing XML documents, into
//! slides with titles, text blocks, and speaker notes.

pub mod parser;

pub use parser::PptxParser;
