//! Error types shared by the document and settings layers.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading the source document or settings.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read a file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The file format is not supported or could not be detected.
    #[error("Unsupported or unrecognized file format: {0}")]
    UnsupportedFormat(String),

    /// Failed to parse the PPTX file structure.
    #[error("PPTX parsing error: {0}")]
    PptxParseError(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error (for PPTX).
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// The credential file could not be parsed.
    #[error("Invalid credential file {path}: {message}")]
    EnvFile { path: PathBuf, message: String },

    /// A setting had a value that could not be interpreted.
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidSetting {
        key: &'static str,
        value: String,
        reason: String,
    },
}
