//! Error types for video assembly.

use std::io;
use thiserror::Error;

/// Errors that stop assembly of the final video.
#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("ffmpeg {step} failed: {message}")]
    Encoding { step: String, message: String },

    #[error("No video segments were produced")]
    NoSegments,
}

/// Result type alias for assembly operations.
pub type Result<T> = std::result::Result<T, AssemblyError>;
