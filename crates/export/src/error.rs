//! Error types for slide export.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Errors from a single export mechanism or from the export chain as a whole.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Could not start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} timed out after {}s", timeout.as_secs())]
    Timeout { program: String, timeout: Duration },

    #[error("{program} failed: {message}")]
    CommandFailed { program: String, message: String },

    #[error("{0} is not available on this platform")]
    Unavailable(String),

    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Document(#[from] slidecast_core::Error),

    #[error("All slide export methods failed")]
    AllFailed {
        /// Manual export steps to show the user.
        instructions: String,
    },
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
