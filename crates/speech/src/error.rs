//! Error types for speech synthesis.

use std::fmt;
use std::io;
use thiserror::Error;

/// Why the speech service did not return audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancellationReason {
    /// The service rejected or failed the request.
    Error,
    /// The subscription key or region was rejected.
    AuthenticationFailure,
    /// The subscription is being throttled.
    TooManyRequests,
    /// The service could not be reached.
    ConnectionFailure,
}

impl fmt::Display for CancellationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Error => "Error",
            Self::AuthenticationFailure => "AuthenticationFailure",
            Self::TooManyRequests => "TooManyRequests",
            Self::ConnectionFailure => "ConnectionFailure",
        };
        f.write_str(name)
    }
}

/// Errors from speech synthesis.
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("SPEECH_KEY is not set; add it to the .env file")]
    MissingCredential,

    #[error("Speech synthesis canceled: {reason}{}", details.as_deref().map(|d| format!(" ({})", d)).unwrap_or_default())]
    Canceled {
        reason: CancellationReason,
        details: Option<String>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Invalid WAV audio: {0}")]
    InvalidAudio(#[from] hound::Error),
}

impl SpeechError {
    pub fn canceled(reason: CancellationReason, details: impl Into<String>) -> Self {
        let details = details.into();
        Self::Canceled {
            reason,
            details: if details.trim().is_empty() {
                None
            } else {
                Some(details)
            },
        }
    }
}

/// Result type alias for speech operations.
pub type Result<T> = std::result::Result<T, SpeechError>;
