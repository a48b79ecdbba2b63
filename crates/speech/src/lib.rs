//! Speech synthesis for slide narration.
//!
//! [`SpeechSynthesizer`] is the seam the assembler calls per slide;
//! [`AzureSpeechSynthesizer`] implements it against the Azure Speech REST API.

pub mod azure;
pub mod error;
pub mod synthesizer;
pub mod wav;

pub use azure::AzureSpeechSynthesizer;
pub use error::{CancellationReason, Result, SpeechError};
pub use synthesizer::{test_synthesis, SmokeTestReport, SpeechSynthesizer};
pub use wav::wav_duration_seconds;
