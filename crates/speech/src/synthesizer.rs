//! The synthesis seam and the credential smoke test.

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Sentence spoken by the smoke test.
pub const TEST_SENTENCE: &str =
    "Hello, this is a test of the Azure Speech Services text to speech functionality.";

/// File name of the smoke test output.
pub const TEST_AUDIO_FILE: &str = "test_azure_speech.wav";

/// Turns narration text into a speech audio file.
pub trait SpeechSynthesizer {
    /// Synthesize `text` into a WAV file at `output`, creating parent directories.
    fn synthesize(&self, text: &str, output: &Path) -> Result<()>;
}

impl<T: SpeechSynthesizer + ?Sized> SpeechSynthesizer for &T {
    fn synthesize(&self, text: &str, output: &Path) -> Result<()> {
        (**self).synthesize(text, output)
    }
}

impl<T: SpeechSynthesizer + ?Sized> SpeechSynthesizer for Box<T> {
    fn synthesize(&self, text: &str, output: &Path) -> Result<()> {
        (**self).synthesize(text, output)
    }
}

/// Output of a successful smoke test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmokeTestReport {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Synthesize a fixed sentence into `dir` to prove the credentials work.
pub fn test_synthesis(synthesizer: &dyn SpeechSynthesizer, dir: &Path) -> Result<SmokeTestReport> {
    fs::create_dir_all(dir)?;
    let path = dir.join(TEST_AUDIO_FILE);

    synthesizer.synthesize(TEST_SENTENCE, &path)?;
    let bytes = fs::metadata(&path)?.len();
    log::info!("Test successful! Audio file created: {} ({} bytes)", path.display(), bytes);

    Ok(SmokeTestReport { path, bytes })
}
