//! WAV header inspection.

use crate::error::Result;
use std::path::Path;

/// Playback length of a WAV file in seconds, read from its header.
pub fn wav_duration_seconds(path: &Path) -> Result<f64> {
    let reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    if spec.sample_rate == 0 || spec.channels == 0 {
        return Ok(0.0);
    }
    // `len` counts samples across all channels.
    let frames = reader.len() as f64 / spec.channels as f64;
    Ok(frames / spec.sample_rate as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpeechError;

    fn write_silence(path: &Path, seconds: f64, sample_rate: u32, channels: u16) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        let samples = (seconds * sample_rate as f64) as usize * channels as usize;
        for _ in 0..samples {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_mono_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.wav");
        write_silence(&path, 2.5, 24_000, 1);

        assert!((wav_duration_seconds(&path).unwrap() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_stereo_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        write_silence(&path, 1.0, 48_000, 2);

        assert!((wav_duration_seconds(&path).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_not_a_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.wav");
        std::fs::write(&path, b"definitely not audio").unwrap();

        assert!(matches!(
            wav_duration_seconds(&path),
            Err(SpeechError::InvalidAudio(_))
        ));
    }
}
