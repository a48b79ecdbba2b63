//! Segment timing.

use std::path::PathBuf;

pub const FRAME_WIDTH: u32 = 1280;
pub const FRAME_HEIGHT: u32 = 720;
pub const FPS: u32 = 24;

/// Length of a slide that has no narration.
pub const SILENT_SLIDE_SECONDS: f64 = 3.0;

/// Length of a slide whose narration could not be synthesized.
pub const SYNTHESIS_FALLBACK_SECONDS: f64 = 5.0;

/// Sound track of one segment.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentAudio {
    /// `pause` seconds of silence, then the narration clip.
    Narration {
        path: PathBuf,
        pause: f64,
        duration: f64,
    },
    /// Silence only.
    Silence { duration: f64 },
}

/// One still image held on screen for the length of its audio.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSegment {
    /// `slide N` or `end slide`.
    pub label: String,
    /// Canvas-normalized frame.
    pub image: PathBuf,
    pub audio: SegmentAudio,
}

impl VideoSegment {
    pub fn narrated(label: impl Into<String>, image: PathBuf, audio: PathBuf, pause: f64, duration: f64) -> Self {
        Self {
            label: label.into(),
            image,
            audio: SegmentAudio::Narration {
                path: audio,
                pause,
                duration,
            },
        }
    }

    pub fn silent(label: impl Into<String>, image: PathBuf, duration: f64) -> Self {
        Self {
            label: label.into(),
            image,
            audio: SegmentAudio::Silence { duration },
        }
    }

    /// Total on-screen time in seconds.
    pub fn duration(&self) -> f64 {
        match &self.audio {
            SegmentAudio::Narration { pause, duration, .. } => pause + duration,
            SegmentAudio::Silence { duration } => *duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_durations_are_distinct() {
        assert!(SILENT_SLIDE_SECONDS < SYNTHESIS_FALLBACK_SECONDS);
    }

    #[test]
    fn test_narrated_duration_includes_pause() {
        let segment = VideoSegment::narrated("slide 1", "a.png".into(), "a.wav".into(), 1.5, 4.25);
        assert!((segment.duration() - 5.75).abs() < 1e-9);

        let silent = VideoSegment::silent("slide 2", "b.png".into(), SILENT_SLIDE_SECONDS);
        assert_eq!(silent.duration(), 3.0);
    }
}
