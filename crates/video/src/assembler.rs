//! Slide-by-slide assembly of the narrated video.
//!
//! Each slide image is normalized onto the frame, its narration is resolved
//! (title first, then position) and synthesized, and a segment is planned:
//! a reading pause followed by the narration, or a fixed silent hold when
//! there is nothing to say or synthesis failed. The planned segments are
//! handed to a [`VideoEncoder`] in slide order.

use crate::canvas::fit_to_canvas;
use crate::encoder::VideoEncoder;
use crate::error::{AssemblyError, Result};
use crate::segment::{VideoSegment, SILENT_SLIDE_SECONDS, SYNTHESIS_FALLBACK_SECONDS};
use slidecast_core::{LookupSource, NarrationMap, SlideImage, Workspace};
use slidecast_speech::{wav_duration_seconds, SpeechSynthesizer};
use std::fs;
use std::path::PathBuf;

/// Static closing segment.
#[derive(Debug, Clone, PartialEq)]
pub struct EndSlide {
    pub image: PathBuf,
    pub narration: String,
}

/// Timing and output settings for one assembly run.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyConfig {
    /// Silent reading time before narration, in seconds.
    pub pause_seconds: f64,
    /// Closing segment, when enabled.
    pub end_slide: Option<EndSlide>,
    /// Final video path.
    pub output: PathBuf,
}

/// A slide to assemble: its exported image and, when known, its title.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideInput {
    pub image: SlideImage,
    pub title: Option<String>,
}

/// How a segment's sound track was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentOutcome {
    /// Narration found and synthesized.
    Narrated(LookupSource),
    /// Closing segment with its fixed narration synthesized.
    EndSlide,
    /// No narration for this slide.
    NoNarration,
    /// Narration found but synthesis or duration measurement failed.
    SynthesisFailed,
}

/// One line of the assembly report.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentReport {
    pub label: String,
    pub outcome: SegmentOutcome,
    pub duration: f64,
}

/// What was assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyReport {
    pub output: PathBuf,
    pub segments: Vec<SegmentReport>,
    /// Slide images that could not be read and were left out.
    pub skipped: Vec<PathBuf>,
}

impl AssemblyReport {
    /// Sum of segment durations in seconds.
    pub fn total_seconds(&self) -> f64 {
        self.segments.iter().map(|s| s.duration).sum()
    }

    pub fn narrated_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s.outcome, SegmentOutcome::Narrated(_) | SegmentOutcome::EndSlide))
            .count()
    }
}

/// Drives narration synthesis and encoding for a run.
pub struct Assembler<'a> {
    synthesizer: &'a dyn SpeechSynthesizer,
    encoder: &'a dyn VideoEncoder,
    workspace: Workspace,
}

impl<'a> Assembler<'a> {
    pub fn new(
        synthesizer: &'a dyn SpeechSynthesizer,
        encoder: &'a dyn VideoEncoder,
        workspace: Workspace,
    ) -> Self {
        Self {
            synthesizer,
            encoder,
            workspace,
        }
    }

    /// Synthesize `text` to `audio` and plan the segment, degrading to a
    /// fixed silent hold if anything goes wrong.
    fn narrated_segment(
        &self,
        label: &str,
        frame: PathBuf,
        text: &str,
        audio: PathBuf,
        pause: f64,
    ) -> (VideoSegment, bool) {
        let measured = self
            .synthesizer
            .synthesize(text, &audio)
            .and_then(|()| wav_duration_seconds(&audio));

        match measured {
            Ok(duration) => {
                log::info!("{}: {:.2}s pause + {:.2}s narration", label, pause, duration);
                (VideoSegment::narrated(label, frame, audio, pause, duration), true)
            }
            Err(e) => {
                log::warn!(
                    "{}: audio generation failed ({}), using {}s silent segment",
                    label,
                    e,
                    SYNTHESIS_FALLBACK_SECONDS
                );
                (VideoSegment::silent(label, frame, SYNTHESIS_FALLBACK_SECONDS), false)
            }
        }
    }

    /// Build and encode the video for `slides`, in the order given.
    pub fn assemble(
        &self,
        slides: &[SlideInput],
        narrations: &NarrationMap,
        config: &AssemblyConfig,
    ) -> Result<AssemblyReport> {
        let frames_dir = self.workspace.slide_images();
        let audio_dir = self.workspace.audio_clips();
        fs::create_dir_all(&frames_dir)?;
        fs::create_dir_all(&audio_dir)?;

        let mut segments = Vec::new();
        let mut reports = Vec::new();
        let mut skipped = Vec::new();

        for slide in slides {
            let number = slide.image.index;
            let label = format!("slide {}", number);
            log::info!("Processing {}/{}: {}", number, slides.len(), slide.image.path.display());

            let frame = frames_dir.join(format!("processed_slide_{}.png", number));
            if let Err(e) = fit_to_canvas(&slide.image.path, &frame) {
                log::warn!("Skipping {}: could not read {}: {}", label, slide.image.path.display(), e);
                skipped.push(slide.image.path.clone());
                continue;
            }

            let (segment, outcome) = match narrations.resolve(slide.title.as_deref(), number) {
                Some(narration) => {
                    let audio = audio_dir.join(format!("audio_{}.wav", number));
                    let (segment, ok) =
                        self.narrated_segment(&label, frame, narration.text, audio, config.pause_seconds);
                    let outcome = if ok {
                        SegmentOutcome::Narrated(narration.source)
                    } else {
                        SegmentOutcome::SynthesisFailed
                    };
                    (segment, outcome)
                }
                None => {
                    log::info!("{}: no narration, {}s silent segment", label, SILENT_SLIDE_SECONDS);
                    (
                        VideoSegment::silent(&label, frame, SILENT_SLIDE_SECONDS),
                        SegmentOutcome::NoNarration,
                    )
                }
            };

            reports.push(SegmentReport {
                label,
                outcome,
                duration: segment.duration(),
            });
            segments.push(segment);
        }

        // The closing segment alone is not a video.
        if segments.is_empty() {
            return Err(AssemblyError::NoSegments);
        }

        if let Some(end) = &config.end_slide {
            if let Some((segment, report)) = self.end_segment(end, config.pause_seconds) {
                reports.push(report);
                segments.push(segment);
            }
        }

        self.encoder.encode(&segments, &config.output)?;

        Ok(AssemblyReport {
            output: config.output.clone(),
            segments: reports,
            skipped,
        })
    }

    fn end_segment(&self, end: &EndSlide, pause: f64) -> Option<(VideoSegment, SegmentReport)> {
        let label = "end slide";
        if !end.image.is_file() {
            log::warn!("End slide image not found at {}, skipping end slide", end.image.display());
            return None;
        }

        let frame = self.workspace.slide_images().join("processed_end_slide.png");
        if let Err(e) = fit_to_canvas(&end.image, &frame) {
            log::warn!("Could not read end slide image {}: {}, skipping end slide", end.image.display(), e);
            return None;
        }

        let audio = self.workspace.audio_clips().join("audio_end_slide.wav");
        let (segment, ok) = self.narrated_segment(label, frame, &end.narration, audio, pause);
        let outcome = if ok {
            SegmentOutcome::EndSlide
        } else {
            SegmentOutcome::SynthesisFailed
        };
        let report = SegmentReport {
            label: label.to_string(),
            outcome,
            duration: segment.duration(),
        };
        Some((segment, report))
    }
}

/// Pair exported images with slide titles by position.
pub fn slide_inputs(images: &[SlideImage], titles: impl Fn(usize) -> Option<String>) -> Vec<SlideInput> {
    images
        .iter()
        .map(|image| SlideInput {
            image: image.clone(),
            title: titles(image.index),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidecast_speech::{CancellationReason, SpeechError};
    use std::cell::RefCell;
    use std::path::Path;

    const CLIP_SECONDS: f64 = 2.0;

    /// Writes a silent WAV of fixed length; fails for texts containing "FAIL".
    struct FixedLengthSynth {
        calls: RefCell<Vec<String>>,
    }

    impl FixedLengthSynth {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl SpeechSynthesizer for FixedLengthSynth {
        fn synthesize(&self, text: &str, output: &Path) -> slidecast_speech::Result<()> {
            self.calls.borrow_mut().push(text.to_string());
            if text.contains("FAIL") {
                return Err(SpeechError::canceled(CancellationReason::TooManyRequests, "quota"));
            }
            let spec = hound::WavSpec {
                channels: 1,
                sample_rate: 8_000,
                bits_per_sample: 16,
                sample_format: hound::SampleFormat::Int,
            };
            let mut writer = hound::WavWriter::create(output, spec)?;
            for _ in 0..(CLIP_SECONDS * 8_000.0) as usize {
                writer.write_sample(0i16)?;
            }
            writer.finalize()?;
            Ok(())
        }
    }

    /// Records segments instead of encoding.
    #[derive(Default)]
    struct RecordingEncoder {
        segments: RefCell<Vec<VideoSegment>>,
    }

    impl VideoEncoder for RecordingEncoder {
        fn encode(&self, segments: &[VideoSegment], output: &Path) -> Result<()> {
            *self.segments.borrow_mut() = segments.to_vec();
            fs::write(output, b"mp4")?;
            Ok(())
        }
    }

    fn write_png(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        image::RgbImage::from_pixel(320, 180, image::Rgb([30, 30, 30]))
            .save(path)
            .unwrap();
    }

    fn images(root: &Path, count: usize) -> Vec<SlideImage> {
        (1..=count)
            .map(|index| {
                let path = root.join("exported_slides").join(format!("slide_{}.png", index));
                write_png(&path);
                SlideImage { index, path }
            })
            .collect()
    }

    fn config(root: &Path, end_slide: Option<EndSlide>) -> AssemblyConfig {
        AssemblyConfig {
            pause_seconds: 1.5,
            end_slide,
            output: root.join("out.mp4"),
        }
    }

    #[test]
    fn test_round_trip_segment_count_and_total_duration() {
        let root = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(root.path());
        let slides: Vec<SlideInput> = images(root.path(), 4)
            .into_iter()
            .zip([Some("Intro"), None, Some("Wrap up"), None])
            .map(|(image, title)| SlideInput {
                image,
                title: title.map(String::from),
            })
            .collect();

        let mut narrations = NarrationMap::new();
        narrations.insert("Intro", "Welcome.");
        narrations.insert("slide_1", "Welcome.");
        narrations.insert("slide_3", "Thanks for watching.");

        let end_image = root.path().join("media").join("end-slide.png");
        write_png(&end_image);
        let end = EndSlide {
            image: end_image,
            narration: "Generated automatically.".to_string(),
        };

        let synth = FixedLengthSynth::new();
        let encoder = RecordingEncoder::default();
        let report = Assembler::new(&synth, &encoder, workspace.clone())
            .assemble(&slides, &narrations, &config(root.path(), Some(end)))
            .unwrap();

        // Four slides, two narrated, plus the end slide.
        let recorded = encoder.segments.borrow();
        assert_eq!(recorded.len(), 5);
        let expected = 3.0 * (1.5 + CLIP_SECONDS) + 2.0 * SILENT_SLIDE_SECONDS;
        let total: f64 = recorded.iter().map(VideoSegment::duration).sum();
        assert!((total - expected).abs() < 1e-6);
        assert!((report.total_seconds() - expected).abs() < 1e-6);

        assert_eq!(report.segments[0].outcome, SegmentOutcome::Narrated(LookupSource::Title));
        assert_eq!(report.segments[1].outcome, SegmentOutcome::NoNarration);
        assert_eq!(report.segments[2].outcome, SegmentOutcome::Narrated(LookupSource::Position));
        assert_eq!(report.segments[4].label, "end slide");
        assert_eq!(report.segments[4].outcome, SegmentOutcome::EndSlide);
        assert_eq!(report.narrated_count(), 3);

        assert!(workspace.audio_clips().join("audio_1.wav").is_file());
        assert!(workspace.audio_clips().join("audio_3.wav").is_file());
        assert!(workspace.audio_clips().join("audio_end_slide.wav").is_file());
        assert!(workspace.slide_images().join("processed_slide_4.png").is_file());
        assert!(report.output.is_file());
    }

    #[test]
    fn test_silent_slides_never_call_synthesizer() {
        let root = tempfile::tempdir().unwrap();
        let slides = slide_inputs(&images(root.path(), 2), |_| None);

        let synth = FixedLengthSynth::new();
        let encoder = RecordingEncoder::default();
        let report = Assembler::new(&synth, &encoder, Workspace::new(root.path()))
            .assemble(&slides, &NarrationMap::new(), &config(root.path(), None))
            .unwrap();

        assert!(synth.calls.borrow().is_empty());
        for segment in &report.segments {
            assert_eq!(segment.duration, SILENT_SLIDE_SECONDS);
        }
    }

    #[test]
    fn test_synthesis_failure_falls_back_to_longer_silence() {
        let root = tempfile::tempdir().unwrap();
        let slides = slide_inputs(&images(root.path(), 2), |_| None);
        let mut narrations = NarrationMap::new();
        narrations.insert("slide_1", "This will FAIL");
        narrations.insert("slide_2", "This works");

        let synth = FixedLengthSynth::new();
        let encoder = RecordingEncoder::default();
        let report = Assembler::new(&synth, &encoder, Workspace::new(root.path()))
            .assemble(&slides, &narrations, &config(root.path(), None))
            .unwrap();

        assert_eq!(report.segments[0].outcome, SegmentOutcome::SynthesisFailed);
        assert_eq!(report.segments[0].duration, SYNTHESIS_FALLBACK_SECONDS);
        assert!((report.segments[1].duration - (1.5 + CLIP_SECONDS)).abs() < 1e-6);
    }

    #[test]
    fn test_missing_end_slide_image_is_skipped() {
        let root = tempfile::tempdir().unwrap();
        let slides = slide_inputs(&images(root.path(), 1), |_| None);
        let end = EndSlide {
            image: root.path().join("media").join("missing.png"),
            narration: "bye".to_string(),
        };

        let synth = FixedLengthSynth::new();
        let encoder = RecordingEncoder::default();
        let report = Assembler::new(&synth, &encoder, Workspace::new(root.path()))
            .assemble(&slides, &NarrationMap::new(), &config(root.path(), Some(end)))
            .unwrap();

        assert_eq!(report.segments.len(), 1);
        assert!(synth.calls.borrow().is_empty());
    }

    #[test]
    fn test_unreadable_images_are_skipped_and_empty_run_fails() {
        let root = tempfile::tempdir().unwrap();
        let bad = root.path().join("exported_slides").join("slide_1.png");
        fs::create_dir_all(bad.parent().unwrap()).unwrap();
        fs::write(&bad, b"corrupt").unwrap();
        let slides = slide_inputs(&[SlideImage { index: 1, path: bad.clone() }], |_| None);

        let synth = FixedLengthSynth::new();
        let encoder = RecordingEncoder::default();
        let err = Assembler::new(&synth, &encoder, Workspace::new(root.path()))
            .assemble(&slides, &NarrationMap::new(), &config(root.path(), None))
            .unwrap_err();

        assert!(matches!(err, AssemblyError::NoSegments));
        assert!(encoder.segments.borrow().is_empty());
    }

    #[test]
    fn test_end_slide_alone_does_not_make_a_video() {
        let root = tempfile::tempdir().unwrap();
        let bad = root.path().join("exported_slides").join("slide_1.png");
        fs::create_dir_all(bad.parent().unwrap()).unwrap();
        fs::write(&bad, b"corrupt").unwrap();
        let slides = slide_inputs(&[SlideImage { index: 1, path: bad }], |_| None);

        let end_image = root.path().join("media").join("end-slide.png");
        write_png(&end_image);
        let end = EndSlide {
            image: end_image,
            narration: "Generated automatically.".to_string(),
        };

        let synth = FixedLengthSynth::new();
        let encoder = RecordingEncoder::default();
        let err = Assembler::new(&synth, &encoder, Workspace::new(root.path()))
            .assemble(&slides, &NarrationMap::new(), &config(root.path(), Some(end)))
            .unwrap_err();

        assert!(matches!(err, AssemblyError::NoSegments));
        assert!(synth.calls.borrow().is_empty());
        assert!(encoder.segments.borrow().is_empty());
    }
}
