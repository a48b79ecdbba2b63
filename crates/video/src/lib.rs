//! Video assembly.
//!
//! Normalizes slide images onto a 1280x720 frame, times each slide as a
//! reading pause plus its narration (or a fixed silent hold), and encodes
//! the segments into one MP4 at 24 fps.

pub mod assembler;
pub mod canvas;
pub mod encoder;
pub mod error;
pub mod segment;

pub use assembler::{
    slide_inputs, Assembler, AssemblyConfig, AssemblyReport, EndSlide, SegmentOutcome,
    SegmentReport, SlideInput,
};
pub use encoder::{FfmpegEncoder, VideoEncoder};
pub use error::{AssemblyError, Result};
pub use segment::{
    SegmentAudio, VideoSegment, FPS, FRAME_HEIGHT, FRAME_WIDTH, SILENT_SLIDE_SECONDS,
    SYNTHESIS_FALLBACK_SECONDS,
};
