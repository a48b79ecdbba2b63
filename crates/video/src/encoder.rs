//! Encoding segments into the final MP4 with ffmpeg.

use crate::error::{AssemblyError, Result};
use crate::segment::{SegmentAudio, VideoSegment, FPS};
use ffmpeg_sidecar::command::FfmpegCommand;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Stdio;

/// Turns an ordered list of segments into one video file.
pub trait VideoEncoder {
    fn encode(&self, segments: &[VideoSegment], output: &Path) -> Result<()>;
}

/// Encodes each segment to its own H.264/AAC file, then joins them with
/// the concat demuxer without re-encoding.
pub struct FfmpegEncoder {
    ffmpeg: PathBuf,
    work_dir: PathBuf,
}

impl FfmpegEncoder {
    /// Encoder that keeps per-segment files in `work_dir`.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            work_dir: work_dir.into(),
        }
    }

    /// Use a specific ffmpeg binary.
    pub fn with_ffmpeg(mut self, ffmpeg: impl Into<PathBuf>) -> Self {
        self.ffmpeg = ffmpeg.into();
        self
    }

    fn command(&self) -> FfmpegCommand {
        FfmpegCommand::new_with_path(&self.ffmpeg)
    }

    fn encode_segment(&self, segment: &VideoSegment, output: &Path) -> Result<()> {
        let mut command = self.command();
        command
            .args(["-y", "-loop", "1", "-framerate", &FPS.to_string()])
            .args(["-i", segment.image.to_string_lossy().as_ref()]);

        match &segment.audio {
            SegmentAudio::Narration { path, pause, .. } => {
                let delay_ms = (pause * 1000.0).round() as u64;
                command
                    .args(["-i", path.to_string_lossy().as_ref()])
                    // Delay the narration by the reading pause and pad the tail with silence.
                    .args(["-af", &format!("adelay={}:all=1,apad", delay_ms)]);
            }
            SegmentAudio::Silence { .. } => {
                command.args(["-f", "lavfi", "-i", "anullsrc=channel_layout=stereo:sample_rate=48000"]);
            }
        }

        command
            .args(["-map", "0:v", "-map", "1:a"])
            .args(["-c:v", "libx264", "-tune", "stillimage", "-pix_fmt", "yuv420p"])
            .args(["-r", &FPS.to_string()])
            .args(["-c:a", "aac", "-b:a", "192k", "-ar", "48000", "-ac", "2"])
            .args(["-t", &format!("{:.3}", segment.duration())])
            .arg(output.to_string_lossy().to_string());

        run(command, &format!("encoding {}", segment.label))
    }
}

/// Concat demuxer list line for a path, with single quotes escaped.
fn concat_entry(path: &Path) -> String {
    format!("file '{}'", path.to_string_lossy().replace('\'', "'\\''"))
}

fn run(mut command: FfmpegCommand, step: &str) -> Result<()> {
    let inner = command.as_inner_mut();
    inner.stdin(Stdio::null());
    inner.stdout(Stdio::null());
    inner.stderr(Stdio::piped());

    let mut child = inner.spawn().map_err(|e| AssemblyError::Encoding {
        step: step.to_string(),
        message: format!("could not start ffmpeg: {}", e),
    })?;

    let stderr_output = match child.stderr.take() {
        Some(mut stderr) => {
            let mut output = String::new();
            let _ = stderr.read_to_string(&mut output);
            output
        }
        None => String::new(),
    };

    let status = child.wait()?;
    if !status.success() {
        log::debug!("ffmpeg stderr:\n{}", stderr_output);
        let message = stderr_output
            .lines()
            .last()
            .map(str::to_string)
            .unwrap_or_else(|| format!("exit code {:?}", status.code()));
        return Err(AssemblyError::Encoding {
            step: step.to_string(),
            message,
        });
    }
    Ok(())
}

impl VideoEncoder for FfmpegEncoder {
    fn encode(&self, segments: &[VideoSegment], output: &Path) -> Result<()> {
        if segments.is_empty() {
            return Err(AssemblyError::NoSegments);
        }
        fs::create_dir_all(&self.work_dir)?;

        let mut parts = Vec::with_capacity(segments.len());
        for (i, segment) in segments.iter().enumerate() {
            let part = self.work_dir.join(format!("segment_{:03}.mp4", i + 1));
            log::info!(
                "Encoding {} ({:.2}s) {}/{}",
                segment.label,
                segment.duration(),
                i + 1,
                segments.len()
            );
            self.encode_segment(segment, &part)?;
            parts.push(fs::canonicalize(&part)?);
        }

        let list_path = self.work_dir.join("segments.txt");
        let list: Vec<String> = parts.iter().map(|p| concat_entry(p)).collect();
        fs::write(&list_path, list.join("\n") + "\n")?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        log::info!("Writing video file {}", output.display());
        let mut command = self.command();
        command
            .args(["-y", "-f", "concat", "-safe", "0"])
            .args(["-i", list_path.to_string_lossy().as_ref()])
            .args(["-c", "copy", "-movflags", "+faststart"])
            .arg(output.to_string_lossy().to_string());
        run(command, "concatenation")
    }
}
