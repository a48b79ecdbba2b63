//! Run settings loaded from the credential file and the process environment.

use crate::error::{Error, Result};
use crate::naming::output_video_name;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default credential file name, looked up in the working directory.
pub const DEFAULT_ENV_FILE: &str = ".env";

pub const DEFAULT_VOICE: &str = "en-US-AvaMultilingualNeural";
pub const DEFAULT_REGION: &str = "eastus2";
pub const DEFAULT_DOCUMENT: &str = "content_maintenance_process.pptx";
pub const DEFAULT_PAUSE_SECONDS: f64 = 1.5;
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_WITH_AZURE_AUDIO";
pub const DEFAULT_END_SLIDE_IMAGE: &str = "media/end-slide.png";
pub const DEFAULT_END_SLIDE_NARRATION: &str = "This video was generated from a PowerPoint presentation using Azure AI. For more information and source code, visit github.com/sdgilley/generate_movie";

/// Every key read from the credential file or environment.
pub const KNOWN_KEYS: &[&str] = &[
    "SPEECH_KEY",
    "SPEECH_REGION",
    "ENDPOINT",
    "VOICE_NAME",
    "POWERPOINT_FILE",
    "PAUSE_DURATION",
    "INCLUDE_END_SLIDE",
    "OUTPUT_SUFFIX",
    "END_SLIDE_IMAGE",
    "END_SLIDE_NARRATION",
];

/// Immutable configuration for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Speech service subscription key. Absent when not configured.
    pub speech_key: Option<String>,
    /// Speech service region (e.g. `eastus2`).
    pub speech_region: String,
    /// Voice used for synthesis.
    pub voice_name: String,
    /// Source presentation document.
    pub document: PathBuf,
    /// Silent reading time before narration starts, in seconds.
    pub pause_seconds: f64,
    /// Whether to append the closing segment.
    pub include_end_slide: bool,
    /// Suffix added to the document stem to name the output video.
    pub output_suffix: String,
    /// Static image for the closing segment.
    pub end_slide_image: PathBuf,
    /// Static narration for the closing segment.
    pub end_slide_narration: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speech_key: None,
            speech_region: DEFAULT_REGION.to_string(),
            voice_name: DEFAULT_VOICE.to_string(),
            document: PathBuf::from(DEFAULT_DOCUMENT),
            pause_seconds: DEFAULT_PAUSE_SECONDS,
            include_end_slide: true,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            end_slide_image: PathBuf::from(DEFAULT_END_SLIDE_IMAGE),
            end_slide_narration: DEFAULT_END_SLIDE_NARRATION.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a credential file, with process environment
    /// variables taking precedence over values in the file.
    pub fn load(env_file: &Path) -> Result<Self> {
        let mut vars = read_env_file(env_file)?;
        for key in KNOWN_KEYS {
            if let Ok(value) = std::env::var(key) {
                vars.insert((*key).to_string(), value);
            }
        }
        Self::from_vars(&vars)
    }

    /// Build settings from a key/value map. Missing keys take defaults.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let defaults = Self::default();

        let speech_region = get("SPEECH_REGION")
            .or_else(|| get("ENDPOINT").and_then(|e| region_from_endpoint(&e)))
            .unwrap_or(defaults.speech_region);

        let pause_seconds = match get("PAUSE_DURATION") {
            Some(raw) => parse_pause(&raw)?,
            None => defaults.pause_seconds,
        };

        let include_end_slide = get("INCLUDE_END_SLIDE")
            .map(|v| parse_flag(&v))
            .unwrap_or(defaults.include_end_slide);

        Ok(Self {
            speech_key: get("SPEECH_KEY"),
            speech_region,
            voice_name: get("VOICE_NAME").unwrap_or(defaults.voice_name),
            document: get("POWERPOINT_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.document),
            pause_seconds,
            include_end_slide,
            // An explicitly empty suffix is allowed.
            output_suffix: vars
                .get("OUTPUT_SUFFIX")
                .map(|v| v.trim().to_string())
                .unwrap_or(defaults.output_suffix),
            end_slide_image: get("END_SLIDE_IMAGE")
                .map(PathBuf::from)
                .unwrap_or(defaults.end_slide_image),
            end_slide_narration: get("END_SLIDE_NARRATION")
                .unwrap_or(defaults.end_slide_narration),
        })
    }

    /// Output video path, derived from the document name.
    pub fn output_video(&self) -> PathBuf {
        PathBuf::from(output_video_name(&self.document, &self.output_suffix))
    }
}

/// Read `KEY=value` pairs from a dotenv-style file.
fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let iter = dotenvy::from_path_iter(path).map_err(|e| Error::EnvFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut vars = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(|e| Error::EnvFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        vars.insert(key, value);
    }
    Ok(vars)
}

fn parse_pause(raw: &str) -> Result<f64> {
    let invalid = |reason: &str| Error::InvalidSetting {
        key: "PAUSE_DURATION",
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    let value: f64 = raw.parse().map_err(|_| invalid("not a number"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid("must be a non-negative number of seconds"));
    }
    Ok(value)
}

/// `true`, `yes` and `1` (any case) are true; everything else is false.
pub fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "true" | "yes" | "1")
}

/// Region from an endpoint URL such as `https://westus.api.cognitive.microsoft.com`.
pub fn region_from_endpoint(endpoint: &str) -> Option<String> {
    let host = endpoint
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .split(['/', ':'])
        .next()?;

    let label = host.split('.').next()?;
    if label.is_empty() || !host.contains('.') {
        return None;
    }
    Some(label.to_lowercase())
}

/// Directory layout of intermediate artifacts, relative to a root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub root: PathBuf,
}

impl Workspace {
    /// Pre-supplied slide images; when present they bypass every exporter.
    pub const UPLOADED_SLIDES: &'static str = "uploaded_slides";
    /// Exporter output.
    pub const EXPORTED_SLIDES: &'static str = "exported_slides";
    /// Directory suggested by the manual-export instructions.
    pub const MANUAL_SLIDES: &'static str = "manual_slides";
    /// Canvas-normalized images and per-segment encodes.
    pub const SLIDE_IMAGES: &'static str = "slide_images";
    /// Synthesized narration clips.
    pub const AUDIO_CLIPS: &'static str = "audio_clips";
    /// Speech smoke-test output.
    pub const TEST_AUDIO: &'static str = "test_audio";

    /// Slide image directories searched after export, in priority order.
    pub const SLIDE_SEARCH_DIRS: &'static [&'static str] = &[
        Self::UPLOADED_SLIDES,
        Self::EXPORTED_SLIDES,
        Self::MANUAL_SLIDES,
        "slide_exports",
        "slides",
    ];

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Workspace rooted at the current working directory.
    pub fn current() -> Self {
        Self::new(".")
    }

    pub fn dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn uploaded_slides(&self) -> PathBuf {
        self.dir(Self::UPLOADED_SLIDES)
    }

    pub fn exported_slides(&self) -> PathBuf {
        self.dir(Self::EXPORTED_SLIDES)
    }

    pub fn slide_images(&self) -> PathBuf {
        self.dir(Self::SLIDE_IMAGES)
    }

    pub fn audio_clips(&self) -> PathBuf {
        self.dir(Self::AUDIO_CLIPS)
    }

    pub fn test_audio(&self) -> PathBuf {
        self.dir(Self::TEST_AUDIO)
    }

    /// Resolve a configured path against the workspace root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
