//! The end-to-end run: prerequisites, export, speech check, assembly, verification.

use crate::cleanup::format_size;
use slidecast_core::settings::DEFAULT_ENV_FILE;
use slidecast_core::{NarrationMap, Settings, Workspace};
use slidecast_export::{ExportChain, ExportError, ExportOutcome};
use slidecast_pptx::PptxParser;
use slidecast_speech::{test_synthesis, SmokeTestReport, SpeechError, SpeechSynthesizer};
use slidecast_video::{
    slide_inputs, Assembler, AssemblyConfig, AssemblyError, AssemblyReport, EndSlide, VideoEncoder,
};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Steps of a run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Prerequisites,
    Export,
    SpeechCheck,
    Assembly,
    Verification,
}

impl Stage {
    pub fn number(self) -> u8 {
        match self {
            Self::Prerequisites => 0,
            Self::Export => 1,
            Self::SpeechCheck => 2,
            Self::Assembly => 3,
            Self::Verification => 4,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Prerequisites => "Checking prerequisites",
            Self::Export => "Exporting slides as images",
            Self::SpeechCheck => "Testing Azure Speech Services",
            Self::Assembly => "Generating final video with narration",
            Self::Verification => "Checking output files",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {}: {}", self.number(), self.description())
    }
}

/// A stage failure. The run stops at the first one.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{0}")]
    MissingPrerequisite(String),

    #[error("Configuration error: {0}")]
    Config(#[from] slidecast_core::Error),

    #[error("All slide export methods failed")]
    ExportFailed { instructions: String },

    #[error("Slide export failed: {0}")]
    Export(#[source] ExportError),

    #[error("Azure Speech Services test failed: {0}")]
    SpeechCheck(#[from] SpeechError),

    #[error("Could not read {path}: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: slidecast_core::Error,
    },

    #[error("Failed to generate final video: {0}")]
    Assembly(#[from] AssemblyError),
}

impl PipelineError {
    /// The stage that failed.
    pub fn stage(&self) -> Stage {
        match self {
            Self::MissingPrerequisite(_) | Self::Config(_) => Stage::Prerequisites,
            Self::ExportFailed { .. } | Self::Export(_) => Stage::Export,
            Self::SpeechCheck(_) => Stage::SpeechCheck,
            Self::Document { .. } | Self::Assembly(_) => Stage::Assembly,
        }
    }
}

impl From<ExportError> for PipelineError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::AllFailed { instructions } => Self::ExportFailed { instructions },
            other => Self::Export(other),
        }
    }
}

/// Load settings from the credential file, which must exist.
pub fn load_settings(workspace: &Workspace) -> Result<Settings, PipelineError> {
    let env_file = workspace.dir(DEFAULT_ENV_FILE);
    if !env_file.is_file() {
        return Err(PipelineError::MissingPrerequisite(format!(
            "Environment file not found: {}\n\
             Create it with your Azure Speech Services credentials:\n\
             SPEECH_KEY=your_azure_speech_key\n\
             ENDPOINT=https://your-region.api.cognitive.microsoft.com",
            env_file.display()
        )));
    }
    log::info!("Found environment file: {}", env_file.display());
    Ok(Settings::load(&env_file)?)
}

/// Check that the document and speech credentials are in place.
pub fn check_prerequisites(settings: &Settings, workspace: &Workspace) -> Result<(), PipelineError> {
    if settings.speech_key.is_none() {
        return Err(PipelineError::MissingPrerequisite(
            "SPEECH_KEY not found in environment file or environment variables".to_string(),
        ));
    }

    let document = workspace.resolve(&settings.document);
    if !document.is_file() {
        return Err(PipelineError::MissingPrerequisite(format!(
            "PowerPoint file not found: {}",
            document.display()
        )));
    }
    log::info!("Found PowerPoint file: {}", document.display());
    Ok(())
}

/// Result of checking one expected output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactCheck {
    pub path: PathBuf,
    /// Size or file count when present.
    pub detail: Option<String>,
}

impl ArtifactCheck {
    fn inspect(path: &Path) -> Self {
        let detail = if path.is_dir() {
            fs::read_dir(path).ok().map(|entries| {
                let count = entries
                    .filter_map(|e| e.ok())
                    .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
                    .count();
                format!("{} files", count)
            })
        } else {
            fs::metadata(path)
                .ok()
                .filter(|m| m.is_file())
                .map(|m| format_size(m.len()))
        };
        Self {
            path: path.to_path_buf(),
            detail,
        }
    }

    pub fn found(&self) -> bool {
        self.detail.is_some()
    }
}

/// Everything a successful run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub export: ExportOutcome,
    pub smoke_test: SmokeTestReport,
    pub assembly: AssemblyReport,
    pub checks: Vec<ArtifactCheck>,
    /// Intermediate directories removed after success.
    pub cleaned: Vec<PathBuf>,
}

/// One configured run over a workspace.
pub struct Pipeline<'a> {
    settings: Settings,
    workspace: Workspace,
    exporter: &'a ExportChain,
    synthesizer: &'a dyn SpeechSynthesizer,
    encoder: &'a dyn VideoEncoder,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        settings: Settings,
        workspace: Workspace,
        exporter: &'a ExportChain,
        synthesizer: &'a dyn SpeechSynthesizer,
        encoder: &'a dyn VideoEncoder,
    ) -> Self {
        Self {
            settings,
            workspace,
            exporter,
            synthesizer,
            encoder,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn output_video(&self) -> PathBuf {
        self.workspace.resolve(&self.settings.output_video())
    }

    fn assembly_config(&self) -> AssemblyConfig {
        AssemblyConfig {
            pause_seconds: self.settings.pause_seconds,
            end_slide: self.settings.include_end_slide.then(|| EndSlide {
                image: self.workspace.resolve(&self.settings.end_slide_image),
                narration: self.settings.end_slide_narration.clone(),
            }),
            output: self.output_video(),
        }
    }

    /// Run every stage in order, calling `on_stage` as each begins.
    /// Stops at the first failing stage.
    pub fn run(&self, mut on_stage: impl FnMut(Stage)) -> Result<RunSummary, PipelineError> {
        on_stage(Stage::Prerequisites);
        check_prerequisites(&self.settings, &self.workspace)?;
        let document = self.workspace.resolve(&self.settings.document);

        on_stage(Stage::Export);
        let export = self.exporter.run(&document, &self.workspace)?;

        on_stage(Stage::SpeechCheck);
        let smoke_test = test_synthesis(self.synthesizer, &self.workspace.test_audio())?;

        on_stage(Stage::Assembly);
        let presentation = PptxParser::new()
            .parse_path(&document)
            .map_err(|source| PipelineError::Document {
                path: document.clone(),
                source,
            })?;
        log::info!(
            "Loaded {} slides from {}, {} with narration",
            presentation.slides.len(),
            presentation.filename,
            presentation.narrated_slide_count()
        );
        if export.images.len() != presentation.slides.len() {
            log::warn!(
                "Found {} slide images for {} slides; narration is matched by position",
                export.images.len(),
                presentation.slides.len()
            );
        }

        let narrations = NarrationMap::from_slides(&presentation.slides);
        let slides = slide_inputs(&export.images, |index| {
            presentation.slide(index).and_then(|s| s.title.clone())
        });
        let assembly = Assembler::new(self.synthesizer, self.encoder, self.workspace.clone())
            .assemble(&slides, &narrations, &self.assembly_config())?;

        on_stage(Stage::Verification);
        let checks = self.verify_outputs(&export.source_dir);
        let cleaned = self.remove_intermediates();

        Ok(RunSummary {
            export,
            smoke_test,
            assembly,
            checks,
            cleaned,
        })
    }

    /// Look for the final video, the slide images, and the audio clips.
    /// Anything missing is logged, not treated as failure.
    fn verify_outputs(&self, slides_dir: &Path) -> Vec<ArtifactCheck> {
        let expected = [
            self.output_video(),
            slides_dir.to_path_buf(),
            self.workspace.audio_clips(),
        ];

        expected
            .iter()
            .map(|path| {
                let check = ArtifactCheck::inspect(path);
                match &check.detail {
                    Some(detail) => log::info!("Found {} ({})", path.display(), detail),
                    None => log::warn!("Missing: {}", path.display()),
                }
                check
            })
            .collect()
    }

    /// Remove processed frames and the smoke-test audio.
    fn remove_intermediates(&self) -> Vec<PathBuf> {
        let mut removed = Vec::new();
        for dir in [self.workspace.slide_images(), self.workspace.test_audio()] {
            if !dir.exists() {
                continue;
            }
            match fs::remove_dir_all(&dir) {
                Ok(()) => removed.push(dir),
                Err(e) => log::warn!("Could not remove {}: {}", dir.display(), e),
            }
        }
        removed
    }
}
