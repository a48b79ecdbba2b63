//! Orchestration for turning a slide deck into a narrated video.
//!
//! [`pipeline`] runs the stages in order for the `slidecast` binary;
//! [`cleanup`] backs the interactive `slidecast-cleanup` binary.

pub mod cleanup;
pub mod pipeline;

pub use cleanup::{run_interactive, CleanupSummary, Preset};
pub use pipeline::{load_settings, ArtifactCheck, Pipeline, PipelineError, RunSummary, Stage};
