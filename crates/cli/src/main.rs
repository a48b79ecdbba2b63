//! CLI driver: turn the configured slide deck into a narrated video.

use anyhow::{Context, Result};
use clap::Parser;
use slidecast_cli::{load_settings, Pipeline, PipelineError, RunSummary, Stage};
use slidecast_core::Workspace;
use slidecast_export::ExportChain;
use slidecast_speech::{AzureSpeechSynthesizer, SpeechError};
use slidecast_video::{FfmpegEncoder, SegmentOutcome};
use std::process::ExitCode;
use std::time::Instant;

/// Generate a narrated video from a PowerPoint deck and its speaker notes.
///
/// All configuration is read from `.env` in the current directory.
#[derive(Parser, Debug)]
#[command(name = "slidecast")]
#[command(author, version, about, long_about = None)]
struct Args {}

fn main() -> ExitCode {
    let _args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let started = Instant::now();
    println!("Slidecast: PowerPoint to narrated video");
    println!("{}", "=".repeat(60));

    match run() {
        Ok(summary) => {
            print_summary(&summary);
            println!();
            println!("Total time: {:.1}s", started.elapsed().as_secs_f64());
            ExitCode::SUCCESS
        }
        Err(e) => {
            report_failure(&e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<RunSummary> {
    let workspace = Workspace::new(
        std::env::current_dir().context("Failed to determine the working directory")?,
    );

    print_stage(Stage::Prerequisites);
    let settings = load_settings(&workspace)?;

    let synthesizer = AzureSpeechSynthesizer::from_settings(&settings).map_err(|e| match e {
        SpeechError::MissingCredential => {
            PipelineError::MissingPrerequisite("SPEECH_KEY not found in .env file".to_string())
        }
        other => PipelineError::SpeechCheck(other),
    })?;
    log::info!(
        "Using voice {} in region {}",
        synthesizer.voice(),
        settings.speech_region
    );

    let exporter = ExportChain::standard();
    let encoder = FfmpegEncoder::new(workspace.slide_images());
    let pipeline = Pipeline::new(settings, workspace, &exporter, &synthesizer, &encoder);

    // Prerequisites were announced above.
    let summary = pipeline.run(|stage| {
        if stage != Stage::Prerequisites {
            print_stage(stage);
        }
    })?;
    Ok(summary)
}

fn print_stage(stage: Stage) {
    println!();
    println!("{}", stage);
    println!("{}", "-".repeat(40));
}

fn print_summary(summary: &RunSummary) {
    let assembly = &summary.assembly;

    println!();
    println!("{}", "=".repeat(60));
    println!("Video generation complete");
    println!("{}", "=".repeat(60));

    match &summary.export.mechanism {
        Some(name) => println!("Slides exported with: {}", name),
        None => println!("Slides taken from: {}", summary.export.source_dir.display()),
    }
    println!(
        "Segments: {} ({} narrated), {:.1}s total",
        assembly.segments.len(),
        assembly.narrated_count(),
        assembly.total_seconds()
    );

    for segment in &assembly.segments {
        let note = match segment.outcome {
            SegmentOutcome::Narrated(source) => format!("narrated ({:?} match)", source),
            SegmentOutcome::EndSlide => "closing narration".to_string(),
            SegmentOutcome::NoNarration => "silent".to_string(),
            SegmentOutcome::SynthesisFailed => "silent (speech failed)".to_string(),
        };
        println!("  {:<12} {:>6.2}s  {}", segment.label, segment.duration, note);
    }
    for path in &assembly.skipped {
        println!("  skipped unreadable image: {}", path.display());
    }

    println!();
    println!("Output files:");
    for check in &summary.checks {
        match &check.detail {
            Some(detail) => println!("  {} ({})", check.path.display(), detail),
            None => println!("  {} (missing)", check.path.display()),
        }
    }
    for dir in &summary.cleaned {
        println!("  cleaned up {}", dir.display());
    }

    println!();
    println!("Your video is ready: {}", assembly.output.display());
}

fn report_failure(error: &anyhow::Error) {
    eprintln!();
    match error.downcast_ref::<PipelineError>() {
        Some(PipelineError::ExportFailed { instructions }) => {
            eprintln!("Failed at {}: could not export slides automatically.", stage_name(Stage::Export));
            eprintln!();
            eprintln!("{}", instructions);
        }
        Some(e) => eprintln!("Failed at {}: {}", stage_name(e.stage()), e),
        None => eprintln!("Error: {:#}", error),
    }
}

fn stage_name(stage: Stage) -> String {
    format!("step {} ({})", stage.number(), stage.description().to_lowercase())
}
