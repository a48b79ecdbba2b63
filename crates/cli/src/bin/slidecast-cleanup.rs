//! Interactive removal of the intermediate directories a run leaves behind.

use anyhow::{Context, Result};
use slidecast_cli::run_interactive;
use slidecast_core::Workspace;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let workspace = Workspace::new(
        std::env::current_dir().context("Failed to determine the working directory")?,
    );

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    let summary = run_interactive(&workspace, &mut input, &mut out)
        .context("Cleanup was interrupted")?;

    if let Some(summary) = summary {
        if !summary.failed.is_empty() {
            anyhow::bail!("{} directories could not be removed", summary.failed.len());
        }
    }
    Ok(())
}
