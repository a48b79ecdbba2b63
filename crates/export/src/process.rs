//! Running external converters with a hard timeout.

use crate::error::{ExportError, Result};
use std::io::{Read, Seek};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Exit status and captured stderr of a finished command.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stderr: String,
}

/// Run a command to completion, killing it once `timeout` has elapsed.
///
/// Stdout is discarded. Stderr goes to an anonymous temp file so a chatty
/// converter cannot block on a full pipe while we poll.
pub fn run_with_timeout(command: &mut Command, timeout: Duration) -> Result<CommandOutput> {
    let program = command.get_program().to_string_lossy().to_string();
    log::debug!("Running {:?} (timeout {}s)", command, timeout.as_secs());

    let mut stderr_file = tempfile::tempfile()?;
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::from(stderr_file.try_clone()?));

    let mut child = command.spawn().map_err(|source| ExportError::Spawn {
        program: program.clone(),
        source,
    })?;

    let started = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if started.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ExportError::Timeout { program, timeout });
        }
        thread::sleep(POLL_INTERVAL);
    };

    let mut stderr = String::new();
    stderr_file.rewind()?;
    let _ = stderr_file.read_to_string(&mut stderr);

    Ok(CommandOutput { status, stderr })
}

/// Run a command and treat a non-zero exit as an error carrying the last stderr line.
pub fn run_checked(command: &mut Command, timeout: Duration) -> Result<()> {
    let program = command.get_program().to_string_lossy().to_string();
    let output = run_with_timeout(command, timeout)?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = output.stderr.trim();
    if !stderr.is_empty() {
        log::debug!("{} stderr:\n{}", program, stderr);
    }
    let message = match stderr.lines().last() {
        Some(line) => line.to_string(),
        None => format!("exit code {:?}", output.status.code()),
    };
    Err(ExportError::CommandFailed { program, message })
}
