//! External process execution
//!
//! The pipeline only needs "run this program with this argument string in
//! this directory and tell me the exit code". The trait keeps process
//! spawning out of the core so tests can substitute canned executors.

use crate::error::{ExecutionError, ExecutionResult};
use crate::ui;
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};

/// Blocking process execution boundary
pub trait ProcessExecutor {
    /// Run `program` with `args` in `working_dir`, blocking until it exits.
    ///
    /// Output streams pass through to the controlling terminal; the caller
    /// only sees the exit code.
    fn execute(&self, program: &str, args: &str, working_dir: &Path) -> ExecutionResult<i32>;
}

/// Production executor over `std::process`
#[derive(Debug, Default)]
pub struct SystemExecutor;

impl SystemExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessExecutor for SystemExecutor {
    fn execute(&self, program: &str, args: &str, working_dir: &Path) -> ExecutionResult<i32> {
        let argv = shell_words::split(args)
            .map_err(|e| ExecutionError::InvalidArguments(e.to_string()))?;

        let status = StdCommand::new(program)
            .args(argv)
            .current_dir(working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| ExecutionError::SpawnFailed {
                program: program.to_string(),
                error: e.to_string(),
            })?;

        Ok(status.code().unwrap_or(-1))
    }
}

/// Run a subtask's command with the standard console framing, returning
/// whether it succeeded
pub fn run_console_command(
    executor: &dyn ProcessExecutor,
    program: &str,
    args: &str,
    message: &str,
    working_dir: &Path,
) -> bool {
    ui::info(&format!("### {} ###", message));
    ui::plain(&format!("{} {}", program, args));

    let exit_code = match executor.execute(program, args, working_dir) {
        Ok(code) => code,
        Err(e) => {
            ui::error(&e.to_string());
            ui::plain("");
            return false;
        }
    };

    ui::info("### Result ###\n");
    ui::log_exit_code(
        exit_code,
        &format!("Task finished successfully: {}", message),
        &format!("Failed to perform the task: {}", message),
    );
    ui::plain("");
    exit_code == 0
}

/// Open a directory in the platform file browser, best-effort
pub fn open_folder(executor: &dyn ProcessExecutor, dir: &Path, working_dir: &Path) {
    if !dir.is_dir() {
        return;
    }
    let quoted = format!("\"{}\"", dir.display());
    let (program, args) = if cfg!(target_os = "windows") {
        ("cmd", format!("/C start \"\" {}", quoted))
    } else if cfg!(target_os = "macos") {
        ("open", quoted)
    } else {
        ("xdg-open", quoted)
    };
    if executor.execute(program, &args, working_dir).is_err() {
        ui::warn(&format!("Could not open folder: {}", dir.display()));
    }
}

/// Archive a directory into a `.tar.gz` file through the external `tar`
/// tool.
///
/// Archive creation is a collaborator concern; the core only needs the exit
/// code.
pub fn archive_dir(
    executor: &dyn ProcessExecutor,
    source_dir: &Path,
    archive_file: &Path,
) -> bool {
    let Some(parent) = source_dir.parent() else {
        return false;
    };
    let Some(name) = source_dir.file_name() else {
        return false;
    };
    let args = format!(
        "-czf \"{}\" -C \"{}\" \"{}\"",
        archive_file.display(),
        parent.display(),
        name.to_string_lossy()
    );
    match executor.execute("tar", &args, parent) {
        Ok(0) => true,
        Ok(code) => {
            ui::error(&format!(
                "Archiving {} failed with exit code {}",
                source_dir.display(),
                code
            ));
            false
        }
        Err(e) => {
            ui::error(&format!("Archiving {} failed: {}", source_dir.display(), e));
            false
        }
    }
}
