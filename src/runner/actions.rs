//! Built-in subtask actions

use crate::runner::command::run_console_command;
use crate::runner::context::Context;
use crate::runner::registry::{ActionOutcome, SubtasksAction};
use crate::runner::task::SubtaskRef;
use crate::ui;
use crate::utils::fs::remove_dir_logged;
use std::path::Path;

/// Default action: run every subtask in order, partitioning by exit code.
///
/// Execution never stops on failure; all subtasks run regardless of earlier
/// outcomes.
pub struct RunSubtasksSequentially;

impl SubtasksAction for RunSubtasksSequentially {
    fn run(&self, ctx: &mut Context, _task_title: &str, subtasks: &[SubtaskRef]) -> ActionOutcome {
        run_all(ctx, subtasks)
    }
}

/// Shared sequential executor used by every built-in action
fn run_all(ctx: &Context, subtasks: &[SubtaskRef]) -> ActionOutcome {
    let working_dir = ctx.current_path();
    let mut outcome = ActionOutcome::default();

    for subtask in subtasks {
        let ok = run_console_command(
            ctx.executor.as_ref(),
            &subtask.program,
            &subtask.args,
            &subtask.msg,
            &working_dir,
        );
        if ok {
            outcome.succeeded.push(subtask.clone());
        } else {
            outcome.failed.push(subtask.clone());
        }
    }
    outcome
}

/// Variant for subtasks that regenerate their output directories: warns
/// that existing outputs will be replaced, asks for confirmation, deletes
/// each subtask's recorded output directory, then runs sequentially.
///
/// Declining the confirmation cancels the cycle (both partitions empty).
pub struct ReplaceOutputsAndRun;

impl SubtasksAction for ReplaceOutputsAndRun {
    fn run(&self, ctx: &mut Context, _task_title: &str, subtasks: &[SubtaskRef]) -> ActionOutcome {
        let output_path = ctx.vars.first("OutputPath").unwrap_or_default().to_string();

        ui::info("The following outputs will be rebuilt:\n");
        for subtask in subtasks {
            ui::plain(&format!("- {}", subtask.msg));
        }
        ui::plain("");
        ui::warn("WARNING: This operation will replace the selected outputs in:");
        ui::plain(&output_path);
        ui::info("Do you want to continue?");
        ui::info("(Type <N> to cancel or Press <Enter> to continue): ");
        ui::info("Action: ");

        let choose_input = ctx.console.read_line().unwrap_or_default();
        ui::plain("");

        if choose_input.eq_ignore_ascii_case("n") {
            return ActionOutcome::default();
        }

        // Remove stale output directories before rebuilding
        for subtask in subtasks {
            if let Some(output_dir) = subtask.metadata_value() {
                remove_dir_logged(Path::new(&output_dir));
            }
        }

        run_all(ctx, subtasks)
    }
}
