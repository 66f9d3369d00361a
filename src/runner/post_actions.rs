//! Built-in task post-actions

use crate::runner::command::{archive_dir, open_folder};
use crate::runner::context::Context;
use crate::runner::registry::TaskPostAction;
use crate::runner::task::SubtaskRef;
use crate::ui;
use crate::utils::fs::remove_dir_logged;
use crate::utils::input::parse_selection;
use std::path::{Path, PathBuf};

/// Post-action for packaging workflows: failed output directories are
/// removed, successful ones can be archived and/or deleted, then the
/// relevant folder is opened.
pub struct ArchiveOutputs;

const ACTION_ARCHIVE: usize = 0;
const ACTION_DELETE: usize = 1;

impl TaskPostAction for ArchiveOutputs {
    fn run(
        &self,
        ctx: &mut Context,
        _task_title: &str,
        succeeded: &[SubtaskRef],
        failed: &[SubtaskRef],
    ) {
        // A failed build leaves a partial output directory behind
        for subtask in failed {
            if let Some(output_dir) = subtask.metadata_value() {
                remove_dir_logged(Path::new(&output_dir));
            }
        }

        if !succeeded.is_empty() {
            handle_successful_outputs(ctx, succeeded);
        }
    }
}

fn handle_successful_outputs(ctx: &mut Context, succeeded: &[SubtaskRef]) {
    let output_path = PathBuf::from(ctx.vars.first("OutputPath").unwrap_or_default());
    let archive_path = PathBuf::from(ctx.vars.first("ArchivePath").unwrap_or_default());
    let working_dir = ctx.current_path();

    let selected = loop {
        ui::plain("");
        ui::info("### Choose Actions for the Outputs that were Built Successfully ### \n");
        ui::plain(&format!(
            "1 - Archive built outputs into: {}",
            archive_path.display()
        ));
        ui::plain(&format!(
            "2 - Delete built outputs in: {}",
            output_path.display()
        ));
        ui::plain("0 - Do all of the above actions");
        ui::plain("");
        ui::info("(Comma and intervals are supported, e.g. 1,2)");
        ui::info("(Choose an Action or Press <Enter> to continue and exit)");
        ui::info("Action: ");

        let choose_input = ctx.console.read_line().unwrap_or_default();
        ui::plain("");

        if choose_input.is_empty() {
            break Vec::new();
        }
        if choose_input == "0" {
            break vec![ACTION_ARCHIVE, ACTION_DELETE];
        }

        let indexes = parse_selection(&choose_input);
        if indexes.is_empty() {
            // Bad input: ask again; only empty or valid input exits
            continue;
        }
        if indexes.iter().any(|&i| i > ACTION_DELETE) {
            ui::error(&format!("Invalid input: {}", choose_input));
            continue;
        }
        break indexes;
    };

    if selected.is_empty() {
        open_folder(ctx.executor.as_ref(), &output_path, &working_dir);
        ui::warn("No actions selected, returning to the main menu...");
        return;
    }

    let mut folder_to_open = output_path.clone();

    for subtask in succeeded {
        let Some(output_dir) = subtask.metadata_value() else {
            continue;
        };
        let output_dir = PathBuf::from(output_dir);

        if selected.contains(&ACTION_ARCHIVE) {
            let file_name = output_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let archive_file = archive_path.join(format!("{}.tar.gz", file_name));
            if archive_dir(ctx.executor.as_ref(), &output_dir, &archive_file) {
                folder_to_open = archive_path.clone();
            }
        }

        if selected.contains(&ACTION_DELETE) {
            remove_dir_logged(&output_dir);
        }
    }

    open_folder(ctx.executor.as_ref(), &folder_to_open, &working_dir);
    ui::warn("Returning to the main menu...");
}
