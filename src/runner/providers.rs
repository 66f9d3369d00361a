//! Built-in subtask providers
//!
//! Providers build a task's subtask list programmatically at load time,
//! instead of the task declaring inline subtask templates.

use crate::runner::registry::SubtaskProvider;
use crate::runner::task::{Subtask, SubtaskRef};
use crate::runner::vars::VarStore;
use std::path::Path;

/// One packaging subtask per entry in the `ArtifactFiles` list variable.
///
/// Each subtask invokes the `PackageProgram` variable with the artifact
/// file as input and `OutputPath/<artifact folder>` as output, appending
/// `PackageArgs`. The output directory is recorded as metadata so
/// follow-up actions can replace, archive or delete it.
pub struct PackageArtifacts;

impl SubtaskProvider for PackageArtifacts {
    fn subtasks(&self, vars: &VarStore) -> Vec<SubtaskRef> {
        let program = vars.first("PackageProgram").unwrap_or_default();
        let extra_args = vars.first("PackageArgs").unwrap_or_default();
        let output_root = vars.first("OutputPath").unwrap_or_default();

        let mut result = Vec::new();
        for file in vars.list("ArtifactFiles") {
            let path = Path::new(file);
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let folder = path
                .parent()
                .and_then(|p| p.file_name())
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| stem.clone());
            let output_dir = Path::new(output_root).join(&folder);

            let msg = format!("{} ({})", stem, folder);
            let args = format!(
                "-input \"{}\" -output \"{}\" {}",
                file,
                output_dir.display(),
                extra_args
            );

            result.push(Subtask::with_metadata(
                msg,
                program,
                args,
                output_dir.to_string_lossy(),
            ));
        }
        result
    }
}
