//! Configuration types
//!
//! These structures mirror the utask.yml file. Templates stay unresolved
//! here; the loader runs them through the resolver when it builds the
//! execution context.

use serde::{Deserialize, Serialize};

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Name of the project file, template
    #[serde(
        default,
        rename = "project-file-name",
        skip_serializing_if = "Option::is_none"
    )]
    pub project_file_name: Option<String>,

    /// Full path of the project file, template
    #[serde(
        default,
        rename = "project-file-path",
        skip_serializing_if = "Option::is_none"
    )]
    pub project_file_path: Option<String>,

    /// Engine installation path, template (may reference the discovered
    /// `ENGINE_PATH`)
    #[serde(default, rename = "engine-path", skip_serializing_if = "Option::is_none")]
    pub engine_path: Option<String>,

    /// User variables; mapping order is semantic, values are templates
    #[serde(default)]
    pub variables: serde_yaml::Mapping,

    /// Tasks in menu order
    #[serde(default)]
    pub tasks: Vec<TaskDef>,

    /// Auto-task macros in menu order
    #[serde(default, rename = "auto-tasks")]
    pub auto_tasks: Vec<AutoTaskDef>,
}

/// A task definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TaskDef {
    /// Stable key for scripted invocation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Menu title, template
    pub title: String,

    /// Inline subtask templates or a provider name
    #[serde(default)]
    pub subtasks: SubtaskSource,

    /// Filter names, applied in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<String>,

    /// Action name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Pre-action name
    #[serde(default, rename = "pre-action", skip_serializing_if = "Option::is_none")]
    pub pre_action: Option<String>,

    /// Post-action name
    #[serde(default, rename = "post-action", skip_serializing_if = "Option::is_none")]
    pub post_action: Option<String>,
}

/// Where a task's subtasks come from
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SubtaskSource {
    /// Name of a registered subtask provider
    Provider(String),

    /// Inline subtask templates
    Inline(Vec<SubtaskDef>),
}

impl Default for SubtaskSource {
    fn default() -> Self {
        SubtaskSource::Inline(Vec::new())
    }
}

/// An inline subtask template
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubtaskDef {
    /// Human-readable label, template
    pub msg: String,

    /// Executable, template
    pub program: String,

    /// Argument string, template
    #[serde(default)]
    pub args: String,
}

/// An auto-task macro definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AutoTaskDef {
    pub id: String,

    pub title: String,

    /// One human-readable line per step, shown in the macro menu
    #[serde(
        default,
        rename = "step-descriptions",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub step_descriptions: Vec<String>,

    /// Raw argument tokens, whitespace-separated on expansion
    #[serde(default)]
    pub steps: Vec<String>,
}
