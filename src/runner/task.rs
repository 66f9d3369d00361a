//! Task model
//!
//! Runtime representation of tasks, subtasks and auto-task macros. All of it
//! is built once per configuration load and immutable afterwards, except a
//! subtask's metadata slot, which an action may fill for a later post-action
//! to consume.

use crate::runner::registry::{SubtaskFilter, SubtasksAction, TaskPostAction, TaskPreAction};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A single executable step: a labelled program invocation.
///
/// Shared as `Rc` so filters can de-duplicate on identity; two subtasks with
/// identical fields are still distinct selections.
pub struct Subtask {
    /// Human-readable label
    pub msg: String,
    /// Executable path or name
    pub program: String,
    /// Argument string, tokenized at execution time
    pub args: String,
    /// Collateral state written after creation (e.g. an output directory)
    pub metadata: RefCell<Option<String>>,
}

/// Shared handle to a subtask
pub type SubtaskRef = Rc<Subtask>;

impl Subtask {
    /// Create a subtask with empty metadata
    pub fn new(msg: impl Into<String>, program: impl Into<String>, args: impl Into<String>) -> SubtaskRef {
        Rc::new(Subtask {
            msg: msg.into(),
            program: program.into(),
            args: args.into(),
            metadata: RefCell::new(None),
        })
    }

    /// Create a subtask carrying metadata
    pub fn with_metadata(
        msg: impl Into<String>,
        program: impl Into<String>,
        args: impl Into<String>,
        metadata: impl Into<String>,
    ) -> SubtaskRef {
        let subtask = Subtask::new(msg, program, args);
        *subtask.metadata.borrow_mut() = Some(metadata.into());
        subtask
    }

    /// Clone of the metadata value, if set
    pub fn metadata_value(&self) -> Option<String> {
        self.metadata.borrow().clone()
    }
}

impl fmt::Debug for Subtask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subtask")
            .field("msg", &self.msg)
            .field("program", &self.program)
            .field("args", &self.args)
            .field("metadata", &self.metadata.borrow())
            .finish()
    }
}

/// A declarative task: materialized subtasks plus the capabilities that
/// filter and run them
pub struct Task {
    /// Stable key for scripted invocation; tasks without one can only be
    /// selected from the menu
    pub id: Option<String>,
    /// Menu title
    pub title: String,
    /// Subtasks, materialized before any filter runs
    pub subtasks: Vec<SubtaskRef>,
    /// Filters, applied in declared order
    pub filters: Vec<Rc<dyn SubtaskFilter>>,
    /// The action consuming the filtered list; a missing action is a
    /// configuration error surfaced when the task runs
    pub action: Option<Rc<dyn SubtasksAction>>,
    /// Optional side-effecting step before the action
    pub pre_action: Option<Rc<dyn TaskPreAction>>,
    /// Optional follow-up consuming the success/failure partition
    pub post_action: Option<Rc<dyn TaskPostAction>>,
}

/// A named macro: raw argument-token steps expanded into chained task
/// invocations
#[derive(Debug, Clone)]
pub struct AutoTask {
    pub id: String,
    pub title: String,
    pub step_descriptions: Vec<String>,
    pub steps: Vec<String>,
}
