//! Execution context
//!
//! One explicit object holds everything the pipeline touches: the variable
//! store, the loaded tasks and auto-tasks, console input with the
//! scripted-answer buffer, and the collaborator handles. It is built at
//! load time, read through pipeline execution, and rebuilt wholesale on
//! reload; nothing in here is process-global.

use crate::runner::command::{ProcessExecutor, SystemExecutor};
use crate::runner::console::Console;
use crate::runner::glob::{FsGlobMatcher, GlobMatcher};
use crate::runner::task::{AutoTask, Task};
use crate::runner::vars::VarStore;
use std::env;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Locates the external engine installation a project is associated with.
///
/// Registry or filesystem discovery lives behind this boundary; the
/// production implementation just reads the `ENGINE_PATH` environment
/// variable (which a project-local `.env` file can provide).
pub trait EngineLocator {
    fn locate(&self, project_file: Option<&Path>) -> Option<PathBuf>;
}

/// Environment-variable engine locator
#[derive(Debug, Default)]
pub struct EnvEngineLocator;

impl EngineLocator for EnvEngineLocator {
    fn locate(&self, _project_file: Option<&Path>) -> Option<PathBuf> {
        env::var("ENGINE_PATH").ok().map(PathBuf::from)
    }
}

/// State shared across one configuration load
pub struct Context {
    /// Directory task commands run in (the `CURRENT_PATH` variable)
    pub working_dir: PathBuf,

    /// Configuration file backing this context, when loaded from disk
    pub config_path: Option<PathBuf>,

    /// Variable store; mutated only during load
    pub vars: VarStore,

    /// Tasks in declaration order
    pub tasks: Vec<Rc<Task>>,

    /// Auto-task macros in declaration order
    pub autotasks: Vec<AutoTask>,

    /// Console input, including the scripted-answer FIFO
    pub console: Console,

    /// Process execution boundary
    pub executor: Rc<dyn ProcessExecutor>,

    /// Glob matching boundary
    pub globs: Rc<dyn GlobMatcher>,

    /// Engine discovery boundary
    pub locator: Rc<dyn EngineLocator>,
}

impl Context {
    /// Context with production collaborators and no loaded configuration
    pub fn new() -> Self {
        Context {
            working_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_path: None,
            vars: VarStore::new(),
            tasks: Vec::new(),
            autotasks: Vec::new(),
            console: Console::stdin(),
            executor: Rc::new(SystemExecutor::new()),
            globs: Rc::new(FsGlobMatcher::new()),
            locator: Rc::new(EnvEngineLocator),
        }
    }

    /// Use a specific working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    /// Track the configuration file this context was loaded from
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Substitute the console (scripted tests)
    pub fn with_console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    /// Substitute the process executor
    pub fn with_executor(mut self, executor: Rc<dyn ProcessExecutor>) -> Self {
        self.executor = executor;
        self
    }

    /// Substitute the glob matcher
    pub fn with_globs(mut self, globs: Rc<dyn GlobMatcher>) -> Self {
        self.globs = globs;
        self
    }

    /// Substitute the engine locator
    pub fn with_locator(mut self, locator: Rc<dyn EngineLocator>) -> Self {
        self.locator = locator;
        self
    }

    /// Task position for a scripted id, if any task carries it
    pub fn task_index_by_id(&self, id: &str) -> Option<usize> {
        self.tasks
            .iter()
            .position(|task| task.id.as_deref() == Some(id))
    }

    /// Auto-task for a macro id
    pub fn autotask_by_id(&self, id: &str) -> Option<&AutoTask> {
        self.autotasks.iter().find(|auto| auto.id == id)
    }

    /// The working directory as tasks see it: the `CURRENT_PATH` variable
    /// when set, the process working directory otherwise
    pub fn current_path(&self) -> PathBuf {
        self.vars
            .first("CURRENT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| self.working_dir.clone())
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::task::Subtask;

    #[test]
    fn test_context_new_is_empty() {
        let ctx = Context::new();
        assert!(ctx.vars.is_empty());
        assert!(ctx.tasks.is_empty());
        assert!(ctx.autotasks.is_empty());
        assert!(ctx.config_path.is_none());
    }

    #[test]
    fn test_task_index_by_id() {
        let mut ctx = Context::new();
        ctx.tasks.push(Rc::new(Task {
            id: Some("Build".to_string()),
            title: "Build the project".to_string(),
            subtasks: vec![Subtask::new("Build", "true", "")],
            filters: Vec::new(),
            action: None,
            pre_action: None,
            post_action: None,
        }));
        ctx.tasks.push(Rc::new(Task {
            id: None,
            title: "Menu-only".to_string(),
            subtasks: Vec::new(),
            filters: Vec::new(),
            action: None,
            pre_action: None,
            post_action: None,
        }));

        assert_eq!(ctx.task_index_by_id("Build"), Some(0));
        assert_eq!(ctx.task_index_by_id("Missing"), None);
    }

    #[test]
    fn test_current_path_prefers_variable() {
        let mut ctx = Context::new().with_working_dir(PathBuf::from("/fallback"));
        assert_eq!(ctx.current_path(), PathBuf::from("/fallback"));

        ctx.vars.set("CURRENT_PATH", "/project");
        assert_eq!(ctx.current_path(), PathBuf::from("/project"));
    }

    #[test]
    fn test_env_engine_locator() {
        env::set_var("ENGINE_PATH", "/opt/engine");
        let locator = EnvEngineLocator;
        assert_eq!(locator.locate(None), Some(PathBuf::from("/opt/engine")));
        env::remove_var("ENGINE_PATH");
    }
}
