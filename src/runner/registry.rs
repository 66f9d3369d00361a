//! Capability registry
//!
//! Filters, actions, pre/post actions and subtask providers are referenced
//! from configuration by name. The registry maps those names to
//! implementations through an explicit registration list built at startup;
//! there is no runtime scanning, and an unregistered name simply resolves
//! to nothing (the loader logs it).

use crate::runner::actions::{ReplaceOutputsAndRun, RunSubtasksSequentially};
use crate::runner::context::Context;
use crate::runner::filters::{ChooseOneSubtask, ChooseSubtasks};
use crate::runner::post_actions::ArchiveOutputs;
use crate::runner::providers::PackageArtifacts;
use crate::runner::task::SubtaskRef;
use crate::runner::vars::VarStore;
use std::collections::HashMap;
use std::rc::Rc;

/// Narrows a subtask list, usually by asking the user
pub trait SubtaskFilter {
    fn apply(
        &self,
        ctx: &mut Context,
        task_title: &str,
        subtasks: Vec<SubtaskRef>,
    ) -> Vec<SubtaskRef>;
}

/// Partition of an action's results.
///
/// Every input subtask lands in exactly one list; both lists empty means
/// the action deliberately cancelled the cycle.
#[derive(Debug, Default)]
pub struct ActionOutcome {
    pub succeeded: Vec<SubtaskRef>,
    pub failed: Vec<SubtaskRef>,
}

impl ActionOutcome {
    pub fn is_cancelled(&self) -> bool {
        self.succeeded.is_empty() && self.failed.is_empty()
    }
}

/// Consumes the filtered subtask list and partitions it
pub trait SubtasksAction {
    fn run(&self, ctx: &mut Context, task_title: &str, subtasks: &[SubtaskRef]) -> ActionOutcome;
}

/// Informational step before the action; cannot veto the cycle
pub trait TaskPreAction {
    fn run(&self, ctx: &mut Context, task_title: &str);
}

/// Follow-up housekeeping over the success/failure partition
pub trait TaskPostAction {
    fn run(
        &self,
        ctx: &mut Context,
        task_title: &str,
        succeeded: &[SubtaskRef],
        failed: &[SubtaskRef],
    );
}

/// Produces a task's subtask list at load time, unfiltered
pub trait SubtaskProvider {
    fn subtasks(&self, vars: &VarStore) -> Vec<SubtaskRef>;
}

/// Name-to-implementation lookup for every capability kind
pub struct Registry {
    filters: HashMap<&'static str, Rc<dyn SubtaskFilter>>,
    actions: HashMap<&'static str, Rc<dyn SubtasksAction>>,
    pre_actions: HashMap<&'static str, Rc<dyn TaskPreAction>>,
    post_actions: HashMap<&'static str, Rc<dyn TaskPostAction>>,
    providers: HashMap<&'static str, Rc<dyn SubtaskProvider>>,
}

impl Registry {
    /// Empty registry
    pub fn new() -> Self {
        Registry {
            filters: HashMap::new(),
            actions: HashMap::new(),
            pre_actions: HashMap::new(),
            post_actions: HashMap::new(),
            providers: HashMap::new(),
        }
    }

    /// Registry holding the built-in capabilities.
    ///
    /// This is the full registration list; adding a capability means adding
    /// a line here.
    pub fn builtin() -> Self {
        let mut registry = Registry::new();
        registry.register_filter("choose-subtasks", Rc::new(ChooseSubtasks));
        registry.register_filter("choose-one-subtask", Rc::new(ChooseOneSubtask));
        registry.register_action("run-subtasks", Rc::new(RunSubtasksSequentially));
        registry.register_action("replace-outputs-and-run", Rc::new(ReplaceOutputsAndRun));
        registry.register_post_action("archive-outputs", Rc::new(ArchiveOutputs));
        registry.register_provider("package-artifacts", Rc::new(PackageArtifacts));
        // No built-in pre-actions ship; the slot exists for custom ones
        registry
    }

    pub fn register_filter(&mut self, name: &'static str, filter: Rc<dyn SubtaskFilter>) {
        self.filters.insert(name, filter);
    }

    pub fn register_action(&mut self, name: &'static str, action: Rc<dyn SubtasksAction>) {
        self.actions.insert(name, action);
    }

    pub fn register_pre_action(&mut self, name: &'static str, action: Rc<dyn TaskPreAction>) {
        self.pre_actions.insert(name, action);
    }

    pub fn register_post_action(&mut self, name: &'static str, action: Rc<dyn TaskPostAction>) {
        self.post_actions.insert(name, action);
    }

    pub fn register_provider(&mut self, name: &'static str, provider: Rc<dyn SubtaskProvider>) {
        self.providers.insert(name, provider);
    }

    pub fn filter(&self, name: &str) -> Option<Rc<dyn SubtaskFilter>> {
        self.filters.get(name).cloned()
    }

    pub fn action(&self, name: &str) -> Option<Rc<dyn SubtasksAction>> {
        self.actions.get(name).cloned()
    }

    pub fn pre_action(&self, name: &str) -> Option<Rc<dyn TaskPreAction>> {
        self.pre_actions.get(name).cloned()
    }

    pub fn post_action(&self, name: &str) -> Option<Rc<dyn TaskPostAction>> {
        self.post_actions.get(name).cloned()
    }

    pub fn provider(&self, name: &str) -> Option<Rc<dyn SubtaskProvider>> {
        self.providers.get(name).cloned()
    }

    /// Registered names per kind, for the help view
    pub fn filter_names(&self) -> Vec<&'static str> {
        sorted_keys(&self.filters)
    }

    pub fn action_names(&self) -> Vec<&'static str> {
        sorted_keys(&self.actions)
    }

    pub fn pre_action_names(&self) -> Vec<&'static str> {
        sorted_keys(&self.pre_actions)
    }

    pub fn post_action_names(&self) -> Vec<&'static str> {
        sorted_keys(&self.post_actions)
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        sorted_keys(&self.providers)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn sorted_keys<V>(map: &HashMap<&'static str, V>) -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = map.keys().copied().collect();
    keys.sort_unstable();
    keys
}
