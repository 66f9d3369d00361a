//! Orchestration pipeline
//!
//! The interactive menu and the task cycle. Control flow is an explicit
//! loop: every iteration shows one menu, handles one input, and the cycle
//! reports back whether it completed so scripted chains can decide to
//! continue.

use crate::runner::context::Context;
use crate::runner::load::reload_context;
use crate::runner::registry::Registry;
use crate::runner::script;
use crate::ui;
use crate::utils::fs::warn_if_missing_path;

/// How one task cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStatus {
    /// The action ran and results were reported
    Completed,
    /// The cycle stopped early: empty selection, cancellation, or a
    /// configuration problem
    Aborted,
}

/// Interactive menu loop.
///
/// Runs until the user quits or input ends.
pub fn run_menu(ctx: &mut Context, registry: &Registry) {
    let mut show_autotasks = ctx
        .vars
        .first("DefaultMainMenu")
        .is_some_and(|v| v.eq_ignore_ascii_case("autotasks"));

    loop {
        // Scripted answers belong to one invocation; a fresh menu entry
        // starts clean
        ctx.console.clear_answers();
        print_menu(ctx, show_autotasks);

        let Some(input) = ctx.console.read_line() else {
            break;
        };
        ui::plain("");

        match input.to_lowercase().as_str() {
            "h" | "help" => print_help(ctx, registry),
            "r" => match reload_context(ctx, registry) {
                Ok(()) => ui::plain("Settings reloaded..."),
                Err(e) => ui::error(&format!("Reload failed: {}", e)),
            },
            "*" => {
                show_autotasks = !show_autotasks;
                continue;
            }
            "q" | "quit" => break,
            _ => handle_selection(ctx, &input, show_autotasks),
        }

        ui::info("\n### Press <Enter> to Continue ###");
        if ctx.console.read_line().is_none() {
            break;
        }
    }
}

fn print_menu(ctx: &Context, show_autotasks: bool) {
    if show_autotasks {
        ui::info("### Select AutoTask ###");
        for (i, auto) in ctx.autotasks.iter().enumerate() {
            ui::plain(&format!("{} - {}", i + 1, auto.title));
            for description in &auto.step_descriptions {
                ui::plain(&format!("   - {}", description));
            }
        }
    } else {
        ui::info("### Select Task ###");
        for (i, task) in ctx.tasks.iter().enumerate() {
            ui::plain(&format!("{} - {}", i + 1, task.title));
        }
    }
    ui::plain("");
    ui::info("Or type <h> for help | <r> to reload the settings | <*> to toggle tasks/autotasks | <q> to quit");
    ui::info("Action: ");
}

fn handle_selection(ctx: &mut Context, input: &str, show_autotasks: bool) {
    let Ok(number) = input.trim().parse::<usize>() else {
        ui::error(&format!("Invalid selection: {}", input));
        return;
    };
    if number == 0 {
        ui::error(&format!("Invalid selection: {}", input));
        return;
    }
    let index = number - 1;

    if show_autotasks {
        let Some(auto) = ctx.autotasks.get(index) else {
            ui::error(&format!("Invalid selection: {}", input));
            return;
        };
        // A macro selection runs as if its id had been passed on the
        // command line
        let tokens = vec![format!("a={}", auto.id)];
        let expanded = script::expand_macro_args(&ctx.autotasks, &tokens);
        script::run_chain(ctx, &expanded);
    } else {
        if index >= ctx.tasks.len() {
            ui::error(&format!("Invalid selection: {}", input));
            return;
        }
        run_cycle(ctx, index);
    }
}

/// Run one full cycle for the task at `task_index`.
///
/// Filters narrow the materialized subtask list in order; an empty list at
/// any point aborts without running later stages. The action's partition is
/// reported, then the post-action sees both lists.
pub fn run_cycle(ctx: &mut Context, task_index: usize) -> CycleStatus {
    let Some(task) = ctx.tasks.get(task_index).cloned() else {
        ui::error(&format!("No task at position {}", task_index + 1));
        return CycleStatus::Aborted;
    };

    let mut subtasks = task.subtasks.clone();
    if subtasks.is_empty() {
        ui::warn("No tasks to perform, returning to the main menu...");
        return CycleStatus::Aborted;
    }

    for filter in &task.filters {
        subtasks = filter.apply(ctx, &task.title, subtasks);
        if subtasks.is_empty() {
            ui::warn("No tasks to perform, returning to the main menu...");
            return CycleStatus::Aborted;
        }
    }

    if let Some(pre_action) = &task.pre_action {
        pre_action.run(ctx, &task.title);
    }

    let Some(action) = &task.action else {
        ui::error(&format!("Task '{}' has no action to run", task.title));
        return CycleStatus::Aborted;
    };
    let outcome = action.run(ctx, &task.title, &subtasks);

    // Both partitions empty is the action's way of cancelling the cycle
    if outcome.is_cancelled() {
        ui::warn("Returning to the main menu...");
        return CycleStatus::Aborted;
    }

    if !outcome.succeeded.is_empty() {
        ui::plain("");
        ui::info(&format!("### Successful Tasks for: {} ###\n", task.title));
        for subtask in &outcome.succeeded {
            ui::plain(&format!("- {}", subtask.msg));
        }
        ui::plain("");
    }
    if !outcome.failed.is_empty() {
        ui::plain("");
        ui::info(&format!("### Failed Tasks for: {} ###\n", task.title));
        for subtask in &outcome.failed {
            ui::error(&format!("- {}", subtask.msg));
        }
        ui::plain("");
    }

    if let Some(post_action) = &task.post_action {
        post_action.run(ctx, &task.title, &outcome.succeeded, &outcome.failed);
    }

    CycleStatus::Completed
}

fn print_help(ctx: &Context, registry: &Registry) {
    let rule = "*".repeat(86);

    ui::info(&rule);
    ui::info("\nVARIABLES\n");
    ui::info(&rule);
    for (name, values) in ctx.vars.iter() {
        ui::plain(&format!("`{}` : [ {} ]", name, values.join(", ")));
        for value in values {
            if let Some(warning) = warn_if_missing_path(value) {
                ui::warn(&warning);
            }
        }
    }

    ui::info(&rule);
    ui::info("\nTASKS\n");
    ui::info(&rule);
    for task in &ctx.tasks {
        ui::plain(&format!(
            "`{}` (id: {})",
            task.title,
            task.id.as_deref().unwrap_or("-")
        ));
        for subtask in &task.subtasks {
            ui::plain(&format!(
                "   `{}` -> {} {}",
                subtask.msg, subtask.program, subtask.args
            ));
        }
    }

    ui::info(&rule);
    ui::info("\nCAPABILITIES\n");
    ui::info(&rule);
    ui::plain(&format!("Filters      : {}", registry.filter_names().join(", ")));
    ui::plain(&format!("Actions      : {}", registry.action_names().join(", ")));
    ui::plain(&format!(
        "Pre-actions  : {}",
        registry.pre_action_names().join(", ")
    ));
    ui::plain(&format!(
        "Post-actions : {}",
        registry.post_action_names().join(", ")
    ));
    ui::plain(&format!(
        "Providers    : {}",
        registry.provider_names().join(", ")
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::error::ExecutionResult;
    use crate::runner::command::ProcessExecutor;
    use crate::runner::console::Console;
    use crate::runner::load::populate_context;
    use crate::runner::registry::{ActionOutcome, SubtasksAction, TaskPostAction, TaskPreAction};
    use crate::runner::task::{Subtask, SubtaskRef, Task};
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::path::Path;
    use std::rc::Rc;

    struct StubExecutor;

    impl ProcessExecutor for StubExecutor {
        fn execute(&self, program: &str, _args: &str, _dir: &Path) -> ExecutionResult<i32> {
            Ok(if program == "fail" { 1 } else { 0 })
        }
    }

    #[derive(Default)]
    struct Trace {
        events: RefCell<Vec<String>>,
    }

    struct TracingPre(Rc<Trace>);

    impl TaskPreAction for TracingPre {
        fn run(&self, _ctx: &mut Context, task_title: &str) {
            self.0.events.borrow_mut().push(format!("pre:{}", task_title));
        }
    }

    struct TracingPost(Rc<Trace>);

    impl TaskPostAction for TracingPost {
        fn run(
            &self,
            _ctx: &mut Context,
            _task_title: &str,
            succeeded: &[SubtaskRef],
            failed: &[SubtaskRef],
        ) {
            self.0
                .events
                .borrow_mut()
                .push(format!("post:{}/{}", succeeded.len(), failed.len()));
        }
    }

    struct CancellingAction;

    impl SubtasksAction for CancellingAction {
        fn run(&self, _ctx: &mut Context, _title: &str, _subtasks: &[SubtaskRef]) -> ActionOutcome {
            ActionOutcome::default()
        }
    }

    fn scripted_ctx(answers: &[&str]) -> Context {
        let mut console = Console::from_reader(Box::new(Cursor::new(String::new())));
        console.push_answers(answers.iter().map(|s| s.to_string()));
        Context::new()
            .with_console(console)
            .with_executor(Rc::new(StubExecutor))
    }

    fn build_task(trace: &Rc<Trace>, subtasks: Vec<SubtaskRef>) -> Rc<Task> {
        let registry = Registry::builtin();
        Rc::new(Task {
            id: Some("Build".to_string()),
            title: "Build".to_string(),
            subtasks,
            filters: Vec::new(),
            action: registry.action("run-subtasks"),
            pre_action: Some(Rc::new(TracingPre(trace.clone()))),
            post_action: Some(Rc::new(TracingPost(trace.clone()))),
        })
    }

    #[test]
    fn test_cycle_reports_partition_to_post_action() {
        let trace = Rc::new(Trace::default());
        let mut ctx = scripted_ctx(&[]);
        ctx.tasks.push(build_task(
            &trace,
            vec![
                Subtask::new("Build A", "ok", ""),
                Subtask::new("Build B", "fail", ""),
            ],
        ));

        let status = run_cycle(&mut ctx, 0);
        assert_eq!(status, CycleStatus::Completed);
        assert_eq!(
            *trace.events.borrow(),
            vec!["pre:Build".to_string(), "post:1/1".to_string()]
        );
    }

    #[test]
    fn test_cycle_aborts_on_empty_subtasks() {
        let trace = Rc::new(Trace::default());
        let mut ctx = scripted_ctx(&[]);
        ctx.tasks.push(build_task(&trace, Vec::new()));

        let status = run_cycle(&mut ctx, 0);
        assert_eq!(status, CycleStatus::Aborted);
        // Neither the pre-action nor the post-action ran
        assert!(trace.events.borrow().is_empty());
    }

    #[test]
    fn test_cycle_aborts_when_filter_empties_selection() {
        let trace = Rc::new(Trace::default());
        let registry = Registry::builtin();
        let mut ctx = scripted_ctx(&["abc"]);
        let mut task = build_task(&trace, vec![Subtask::new("Build A", "ok", "")]);
        Rc::get_mut(&mut task).unwrap().filters = vec![registry.filter("choose-subtasks").unwrap()];
        ctx.tasks.push(task);

        let status = run_cycle(&mut ctx, 0);
        assert_eq!(status, CycleStatus::Aborted);
        assert!(trace.events.borrow().is_empty());
    }

    #[test]
    fn test_cycle_aborts_without_action() {
        let mut ctx = scripted_ctx(&[]);
        ctx.tasks.push(Rc::new(Task {
            id: None,
            title: "No action".to_string(),
            subtasks: vec![Subtask::new("Step", "ok", "")],
            filters: Vec::new(),
            action: None,
            pre_action: None,
            post_action: None,
        }));

        assert_eq!(run_cycle(&mut ctx, 0), CycleStatus::Aborted);
    }

    #[test]
    fn test_pre_action_resolved_through_registry() {
        let trace = Rc::new(Trace::default());
        let mut registry = Registry::builtin();
        registry.register_pre_action("trace-pre", Rc::new(TracingPre(trace.clone())));

        let config = parse_config(
            r#"
tasks:
  - id: Build
    title: Build
    subtasks:
      - msg: Step
        program: ok
    action: run-subtasks
    pre-action: trace-pre
"#,
        )
        .unwrap();

        let mut ctx = scripted_ctx(&[]);
        populate_context(&mut ctx, &config, &registry);

        let status = run_cycle(&mut ctx, 0);
        assert_eq!(status, CycleStatus::Completed);
        assert_eq!(*trace.events.borrow(), vec!["pre:Build".to_string()]);
    }

    #[test]
    fn test_cancellation_aborts_before_post_action() {
        let trace = Rc::new(Trace::default());
        let mut ctx = scripted_ctx(&[]);
        let mut task = build_task(&trace, vec![Subtask::new("Build A", "ok", "")]);
        Rc::get_mut(&mut task).unwrap().action = Some(Rc::new(CancellingAction));
        ctx.tasks.push(task);

        let status = run_cycle(&mut ctx, 0);
        assert_eq!(status, CycleStatus::Aborted);
        // The pre-action ran, the post-action did not
        assert_eq!(*trace.events.borrow(), vec!["pre:Build".to_string()]);
    }

    #[test]
    fn test_out_of_range_cycle_aborts() {
        let mut ctx = scripted_ctx(&[]);
        assert_eq!(run_cycle(&mut ctx, 5), CycleStatus::Aborted);
    }

    fn interactive_ctx(input: &str) -> Context {
        let console = Console::from_reader(Box::new(Cursor::new(input.to_string())));
        Context::new()
            .with_console(console)
            .with_executor(Rc::new(StubExecutor))
    }

    #[test]
    fn test_menu_quits_on_q() {
        let mut ctx = interactive_ctx("q\n");
        let registry = Registry::builtin();
        run_menu(&mut ctx, &registry);
    }

    #[test]
    fn test_menu_survives_invalid_selection() {
        // Invalid selection, press-enter, then quit
        let mut ctx = interactive_ctx("99\n\nq\n");
        let registry = Registry::builtin();
        run_menu(&mut ctx, &registry);
    }

    #[test]
    fn test_menu_exits_on_end_of_input() {
        let mut ctx = interactive_ctx("");
        let registry = Registry::builtin();
        run_menu(&mut ctx, &registry);
    }
}
