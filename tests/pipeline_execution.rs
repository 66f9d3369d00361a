//! Integration tests for the orchestration pipeline
//!
//! These drive the library end-to-end: configuration text in, real process
//! execution (`true`/`false`) out, with a capturing post-action registered
//! to observe the success/failure partition.

use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;
use utask::config::parse_config;
use utask::runner::{
    expand_macro_args, populate_context, run_chain, run_cycle, Console, Context, CycleStatus,
    Registry, SubtaskRef, TaskPostAction,
};

/// Records every partition a post-action sees, as subtask messages
#[derive(Default)]
struct CaptureResults {
    partitions: RefCell<Vec<(Vec<String>, Vec<String>)>>,
}

impl TaskPostAction for CaptureResults {
    fn run(
        &self,
        _ctx: &mut Context,
        _task_title: &str,
        succeeded: &[SubtaskRef],
        failed: &[SubtaskRef],
    ) {
        let names = |subtasks: &[SubtaskRef]| {
            subtasks.iter().map(|s| s.msg.clone()).collect::<Vec<String>>()
        };
        self.partitions
            .borrow_mut()
            .push((names(succeeded), names(failed)));
    }
}

fn capturing_registry() -> (Registry, Rc<CaptureResults>) {
    let capture = Rc::new(CaptureResults::default());
    let mut registry = Registry::builtin();
    registry.register_post_action("capture-results", capture.clone());
    (registry, capture)
}

fn load_ctx(yaml: &str, registry: &Registry) -> Context {
    let config = parse_config(yaml).unwrap();
    let console = Console::from_reader(Box::new(Cursor::new(String::new())));
    let mut ctx = Context::new().with_console(console);
    populate_context(&mut ctx, &config, registry);
    ctx
}

#[test]
fn test_partition_of_mixed_results() {
    let (registry, capture) = capturing_registry();
    let mut ctx = load_ctx(
        r#"
tasks:
  - id: Build
    title: Build both
    subtasks:
      - msg: Build A
        program: "true"
      - msg: Build B
        program: "false"
    action: run-subtasks
    post-action: capture-results
"#,
        &registry,
    );

    let status = run_cycle(&mut ctx, 0);
    assert_eq!(status, CycleStatus::Completed);

    let partitions = capture.partitions.borrow();
    assert_eq!(partitions.len(), 1);
    let (succeeded, failed) = &partitions[0];
    assert_eq!(succeeded, &vec!["Build A".to_string()]);
    assert_eq!(failed, &vec!["Build B".to_string()]);
}

#[test]
fn test_scripted_filter_answers() {
    let (registry, capture) = capturing_registry();
    let mut ctx = load_ctx(
        r#"
tasks:
  - id: Build
    title: Build some
    subtasks:
      - msg: Build A
        program: "true"
      - msg: Build B
        program: "true"
      - msg: Build C
        program: "true"
    filters: [choose-subtasks]
    action: run-subtasks
    post-action: capture-results
"#,
        &registry,
    );

    run_chain(&mut ctx, &tokens(&["Build", "1,3"]));

    let partitions = capture.partitions.borrow();
    assert_eq!(partitions.len(), 1);
    assert_eq!(
        partitions[0].0,
        vec!["Build A".to_string(), "Build C".to_string()]
    );
}

#[test]
fn test_chain_runs_tasks_in_order() {
    let (registry, capture) = capturing_registry();
    let mut ctx = load_ctx(
        r#"
tasks:
  - id: Step1
    title: First step
    subtasks:
      - msg: First
        program: "true"
    action: run-subtasks
    post-action: capture-results
  - id: Step2
    title: Second step
    subtasks:
      - msg: Second
        program: "true"
    action: run-subtasks
    post-action: capture-results
"#,
        &registry,
    );

    run_chain(&mut ctx, &tokens(&["Step1", ",", "Step2"]));

    let partitions = capture.partitions.borrow();
    assert_eq!(partitions.len(), 2);
    assert_eq!(partitions[0].0, vec!["First".to_string()]);
    assert_eq!(partitions[1].0, vec!["Second".to_string()]);
}

#[test]
fn test_macro_expands_into_chained_invocations() {
    let (registry, capture) = capturing_registry();
    let mut ctx = load_ctx(
        r#"
tasks:
  - id: Step1
    title: First step
    subtasks:
      - msg: First
        program: "true"
    action: run-subtasks
    post-action: capture-results
  - id: Step2
    title: Second step
    subtasks:
      - msg: Second
        program: "true"
    action: run-subtasks
    post-action: capture-results

auto-tasks:
  - id: Full
    title: Everything
    steps: ["a=Step1", "a=Step2"]
"#,
        &registry,
    );

    let expanded = expand_macro_args(&ctx.autotasks, &tokens(&["a=Full"]));
    assert_eq!(expanded, tokens(&["Step1", ",", "Step2"]));

    run_chain(&mut ctx, &expanded);
    assert_eq!(capture.partitions.borrow().len(), 2);
}

#[test]
fn test_aborted_invocation_stops_the_chain() {
    let (registry, capture) = capturing_registry();
    let mut ctx = load_ctx(
        r#"
tasks:
  - id: Pick
    title: Pick one
    subtasks:
      - msg: Only
        program: "true"
    filters: [choose-subtasks]
    action: run-subtasks
    post-action: capture-results
  - id: After
    title: Never reached
    subtasks:
      - msg: After
        program: "true"
    action: run-subtasks
    post-action: capture-results
"#,
        &registry,
    );

    // `abc` is a malformed selection: the filter yields an empty list and
    // the cycle aborts, so the second invocation never runs
    run_chain(&mut ctx, &tokens(&["Pick", "abc", ",", "After"]));
    assert!(capture.partitions.borrow().is_empty());
}

#[test]
fn test_failed_subtask_does_not_stop_the_chain() {
    let (registry, capture) = capturing_registry();
    let mut ctx = load_ctx(
        r#"
tasks:
  - id: Flaky
    title: Flaky step
    subtasks:
      - msg: Flaky
        program: "false"
    action: run-subtasks
    post-action: capture-results
  - id: After
    title: Runs anyway
    subtasks:
      - msg: After
        program: "true"
    action: run-subtasks
    post-action: capture-results
"#,
        &registry,
    );

    run_chain(&mut ctx, &tokens(&["Flaky", ",", "After"]));

    let partitions = capture.partitions.borrow();
    assert_eq!(partitions.len(), 2);
    assert_eq!(partitions[0].1, vec!["Flaky".to_string()]);
    assert_eq!(partitions[1].0, vec!["After".to_string()]);
}

fn tokens(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}
