//! Scripted execution
//!
//! A flat token list drives the pipeline unattended: macros expand into
//! chained task invocations separated by `,`, and each invocation's
//! trailing tokens are pre-loaded as answers for the prompts that task
//! would otherwise block on.

use crate::runner::context::Context;
use crate::runner::pipeline::{run_cycle, CycleStatus};
use crate::runner::task::AutoTask;
use crate::ui;
use std::collections::HashSet;
use std::collections::VecDeque;

/// Separator between chained invocations
pub const CHAIN_TOKEN: &str = ",";

/// Literal token standing for an empty answer line
pub const ENTER_TOKEN: &str = "<enter>";

/// Expand `a=<id>` macro tokens into their step tokens.
///
/// A macro's steps are whitespace-tokenized and spliced in place, with a
/// `,` between successive step groups and none after the last. Spliced
/// tokens are re-examined, so a step may invoke another macro or name a
/// plain task with the `a=` form; an `a=` token matching no macro passes
/// through as its bare id. A macro re-entered during its own expansion is
/// skipped.
pub fn expand_macro_args(autotasks: &[AutoTask], tokens: &[String]) -> Vec<String> {
    let mut result = Vec::new();
    let mut queue: VecDeque<String> = tokens.iter().cloned().collect();
    let mut expanding: HashSet<String> = HashSet::new();

    while let Some(token) = queue.pop_front() {
        let Some(id) = token.strip_prefix("a=") else {
            result.push(token);
            continue;
        };

        let Some(auto) = autotasks.iter().find(|a| a.id == id) else {
            result.push(id.to_string());
            continue;
        };

        if !expanding.insert(auto.id.clone()) {
            ui::warn(&format!("Skipping recursive auto-task '{}'", auto.id));
            continue;
        }

        let mut spliced: Vec<String> = Vec::new();
        for (i, step) in auto.steps.iter().enumerate() {
            spliced.extend(step.split_whitespace().map(String::from));
            if i + 1 < auto.steps.len() {
                spliced.push(CHAIN_TOKEN.to_string());
            }
        }
        for token in spliced.into_iter().rev() {
            queue.push_front(token);
        }
    }

    result
}

/// Run a chain of task invocations.
///
/// Tokens up to the first `,` form one invocation: a task id followed by
/// literal prompt answers (`<enter>` is an empty line). The answer buffer
/// is cleared per invocation, then pre-loaded. The chain continues past the
/// separator only while invocations complete; an id matching no task
/// silently stops it.
pub fn run_chain(ctx: &mut Context, tokens: &[String]) {
    let mut rest = tokens;

    while !rest.is_empty() {
        let (group, remaining) = match rest.iter().position(|t| t == CHAIN_TOKEN) {
            Some(split) => (&rest[..split], &rest[split + 1..]),
            None => (rest, &rest[rest.len()..]),
        };
        rest = remaining;

        ctx.console.clear_answers();

        let Some((task_id, answers)) = group.split_first() else {
            break;
        };
        let Some(task_index) = ctx.task_index_by_id(task_id) else {
            break;
        };

        ctx.console.push_answers(answers.iter().map(|answer| {
            if answer == ENTER_TOKEN {
                String::new()
            } else {
                answer.clone()
            }
        }));

        if run_cycle(ctx, task_index) != CycleStatus::Completed {
            break;
        }
    }
}
