//! Built-in subtask filters
//!
//! Both filters present the subtask list and read a selection expression
//! through the console (scripted answers first). A malformed or
//! out-of-range selection yields an empty list, which the pipeline treats
//! as "abort this cycle".

use crate::runner::context::Context;
use crate::runner::registry::SubtaskFilter;
use crate::runner::task::SubtaskRef;
use crate::ui;
use crate::utils::input::parse_selection;
use std::rc::Rc;

/// Multi-select filter: comma/range expressions, `0` selects everything
pub struct ChooseSubtasks;

impl SubtaskFilter for ChooseSubtasks {
    fn apply(
        &self,
        ctx: &mut Context,
        task_title: &str,
        subtasks: Vec<SubtaskRef>,
    ) -> Vec<SubtaskRef> {
        ui::info(&format!(
            "### Choose Actions to Perform for: {} ### \n",
            task_title
        ));
        print_numbered(&subtasks);
        ui::plain("0 - Do all of the above actions");
        ui::plain("");
        ui::log_if(
            subtasks.len() > 2,
            "(Comma and intervals are supported, e.g. 1,3-5,7)",
            ui::LogLevel::Info,
        );
        ui::info("Action: ");

        let choose_input = ctx.console.read_line().unwrap_or_default();
        ui::plain("");

        // `0` short-circuits: return everything, bypass filtering
        if choose_input == "0" {
            return subtasks;
        }

        let mut result: Vec<SubtaskRef> = Vec::new();
        for index in parse_selection(&choose_input) {
            let Some(subtask) = subtasks.get(index) else {
                ui::error(&format!("Invalid input: {}", choose_input));
                return Vec::new();
            };
            // Repeated selections collapse, keeping first-seen order
            if !result.iter().any(|s| Rc::ptr_eq(s, subtask)) {
                result.push(subtask.clone());
            }
        }
        result
    }
}

/// Single-select filter: any selection not naming exactly one subtask is
/// rejected
pub struct ChooseOneSubtask;

impl SubtaskFilter for ChooseOneSubtask {
    fn apply(
        &self,
        ctx: &mut Context,
        task_title: &str,
        subtasks: Vec<SubtaskRef>,
    ) -> Vec<SubtaskRef> {
        ui::info(&format!(
            "### Choose Action to Perform for: {} ### \n",
            task_title
        ));
        print_numbered(&subtasks);
        ui::plain("");
        ui::info("Action: ");

        let choose_input = ctx.console.read_line().unwrap_or_default();
        ui::plain("");

        let selected = parse_selection(&choose_input);
        if selected.len() != 1 {
            return Vec::new();
        }
        match subtasks.get(selected[0]) {
            Some(subtask) => vec![subtask.clone()],
            None => {
                ui::error(&format!("Invalid input: {}", choose_input));
                Vec::new()
            }
        }
    }
}

fn print_numbered(subtasks: &[SubtaskRef]) {
    for (idx, subtask) in subtasks.iter().enumerate() {
        ui::plain(&format!("{} - {}", idx + 1, subtask.msg));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::console::Console;
    use crate::runner::task::Subtask;
    use std::io::Cursor;

    fn scripted_ctx(answer: &str) -> Context {
        let mut console = Console::from_reader(Box::new(Cursor::new(String::new())));
        console.push_answers([answer.to_string()]);
        Context::new().with_console(console)
    }

    fn three_subtasks() -> Vec<SubtaskRef> {
        vec![
            Subtask::new("First", "true", ""),
            Subtask::new("Second", "true", ""),
            Subtask::new("Third", "true", ""),
        ]
    }

    #[test]
    fn test_choose_subset() {
        let mut ctx = scripted_ctx("1,3");
        let subtasks = three_subtasks();
        let result = ChooseSubtasks.apply(&mut ctx, "Test", subtasks.clone());
        assert_eq!(result.len(), 2);
        assert!(Rc::ptr_eq(&result[0], &subtasks[0]));
        assert!(Rc::ptr_eq(&result[1], &subtasks[2]));
    }

    #[test]
    fn test_choose_range() {
        let mut ctx = scripted_ctx("1-3");
        let result = ChooseSubtasks.apply(&mut ctx, "Test", three_subtasks());
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_zero_selects_all() {
        let mut ctx = scripted_ctx("0");
        let subtasks = three_subtasks();
        let result = ChooseSubtasks.apply(&mut ctx, "Test", subtasks.clone());
        assert_eq!(result.len(), subtasks.len());
    }

    #[test]
    fn test_duplicates_collapse_first_seen_order() {
        let mut ctx = scripted_ctx("2,1,2");
        let subtasks = three_subtasks();
        let result = ChooseSubtasks.apply(&mut ctx, "Test", subtasks.clone());
        assert_eq!(result.len(), 2);
        assert!(Rc::ptr_eq(&result[0], &subtasks[1]));
        assert!(Rc::ptr_eq(&result[1], &subtasks[0]));
    }

    #[test]
    fn test_malformed_input_yields_empty() {
        let mut ctx = scripted_ctx("abc");
        let result = ChooseSubtasks.apply(&mut ctx, "Test", three_subtasks());
        assert!(result.is_empty());
    }

    #[test]
    fn test_out_of_range_yields_empty() {
        let mut ctx = scripted_ctx("1,9");
        let result = ChooseSubtasks.apply(&mut ctx, "Test", three_subtasks());
        assert!(result.is_empty());
    }

    #[test]
    fn test_single_option_accepts_one() {
        let mut ctx = scripted_ctx("2");
        let subtasks = three_subtasks();
        let result = ChooseOneSubtask.apply(&mut ctx, "Test", subtasks.clone());
        assert_eq!(result.len(), 1);
        assert!(Rc::ptr_eq(&result[0], &subtasks[1]));
    }

    #[test]
    fn test_single_option_rejects_multiple() {
        let mut ctx = scripted_ctx("1,2");
        let result = ChooseOneSubtask.apply(&mut ctx, "Test", three_subtasks());
        assert!(result.is_empty());
    }

    #[test]
    fn test_single_option_rejects_malformed() {
        let mut ctx = scripted_ctx("x");
        let result = ChooseOneSubtask.apply(&mut ctx, "Test", three_subtasks());
        assert!(result.is_empty());
    }
}
