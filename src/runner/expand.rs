//! Subtask expansion
//!
//! A subtask template's three fields resolve independently and may produce
//! different numbers of values. Expansion zips them with broadcast
//! semantics: the output length is the longest sequence, and shorter
//! sequences repeat their last value for the remaining slots.

use crate::runner::resolve::Resolver;
use crate::runner::task::{Subtask, SubtaskRef};

/// Expand one subtask template into concrete subtasks
pub fn expand_subtasks(
    resolver: &Resolver<'_>,
    msg_template: &str,
    program_template: &str,
    args_template: &str,
) -> Vec<SubtaskRef> {
    let messages = resolver.resolve(msg_template);
    let programs = resolver.resolve(program_template);
    let args = resolver.resolve(args_template);

    let count = messages.len().max(programs.len()).max(args.len());
    let mut result = Vec::with_capacity(count);

    for i in 0..count {
        result.push(Subtask::new(
            pick(&messages, i),
            pick(&programs, i),
            pick(&args, i),
        ));
    }
    result
}

/// Element at `i`, or the sequence's last element once `i` runs past it
fn pick(values: &[String], i: usize) -> &str {
    values
        .get(i)
        .or_else(|| values.last())
        .map(String::as_str)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::glob::GlobMatcher;
    use crate::runner::vars::VarStore;

    struct NoGlobs;

    impl GlobMatcher for NoGlobs {
        fn matches(&self, _: &str, _: &[String], _: &[String]) -> Vec<String> {
            Vec::new()
        }
    }

    #[test]
    fn test_plain_template_yields_one_subtask() {
        let vars = VarStore::new();
        let resolver = Resolver::new(&vars, &NoGlobs);
        let subtasks = expand_subtasks(&resolver, "Build", "make", "all");
        assert_eq!(subtasks.len(), 1);
        assert_eq!(subtasks[0].msg, "Build");
        assert_eq!(subtasks[0].program, "make");
        assert_eq!(subtasks[0].args, "all");
    }

    #[test]
    fn test_broadcast_repeats_last_element() {
        let mut vars = VarStore::new();
        vars.set_list("Msgs", vec!["a".into(), "b".into(), "c".into()]);
        vars.set_list("Args", vec!["x".into(), "y".into()]);
        let resolver = Resolver::new(&vars, &NoGlobs);

        let subtasks = expand_subtasks(&resolver, "%{Msgs}", "p", "%{Args}");
        assert_eq!(subtasks.len(), 3);

        let triples: Vec<(&str, &str, &str)> = subtasks
            .iter()
            .map(|s| (s.msg.as_str(), s.program.as_str(), s.args.as_str()))
            .collect();
        assert_eq!(
            triples,
            vec![("a", "p", "x"), ("b", "p", "y"), ("c", "p", "y")]
        );
    }

    #[test]
    fn test_expander_leaves_metadata_empty() {
        let vars = VarStore::new();
        let resolver = Resolver::new(&vars, &NoGlobs);
        let subtasks = expand_subtasks(&resolver, "Build", "make", "all");
        assert_eq!(subtasks[0].metadata_value(), None);
    }
}
