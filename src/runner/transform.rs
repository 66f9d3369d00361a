//! Transform operations for resolved values
//!
//! A transform chain segment looks like `name(arg1, arg2)`. The receiver is
//! the value produced so far; the return value feeds the next segment.
//! Dispatch goes through a closed lookup table; an unknown name is a
//! resolution error, not a silent pass-through.

use crate::error::{ResolveError, ResolveResult};
use std::path::Path;

/// Signature of a transform operation
pub type TransformFn = fn(&str, &[String]) -> ResolveResult<String>;

/// Look up a transform by name
pub fn lookup(name: &str) -> Option<TransformFn> {
    let f: TransformFn = match name {
        "replace" => replace,
        "prepend" => prepend,
        "append" => append,
        "trim" => trim,
        "trim_start" => trim_start,
        "trim_end" => trim_end,
        "to_upper" => to_upper,
        "to_lower" => to_lower,
        "file_name" => file_name,
        "file_stem" => file_stem,
        "parent" => parent,
        _ => return None,
    };
    Some(f)
}

/// Apply one `name(args...)` segment to a value
pub fn apply(name: &str, value: &str, args: &[String]) -> ResolveResult<String> {
    let f = lookup(name).ok_or_else(|| ResolveError::UnknownTransform(name.to_string()))?;
    f(value, args)
}

fn expect_args(name: &str, args: &[String], expected: usize) -> ResolveResult<()> {
    if args.len() != expected {
        return Err(ResolveError::TransformArity {
            name: name.to_string(),
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

fn replace(value: &str, args: &[String]) -> ResolveResult<String> {
    expect_args("replace", args, 2)?;
    Ok(value.replace(&args[0], &args[1]))
}

fn prepend(value: &str, args: &[String]) -> ResolveResult<String> {
    expect_args("prepend", args, 1)?;
    Ok(format!("{}{}", args[0], value))
}

fn append(value: &str, args: &[String]) -> ResolveResult<String> {
    expect_args("append", args, 1)?;
    Ok(format!("{}{}", value, args[0]))
}

fn trim(value: &str, args: &[String]) -> ResolveResult<String> {
    expect_args("trim", args, 0)?;
    Ok(value.trim().to_string())
}

fn trim_start(value: &str, args: &[String]) -> ResolveResult<String> {
    expect_args("trim_start", args, 0)?;
    Ok(value.trim_start().to_string())
}

fn trim_end(value: &str, args: &[String]) -> ResolveResult<String> {
    expect_args("trim_end", args, 0)?;
    Ok(value.trim_end().to_string())
}

fn to_upper(value: &str, args: &[String]) -> ResolveResult<String> {
    expect_args("to_upper", args, 0)?;
    Ok(value.to_uppercase())
}

fn to_lower(value: &str, args: &[String]) -> ResolveResult<String> {
    expect_args("to_lower", args, 0)?;
    Ok(value.to_lowercase())
}

fn file_name(value: &str, args: &[String]) -> ResolveResult<String> {
    expect_args("file_name", args, 0)?;
    Ok(Path::new(value)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default())
}

fn file_stem(value: &str, args: &[String]) -> ResolveResult<String> {
    expect_args("file_stem", args, 0)?;
    Ok(Path::new(value)
        .file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default())
}

fn parent(value: &str, args: &[String]) -> ResolveResult<String> {
    expect_args("parent", args, 0)?;
    Ok(Path::new(value)
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace() {
        let result = apply("replace", "a-b-c", &["-".into(), "_".into()]).unwrap();
        assert_eq!(result, "a_b_c");
    }

    #[test]
    fn test_prepend_append() {
        assert_eq!(apply("prepend", "name", &["pre-".into()]).unwrap(), "pre-name");
        assert_eq!(apply("append", "name", &[".txt".into()]).unwrap(), "name.txt");
    }

    #[test]
    fn test_case_and_trim() {
        assert_eq!(apply("to_upper", "abc", &[]).unwrap(), "ABC");
        assert_eq!(apply("to_lower", "ABC", &[]).unwrap(), "abc");
        assert_eq!(apply("trim", "  x  ", &[]).unwrap(), "x");
        assert_eq!(apply("trim_end", "  x  ", &[]).unwrap(), "  x");
    }

    #[test]
    fn test_path_transforms() {
        assert_eq!(apply("file_name", "/a/b/c.txt", &[]).unwrap(), "c.txt");
        assert_eq!(apply("file_stem", "/a/b/c.txt", &[]).unwrap(), "c");
        assert_eq!(apply("parent", "/a/b/c.txt", &[]).unwrap(), "/a/b");
    }

    #[test]
    fn test_unknown_transform() {
        let result = apply("reverse", "abc", &[]);
        assert!(matches!(result, Err(ResolveError::UnknownTransform(_))));
    }

    #[test]
    fn test_wrong_arity() {
        let result = apply("replace", "abc", &["only-one".into()]);
        assert!(matches!(result, Err(ResolveError::TransformArity { .. })));
    }
}
