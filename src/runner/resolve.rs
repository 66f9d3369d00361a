//! Variable resolution
//!
//! Turns a template string into one or more concrete strings through four
//! ordered passes over the variable store, plus a best-effort path cleanup:
//!
//! 1. `${Name}` markers are replaced with the variable's first value.
//! 2. The first `%{Name}` marker fans the template out, one string per
//!    stored value. Additional multi-value markers in the same template are
//!    left for a later resolution call; this engine expands one fan-out
//!    marker per call.
//! 3. A brace expression of the form `${base -> pattern -> !pattern}` runs
//!    the include/exclude patterns against the base path; the `${}` form
//!    takes the first match, the `%{}` form fans out per match. No matches
//!    leaves the expression in place.
//! 4. A remaining `value->name(args)` chain applies transforms left to
//!    right.
//!
//! Finally, absolute path-like results are lexically normalized.

use crate::runner::glob::GlobMatcher;
use crate::runner::transform;
use crate::runner::vars::VarStore;
use crate::ui;
use crate::utils::path::{is_path_legal, normalize_path};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Marker prefix for single-value substitution
const SINGLE_MARK: char = '$';
/// Marker prefix for multi-value expansion
const MULTI_MARK: char = '%';
/// Separator between glob patterns and between transform segments
const CHAIN_SEP: &str = "->";
/// Prefix excluding a glob pattern
const EXCLUDE_MARK: char = '!';

fn single_brace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]*)\}").unwrap())
}

fn multi_brace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"%\{([^}]*)\}").unwrap())
}

/// Resolver over a variable store and a glob matcher.
///
/// Pure with respect to the store: resolution never mutates it.
pub struct Resolver<'a> {
    vars: &'a VarStore,
    globs: &'a dyn GlobMatcher,
}

impl<'a> Resolver<'a> {
    pub fn new(vars: &'a VarStore, globs: &'a dyn GlobMatcher) -> Self {
        Resolver { vars, globs }
    }

    /// Resolve a template into one or more concrete strings.
    ///
    /// Never returns an empty sequence: a template with no recognized
    /// construct comes back as itself, and unknown markers are left in
    /// place for the caller to tolerate.
    pub fn resolve(&self, template: &str) -> Vec<String> {
        let substituted = self.substitute_single(template);
        let fanned = self.expand_multi(&substituted);

        let mut globbed = Vec::new();
        for value in &fanned {
            globbed.extend(self.expand_patterns(value));
        }

        let mut transformed = Vec::with_capacity(globbed.len());
        for value in globbed {
            transformed.push(apply_transform_chain(&value));
        }

        transformed.iter().map(|v| normalize_if_path(v)).collect()
    }

    /// Pass 1: replace every `${Name}` with the name's first value
    fn substitute_single(&self, template: &str) -> String {
        let mut result = template.to_string();
        for (name, values) in self.vars.iter() {
            let marker = format!("{}{{{}}}", SINGLE_MARK, name);
            if result.contains(&marker) {
                result = result.replace(&marker, &values[0]);
            }
        }
        result
    }

    /// Pass 2: fan out on the first `%{Name}` marker found, in store order
    fn expand_multi(&self, value: &str) -> Vec<String> {
        for (name, values) in self.vars.iter() {
            let marker = format!("{}{{{}}}", MULTI_MARK, name);
            if value.contains(&marker) {
                return values.iter().map(|v| value.replace(&marker, v)).collect();
            }
        }
        vec![value.to_string()]
    }

    /// Pass 3: expand the first brace expression as a glob search
    fn expand_patterns(&self, value: &str) -> Vec<String> {
        let (expr, multi) = match single_brace_re().captures(value) {
            Some(caps) => (caps, false),
            None => match multi_brace_re().captures(value) {
                Some(caps) => (caps, true),
                None => return vec![value.to_string()],
            },
        };

        let content = expr.get(1).map(|m| m.as_str()).unwrap_or("");
        let mut tokens = content.split(CHAIN_SEP);
        let root = tokens.next().unwrap_or("").trim_end();

        let mut includes = Vec::new();
        let mut excludes = Vec::new();
        for pattern in tokens {
            let pattern = pattern.trim();
            if let Some(stripped) = pattern.strip_prefix(EXCLUDE_MARK) {
                excludes.push(stripped.to_string());
            } else {
                includes.push(pattern.to_string());
            }
        }

        let matches = self.globs.matches(root, &includes, &excludes);
        if matches.is_empty() {
            // Zero matches keeps the expression verbatim; later stages must
            // tolerate the marker
            return vec![value.to_string()];
        }

        let mark = if multi { MULTI_MARK } else { SINGLE_MARK };
        let marker = format!("{}{{{}}}", mark, content);
        if multi {
            matches
                .iter()
                .map(|file| value.replace(&marker, file))
                .collect()
        } else {
            vec![value.replace(&marker, &matches[0])]
        }
    }
}

/// Pass 4: apply a `value->name(args)` transform chain.
///
/// A chain that fails to parse or names an unknown transform is logged and
/// the string passes through unchanged; resolution never aborts on it.
fn apply_transform_chain(value: &str) -> String {
    if !value.contains(CHAIN_SEP) {
        return value.to_string();
    }
    // An unexpanded glob expression still carries its marker (and the
    // separators inside it); that is not a transform chain
    if value.contains('{') || value.contains('}') {
        return value.to_string();
    }

    let mut segments = value.split(CHAIN_SEP);
    let mut current = segments.next().unwrap_or("").to_string();

    for segment in segments {
        match apply_transform_segment(&current, segment.trim()) {
            Ok(next) => current = next,
            Err(e) => {
                ui::warn(&format!("Skipping transform chain in '{}': {}", value, e));
                return value.to_string();
            }
        }
    }
    current
}

fn apply_transform_segment(
    value: &str,
    segment: &str,
) -> crate::error::ResolveResult<String> {
    let (name, rest) = segment
        .split_once('(')
        .ok_or_else(|| crate::error::ResolveError::MalformedTransform(segment.to_string()))?;
    let inner = rest
        .strip_suffix(')')
        .ok_or_else(|| crate::error::ResolveError::MalformedTransform(segment.to_string()))?;

    let args: Vec<String> = if inner.trim().is_empty() {
        Vec::new()
    } else {
        inner
            .split(',')
            .map(|a| a.trim().replace('\'', ""))
            .collect()
    };

    transform::apply(name.trim(), value, &args)
}

/// Pass 5: lexically normalize absolute path-like strings
fn normalize_if_path(value: &str) -> String {
    if !is_path_legal(value) {
        return value.to_string();
    }
    let path = Path::new(value);
    if path.is_absolute() {
        normalize_path(path).to_string_lossy().into_owned()
    } else {
        value.to_string()
    }
}
