//! Glob matching boundary
//!
//! The resolver's pattern pass only needs "which files under this base path
//! match these include/exclude patterns, in a stable order". The trait keeps
//! actual filesystem walking out of the resolver so tests can substitute a
//! canned matcher.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Filesystem glob matching, resolved against a base directory.
///
/// Returned paths are relative to the base, use forward slashes, and come
/// back in a deterministic order for an unchanged filesystem (the
/// single-result marker form always takes the first).
pub trait GlobMatcher {
    fn matches(&self, root: &str, includes: &[String], excludes: &[String]) -> Vec<String>;
}

/// Production matcher backed by a recursive directory walk
#[derive(Debug, Default)]
pub struct FsGlobMatcher;

impl FsGlobMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl GlobMatcher for FsGlobMatcher {
    fn matches(&self, root: &str, includes: &[String], excludes: &[String]) -> Vec<String> {
        // No include patterns means nothing can match
        if includes.is_empty() {
            return Vec::new();
        }
        let Some(include_set) = build_set(includes) else {
            return Vec::new();
        };
        let exclude_set = build_set(excludes);

        let root_path = Path::new(root);
        let walk_pattern = format!("{}/**/*", root.trim_end_matches(['/', '\\']));

        let mut result = Vec::new();
        // glob yields entries in sorted order, which is what keeps the
        // single-result form stable between calls
        let Ok(entries) = glob::glob(&walk_pattern) else {
            return Vec::new();
        };
        for entry in entries.flatten() {
            if !entry.is_file() {
                continue;
            }
            let Ok(relative) = entry.strip_prefix(root_path) else {
                continue;
            };
            let relative = relative.to_string_lossy().replace('\\', "/");
            if include_set.is_match(&relative)
                && !exclude_set.as_ref().is_some_and(|set| set.is_match(&relative))
            {
                result.push(relative);
            }
        }
        result.sort();
        result
    }
}

fn build_set(patterns: &[String]) -> Option<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(g) => {
                builder.add(g);
            }
            Err(e) => {
                crate::ui::warn(&format!("Ignoring malformed glob pattern '{}': {}", pattern, e));
            }
        }
    }
    builder.build().ok()
}
