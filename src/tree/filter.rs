use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::warn;

use super::{Node, VCStatus};
use crate::error::{ConfigError, Result};

/// Compile a single configuration glob (`*` also matches `/`, like `fnmatch`).
///
/// This is `globset` syntax, not `fnmatch`: `{a,b}` is an alternation and
/// `\` escapes the next character. Use [`NameFilter`] for user-typed filters.
pub fn glob_matcher(pattern: &str) -> Result<GlobMatcher> {
    Glob::new(pattern)
        .map(|g| g.compile_matcher())
        .map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Name filter with `fnmatch` semantics.
///
/// Only `*`, `?` and closed `[...]` classes are special. Braces, backslashes
/// and an unclosed `[` match literally, so no pattern is ever rejected.
#[derive(Debug, Clone)]
pub struct NameFilter {
    matcher: Option<GlobMatcher>,
}

impl NameFilter {
    pub fn new(pattern: &str) -> Self {
        let matcher = compile_literal_backslash(&fnmatch_to_glob(pattern))
            .or_else(|_| compile_literal_backslash(&globset::escape(pattern)));
        match matcher {
            Ok(matcher) => Self {
                matcher: Some(matcher),
            },
            Err(e) => {
                warn!(pattern, error = %e, "filter pattern matches nothing");
                Self { matcher: None }
            }
        }
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.matcher.as_ref().is_some_and(|m| m.is_match(name))
    }
}

fn compile_literal_backslash(glob: &str) -> std::result::Result<GlobMatcher, globset::Error> {
    GlobBuilder::new(glob)
        .backslash_escape(false)
        .build()
        .map(|g| g.compile_matcher())
}

/// Rewrite an `fnmatch` pattern as an equivalent `globset` glob.
fn fnmatch_to_glob(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut glob = String::with_capacity(pattern.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    glob.extend(&chars[i..=end]);
                    i = end;
                }
                None => glob.push_str("[[]"),
            },
            // A run of stars is one star; globset rejects a bare `**`.
            '*' if glob.ends_with('*') => {}
            c @ ('{' | '}' | ']') => {
                glob.push('[');
                glob.push(c);
                glob.push(']');
            }
            c => glob.push(c),
        }
        i += 1;
    }
    glob
}

/// Index of the `]` closing the class opened at `start`. A leading `!` and a
/// `]` right after the opening belong to the class.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    chars[j..].iter().position(|&c| c == ']').map(|p| j + p)
}

fn build_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ConfigError::InvalidPattern {
        pattern: patterns.join(", "),
        source,
    })
}

/// Compiled name and path ignore globs.
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    names: GlobSet,
    paths: GlobSet,
}

impl IgnoreSet {
    /// Invalid patterns are a configuration error, not skipped.
    pub fn new(names: &[String], paths: &[String]) -> Result<Self> {
        Ok(Self {
            names: build_set(names)?,
            paths: build_set(paths)?,
        })
    }

    pub fn empty() -> Self {
        Self {
            names: GlobSet::empty(),
            paths: GlobSet::empty(),
        }
    }
}

/// Per-pass hide policy.
#[derive(Debug, Clone, Copy)]
pub enum Visibility<'a> {
    /// Show-hidden mode: nothing is hidden.
    ShowAll,
    Filtered {
        ignored: &'a HashSet<PathBuf>,
        ignores: &'a IgnoreSet,
    },
}

impl<'a> Visibility<'a> {
    pub fn new(show_hidden: bool, ignores: &'a IgnoreSet, vc: &'a VCStatus) -> Self {
        if show_hidden {
            Visibility::ShowAll
        } else {
            Visibility::Filtered {
                ignored: &vc.ignored,
                ignores,
            }
        }
    }

    pub fn should_hide(&self, node: &Node) -> bool {
        match self {
            Visibility::ShowAll => false,
            Visibility::Filtered { ignored, ignores } => {
                ignored.contains(&node.path)
                    || ignores.names.is_match(&node.name)
                    || ignores.paths.is_match(&node.path)
            }
        }
    }
}
