//! Tiered highlight-group resolution for node names.

use globset::GlobMatcher;
use std::collections::HashMap;

use crate::error::Result;
use crate::settings::HlContext;
use crate::tree::{glob_matcher, Mode, Node};

/// Compiled lookup tiers from an [`HlContext`].
///
/// Resolution order, first hit wins:
/// 1. node modes (in `Mode` order) against `mode_pre`
/// 2. exact extension
/// 3. name globs, in configured order
/// 4. node modes against `mode_post`
/// 5. the untagged `mode_default`
#[derive(Debug, Clone)]
pub struct HighlightResolver {
    mode_pre: Vec<(Mode, String)>,
    mode_post: Vec<(Mode, String)>,
    mode_default: Option<String>,
    ext_lookup: HashMap<String, String>,
    name_lookup: Vec<(GlobMatcher, String)>,
}

fn lookup(table: &[(Mode, String)], mode: Mode) -> Option<&str> {
    table
        .iter()
        .find(|(m, _)| *m == mode)
        .map(|(_, group)| group.as_str())
}

impl HighlightResolver {
    pub fn new(ctx: &HlContext) -> Result<Self> {
        let name_lookup = ctx
            .name_lookup
            .iter()
            .map(|rule| Ok((glob_matcher(&rule.pattern)?, rule.group.clone())))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            mode_pre: ctx
                .mode_pre
                .iter()
                .map(|e| (e.mode, e.group.clone()))
                .collect(),
            mode_post: ctx
                .mode_post
                .iter()
                .map(|e| (e.mode, e.group.clone()))
                .collect(),
            mode_default: ctx.mode_default.clone(),
            ext_lookup: ctx.ext_lookup.clone(),
            name_lookup,
        })
    }

    pub fn resolve(&self, node: &Node) -> Option<&str> {
        if let Some(group) = node.mode.iter().find_map(|m| lookup(&self.mode_pre, *m)) {
            return Some(group);
        }
        if let Some(group) = self.ext_lookup.get(&node.ext) {
            return Some(group.as_str());
        }
        if let Some((_, group)) = self
            .name_lookup
            .iter()
            .find(|(glob, _)| glob.is_match(&node.name))
        {
            return Some(group.as_str());
        }
        if let Some(group) = node.mode.iter().find_map(|m| lookup(&self.mode_post, *m)) {
            return Some(group);
        }
        self.mode_default.as_deref()
    }
}
