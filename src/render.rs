//! Per-node line painting: status markers, icons, names, badges, and
//! byte-offset highlight spans.

use globset::GlobMatcher;
use std::collections::HashMap;
use std::path::{Path, MAIN_SEPARATOR};

use crate::error::Result;
use crate::highlight::HighlightResolver;
use crate::settings::{BadgeGroups, IconGlyphs, Settings};
use crate::tree::{glob_matcher, Index, Node, QuickFix, Selection, VCStatus};

/// Short annotation shown after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub text: String,
    pub group: String,
}

/// Highlight span over `line`, in UTF-8 byte offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub group: String,
    pub begin: usize,
    pub end: usize,
}

/// Display payload for one visible node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Render {
    pub line: String,
    pub badges: Vec<Badge>,
    pub highlights: Vec<Highlight>,
}

/// Escape embedded newlines so one node always occupies exactly one line.
pub(crate) fn escape_name(name: &str) -> String {
    name.replace('\n', "\\n")
}

/// Compiled, immutable painting tables.
#[derive(Debug, Clone)]
pub struct Decorations {
    icons: IconGlyphs,
    icon_globs: Vec<(GlobMatcher, String)>,
    ext_groups: HashMap<String, String>,
    badge_groups: BadgeGroups,
    use_icons: bool,
    resolver: HighlightResolver,
}

impl Decorations {
    pub fn new(settings: &Settings) -> Result<Self> {
        let icon_globs = settings
            .icons
            .name_glob
            .iter()
            .map(|rule| Ok((glob_matcher(&rule.pattern)?, rule.icon.clone())))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            icons: settings.icons.clone(),
            icon_globs,
            ext_groups: settings.highlights.exts.clone(),
            badge_groups: settings.highlights.groups.clone(),
            use_icons: settings.view.use_icons,
            resolver: HighlightResolver::new(&settings.hl_context)?,
        })
    }

    fn file_icon(&self, node: &Node) -> &str {
        if !self.use_icons {
            return &self.icons.default_icon;
        }
        let non_empty = |s: &&String| !s.is_empty();
        self.icons
            .name_exact
            .get(&node.name)
            .filter(non_empty)
            .or_else(|| self.icons.ext_exact.get(&node.ext).filter(non_empty))
            .or_else(|| {
                self.icon_globs
                    .iter()
                    .find(|(glob, _)| glob.is_match(&node.name))
                    .map(|(_, icon)| icon)
            })
            .unwrap_or(&self.icons.default_icon)
    }
}

/// Ambient per-pass state borrowed from the caller.
#[derive(Debug, Clone, Copy)]
pub struct PaintState<'a> {
    pub index: &'a Index,
    pub selection: &'a Selection,
    pub quickfix: &'a QuickFix,
    pub vc: &'a VCStatus,
    pub current: Option<&'a Path>,
}

/// Paints single nodes for one render pass.
pub struct Painter<'a> {
    decor: &'a Decorations,
    state: PaintState<'a>,
}

impl<'a> Painter<'a> {
    pub fn new(decor: &'a Decorations, state: PaintState<'a>) -> Self {
        Self { decor, state }
    }

    fn spacer(depth: usize) -> String {
        " ".repeat((depth * 2).saturating_sub(1))
    }

    fn status(&self, path: &Path) -> String {
        let icons = &self.decor.icons.status;
        let selected = if self.state.selection.contains(path) {
            icons.selected.as_str()
        } else {
            " "
        };
        let active = if self.state.current == Some(path) {
            icons.active.as_str()
        } else {
            " "
        };
        format!("{selected}{active}")
    }

    fn icon(&self, node: &Node) -> String {
        let glyph = if node.is_folder() {
            let folder = &self.decor.icons.folder;
            if self.state.index.contains(&node.path) {
                folder.open.as_str()
            } else {
                folder.closed.as_str()
            }
        } else {
            self.decor.file_icon(node)
        };
        format!(" {glyph} ")
    }

    fn name(&self, node: &Node) -> String {
        let mut name = escape_name(&node.name);
        if !self.decor.use_icons && node.is_folder() {
            name.push(MAIN_SEPARATOR);
        }
        name
    }

    fn decor_post(&self, node: &Node) -> String {
        let link = &self.decor.icons.link;
        if node.is_orphan_link() {
            format!(" {}", link.broken)
        } else if node.is_link() {
            format!(" {}", link.normal)
        } else {
            String::new()
        }
    }

    fn badges(&self, path: &Path) -> Vec<Badge> {
        let mut badges = Vec::new();
        let count = self.state.quickfix.count(path);
        if count > 0 {
            badges.push(Badge {
                text: format!("({count})"),
                group: self.decor.badge_groups.quickfix.clone(),
            });
        }
        if let Some(stat) = self.state.vc.status.get(path).filter(|s| !s.is_empty()) {
            badges.push(Badge {
                text: format!("[{stat}]"),
                group: self.decor.badge_groups.version_control.clone(),
            });
        }
        badges
    }

    /// Icon region gets the extension group; the name region, right after
    /// it, gets the tiered resolution.
    fn highlights(&self, node: &Node, pre: &str, icon: &str, name: &str) -> Vec<Highlight> {
        let mut highlights = Vec::new();
        let icon_begin = pre.len();
        let icon_end = icon_begin + icon.len();
        if let Some(group) = self.decor.ext_groups.get(&node.ext) {
            highlights.push(Highlight {
                group: group.clone(),
                begin: icon_begin,
                end: icon_end,
            });
        }
        if let Some(group) = self.decor.resolver.resolve(node) {
            highlights.push(Highlight {
                group: group.to_string(),
                begin: icon_end,
                end: icon_end + name.len(),
            });
        }
        highlights
    }

    pub fn paint(&self, node: &Node, depth: usize) -> Render {
        let pre = format!("{}{}", Self::spacer(depth), self.status(&node.path));
        let icon = self.icon(node);
        let name = self.name(node);
        let post = self.decor_post(node);

        let highlights = self.highlights(node, &pre, &icon, &name);
        Render {
            line: format!("{pre}{icon}{name}{post}"),
            badges: self.badges(&node.path),
            highlights,
        }
    }
}
