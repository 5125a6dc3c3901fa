//! Tree flattening: the render pass that turns a snapshot into display lines.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::error::Result;
use crate::render::{Decorations, PaintState, Painter, Render};
use crate::settings::Settings;
use crate::tree::{
    Comparator, FilterPattern, IgnoreSet, Index, NameFilter, Node, QuickFix, Selection, VCStatus,
    Visibility,
};

/// Output of one render pass. `lookup` and `rendered` are index-aligned.
#[derive(Debug, Clone)]
pub struct Derived<'a> {
    pub lookup: Vec<&'a Node>,
    pub paths_lookup: HashMap<PathBuf, usize>,
    pub rendered: Vec<Render>,
}

impl<'a> Derived<'a> {
    fn from_lines(lines: Vec<(&'a Node, Render)>) -> Self {
        let (lookup, rendered): (Vec<&'a Node>, Vec<Render>) = lines.into_iter().unzip();
        let mut paths_lookup = HashMap::with_capacity(lookup.len());
        for (idx, node) in lookup.iter().enumerate() {
            paths_lookup.insert(node.path.clone(), idx);
        }
        Self {
            lookup,
            paths_lookup,
            rendered,
        }
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Line number of `path`, if visible.
    pub fn index_of(&self, path: &Path) -> Option<usize> {
        self.paths_lookup.get(path).copied()
    }

    pub fn node_at(&self, idx: usize) -> Option<&'a Node> {
        self.lookup.get(idx).copied()
    }
}

/// Caller-owned state for one pass.
#[derive(Debug, Clone, Copy)]
pub struct ViewState<'a> {
    pub index: &'a Index,
    pub selection: &'a Selection,
    pub filter: Option<&'a FilterPattern>,
    pub quickfix: &'a QuickFix,
    pub vc: &'a VCStatus,
    pub show_hidden: bool,
    pub current: Option<&'a Path>,
}

/// Settings compiled for repeated render passes.
#[derive(Debug, Clone)]
pub struct View {
    comparator: Comparator,
    ignores: IgnoreSet,
    decorations: Decorations,
}

struct Pass<'p> {
    comparator: &'p Comparator,
    visibility: Visibility<'p>,
    filter: Option<NameFilter>,
    painter: Painter<'p>,
    keep_open: &'p Path,
}

impl View {
    pub fn new(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let view = Self {
            comparator: Comparator::new(&settings.view.sort_by),
            ignores: IgnoreSet::new(&settings.ignores.name, &settings.ignores.path)?,
            decorations: Decorations::new(settings)?,
        };
        debug!(
            sort_by = ?settings.view.sort_by,
            use_icons = settings.view.use_icons,
            "view settings compiled"
        );
        Ok(view)
    }

    /// Flatten `root` into display lines.
    pub fn render<'a>(&self, root: &'a Node, state: &ViewState<'_>) -> Derived<'a> {
        let filter = state.filter.map(|f| NameFilter::new(&f.pattern));
        let pass = Pass {
            comparator: &self.comparator,
            visibility: Visibility::new(state.show_hidden, &self.ignores, state.vc),
            filter,
            painter: Painter::new(
                &self.decorations,
                PaintState {
                    index: state.index,
                    selection: state.selection,
                    quickfix: state.quickfix,
                    vc: state.vc,
                    current: state.current,
                },
            ),
            keep_open: &root.path,
        };

        let mut lines = Vec::new();
        pass.walk(root, 0, false, &mut lines);
        let derived = Derived::from_lines(lines);
        debug!(
            root = %root.path.display(),
            lines = derived.len(),
            filtered = state.filter.is_some(),
            "render pass complete"
        );
        derived
    }
}

impl<'p> Pass<'p> {
    /// Pre-order walk. A node is emitted when it is clear, has an emitted
    /// descendant, or is the root; its line precedes its subtree.
    fn walk<'a>(
        &self,
        node: &'a Node,
        depth: usize,
        cleared: bool,
        out: &mut Vec<(&'a Node, Render)>,
    ) {
        let clear = cleared
            || self
                .filter
                .as_ref()
                .map_or(true, |filter| filter.is_match(&node.name));

        let mut subtree = Vec::new();
        if node.is_folder() {
            let mut children: Vec<&'a Node> = node
                .children
                .values()
                .filter(|child| {
                    let hide = self.visibility.should_hide(child);
                    if hide {
                        trace!(path = %child.path.display(), "hidden");
                    }
                    !hide
                })
                .collect();
            self.comparator.sort(&mut children);
            for child in children {
                self.walk(child, depth + 1, clear, &mut subtree);
            }
        }

        if clear || !subtree.is_empty() || node.path.as_path() == self.keep_open {
            out.push((node, self.painter.paint(node, depth)));
        }
        out.extend(subtree);
    }
}

/// One-shot render: compile `settings` and flatten `root`.
pub fn render<'a>(
    root: &'a Node,
    settings: &Settings,
    state: &ViewState<'_>,
) -> Result<Derived<'a>> {
    Ok(View::new(settings)?.render(root, state))
}
