#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use viewtree::settings::Settings;
use viewtree::tree::{FilterPattern, Index, Node, QuickFix, Selection, SortBy, VCStatus};
use viewtree::view::{Derived, ViewState};

/// Caller-side snapshots for one render pass.
#[derive(Default)]
pub struct Inputs {
    pub index: Index,
    pub selection: Selection,
    pub filter: Option<FilterPattern>,
    pub quickfix: QuickFix,
    pub vc: VCStatus,
    pub show_hidden: bool,
    pub current: Option<PathBuf>,
}

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn showing_hidden() -> Self {
        Self {
            show_hidden: true,
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, pattern: &str) -> Self {
        self.filter = Some(FilterPattern::new(pattern));
        self
    }

    pub fn state(&self) -> ViewState<'_> {
        ViewState {
            index: &self.index,
            selection: &self.selection,
            filter: self.filter.as_ref(),
            quickfix: &self.quickfix,
            vc: &self.vc,
            show_hidden: self.show_hidden,
            current: self.current.as_deref(),
        }
    }
}

/// Default settings with single-byte glyphs so expected lines are easy to write.
pub fn ascii_settings() -> Settings {
    let mut settings = Settings::default();
    settings.view.sort_by = vec![SortBy::IsFolder, SortBy::FileName];
    settings.icons.default_icon = "-".into();
    settings.icons.folder.open = "v".into();
    settings.icons.folder.closed = ">".into();
    settings.icons.link.normal = "->".into();
    settings.icons.link.broken = "-x".into();
    settings.icons.status.selected = "*".into();
    settings.icons.status.active = "@".into();
    settings
}

/// Paths of visible lines, in order.
pub fn paths_of(derived: &Derived<'_>) -> Vec<String> {
    derived
        .lookup
        .iter()
        .map(|n| n.path.display().to_string())
        .collect()
}

/// A small project-shaped tree rooted at `/r`.
///
/// ```text
/// /r
///   src/        main.rs  lib.rs  util/ (helpers.rs)
///   docs/       guide.md
///   .git/       HEAD
///   README.md
///   build.rs
/// ```
pub fn project_tree() -> Node {
    Node::folder("/r").with_children([
        Node::folder("/r/src").with_children([
            Node::file("/r/src/main.rs"),
            Node::file("/r/src/lib.rs"),
            Node::folder("/r/src/util").with_children([Node::file("/r/src/util/helpers.rs")]),
        ]),
        Node::folder("/r/docs").with_children([Node::file("/r/docs/guide.md")]),
        Node::folder("/r/.git").with_children([Node::file("/r/.git/HEAD")]),
        Node::file("/r/README.md"),
        Node::file("/r/build.rs"),
    ])
}

/// Every folder in `node`'s subtree, for use as an index.
pub fn all_folders(node: &Node) -> Index {
    let mut index = Index::new();
    collect_folders(node, &mut index);
    index
}

fn collect_folders(node: &Node, index: &mut Index) {
    if node.is_folder() {
        index.insert(node.path.clone());
    }
    for child in node.children.values() {
        collect_folders(child, index);
    }
}

/// Create a directory structure from a list of relative paths.
/// Paths ending with '/' create directories; others create empty files.
pub fn create_fixture(paths: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for p in paths {
        let full = tmp.path().join(p);
        if p.ends_with('/') {
            fs::create_dir_all(&full).unwrap();
        } else {
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&full, "").unwrap();
        }
    }
    tmp
}

/// Canonical fixture root (temp dirs can sit behind symlinks).
pub fn canonical_root(tmp: &TempDir) -> PathBuf {
    tmp.path().canonicalize().unwrap()
}

pub fn rel(root: &Path, p: &str) -> PathBuf {
    root.join(p)
}
