//! Tree snapshot types, sibling ordering, and visibility filtering.

mod filter;
mod snapshot;
mod sort;

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

pub use filter::{glob_matcher, IgnoreSet, NameFilter, Visibility};
pub use snapshot::{build_snapshot, resolve_under};
pub use sort::{collation_key, CollationKey, Comparator, SortBy};

/// Filesystem mode tags.
///
/// Declaration order is the fixed order in which a node's tags are scanned
/// during highlight resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    OrphanLink,
    Link,
    Folder,
    Executable,
    StickyDir,
    OtherWritable,
    StickyWritable,
    Pipe,
    Socket,
    BlockDevice,
    CharDevice,
    Door,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::OrphanLink => "orphan_link",
            Mode::Link => "link",
            Mode::Folder => "folder",
            Mode::Executable => "executable",
            Mode::StickyDir => "sticky_dir",
            Mode::OtherWritable => "other_writable",
            Mode::StickyWritable => "sticky_writable",
            Mode::Pipe => "pipe",
            Mode::Socket => "socket",
            Mode::BlockDevice => "block_device",
            Mode::CharDevice => "char_device",
            Mode::Door => "door",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One filesystem entry in an immutable tree snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Absolute path; unique across the snapshot.
    pub path: PathBuf,
    /// Basename.
    pub name: String,
    /// Lowercased extension without the dot, or empty.
    pub ext: String,
    pub mode: BTreeSet<Mode>,
    /// Materialized children, keyed by path. Empty for files and collapsed folders.
    pub children: BTreeMap<PathBuf, Node>,
}

impl Node {
    /// Create a node, deriving `name` and `ext` from the path.
    ///
    /// Non-UTF-8 components are converted lossily so one bad name never
    /// poisons a render pass.
    pub fn new(path: impl Into<PathBuf>, mode: impl IntoIterator<Item = Mode>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        let ext = Path::new(&name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        Self {
            path,
            name,
            ext,
            mode: mode.into_iter().collect(),
            children: BTreeMap::new(),
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(path, [])
    }

    pub fn folder(path: impl Into<PathBuf>) -> Self {
        Self::new(path, [Mode::Folder])
    }

    /// Attach children, replacing any with the same path.
    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        for child in children {
            self.children.insert(child.path.clone(), child);
        }
        self
    }

    pub fn is_folder(&self) -> bool {
        self.mode.contains(&Mode::Folder)
    }

    pub fn is_link(&self) -> bool {
        self.mode.contains(&Mode::Link)
    }

    pub fn is_orphan_link(&self) -> bool {
        self.mode.contains(&Mode::OrphanLink)
    }
}

/// Folder paths currently expanded.
pub type Index = HashSet<PathBuf>;

/// Paths marked by the user.
pub type Selection = HashSet<PathBuf>;

/// Tool-reported location counts per path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuickFix {
    pub locations: HashMap<PathBuf, usize>,
}

impl QuickFix {
    pub fn count(&self, path: &Path) -> usize {
        self.locations.get(path).copied().unwrap_or(0)
    }
}

/// Version-control snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VCStatus {
    pub ignored: HashSet<PathBuf>,
    /// Short status codes such as `M` or `A`.
    pub status: HashMap<PathBuf, String>,
}

/// Active name filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPattern {
    pub pattern: String,
}

impl FilterPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }
}
