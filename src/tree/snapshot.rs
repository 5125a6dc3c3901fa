use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::{Index, Mode, Node};

/// Capture an immutable snapshot of `root`.
///
/// Children are materialized for the root and for every folder in `index`;
/// collapsed folders are not descended into. An open symlinked folder lists
/// its target's entries under the link's own path; links are never followed
/// further than the index reaches. Entries that cannot be read are logged and
/// skipped.
pub fn build_snapshot(root: &Path, index: &Index) -> io::Result<Node> {
    let root_meta = fs::symlink_metadata(root)?;
    let root_node = Node::new(root, classify(root, &root_meta));

    let mut walker = WalkDir::new(root)
        .follow_links(false)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter();

    // Pre-order entries, folded onto a stack of open ancestors.
    let mut stack: Vec<Node> = vec![root_node];
    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(path = ?e.path(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let meta = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "skipping entry without metadata");
                continue;
            }
        };
        // Collapsed folders are listed but never descended into.
        if meta.is_dir() && !index.contains(entry.path()) {
            walker.skip_current_dir();
        }
        let depth = entry.depth();
        while stack.len() > depth {
            attach_top(&mut stack);
        }
        let mut node = Node::new(entry.path(), classify(entry.path(), &meta));
        if node.is_link() && node.is_folder() && index.contains(entry.path()) {
            match build_snapshot(entry.path(), index) {
                Ok(target) => node.children = target.children,
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "cannot list linked folder")
                }
            }
        }
        stack.push(node);
    }
    while stack.len() > 1 {
        attach_top(&mut stack);
    }

    let root_node = stack.pop().unwrap_or_else(|| Node::new(root, []));
    debug!(root = %root.display(), open = index.len(), "snapshot captured");
    Ok(root_node)
}

fn attach_top(stack: &mut Vec<Node>) {
    if let Some(node) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.children.insert(node.path.clone(), node);
        }
    }
}

/// Mode tags for an entry, from its `symlink_metadata`.
fn classify(path: &Path, meta: &Metadata) -> Vec<Mode> {
    let mut modes = Vec::new();
    let target = if meta.file_type().is_symlink() {
        modes.push(Mode::Link);
        match fs::metadata(path) {
            Ok(t) => Some(t),
            Err(_) => {
                modes.push(Mode::OrphanLink);
                None
            }
        }
    } else {
        Some(meta.clone())
    };

    if let Some(target) = target {
        if target.is_dir() {
            modes.push(Mode::Folder);
        }
        modes.extend(unix_modes(&target));
    }
    modes
}

#[cfg(unix)]
fn unix_modes(meta: &Metadata) -> Vec<Mode> {
    use std::os::unix::fs::{FileTypeExt, PermissionsExt};

    const STICKY: u32 = 0o1000;
    const OTHER_WRITE: u32 = 0o002;
    const EXEC_ANY: u32 = 0o111;

    let bits = meta.permissions().mode();
    let ft = meta.file_type();
    let mut modes = Vec::new();
    if ft.is_dir() {
        match (bits & STICKY != 0, bits & OTHER_WRITE != 0) {
            (true, true) => modes.push(Mode::StickyWritable),
            (true, false) => modes.push(Mode::StickyDir),
            (false, true) => modes.push(Mode::OtherWritable),
            (false, false) => {}
        }
    } else if ft.is_fifo() {
        modes.push(Mode::Pipe);
    } else if ft.is_socket() {
        modes.push(Mode::Socket);
    } else if ft.is_block_device() {
        modes.push(Mode::BlockDevice);
    } else if ft.is_char_device() {
        modes.push(Mode::CharDevice);
    } else if bits & EXEC_ANY != 0 {
        modes.push(Mode::Executable);
    }
    modes
}

#[cfg(not(unix))]
fn unix_modes(_meta: &Metadata) -> Vec<Mode> {
    Vec::new()
}

/// Resolve user-supplied paths against the snapshot root.
pub fn resolve_under(root: &Path, paths: &[PathBuf]) -> Vec<PathBuf> {
    paths
        .iter()
        .map(|p| if p.is_absolute() { p.clone() } else { root.join(p) })
        .collect()
}
