mod common;

use common::{ascii_settings, canonical_root, create_fixture, paths_of, Inputs};
use std::fs;
use std::path::PathBuf;
use viewtree::buffer::{line_to_plain_text, to_lines, to_text, Palette};
use viewtree::tree::{build_snapshot, Index, Mode, Node, SortBy};
use viewtree::view::{render, View};

// --- Permission Denied ---

#[test]
#[cfg(unix)]
fn test_permission_denied_subdirectory() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = create_fixture(&["forbidden/", "forbidden/secret.txt", "open.txt"]);
    let root = canonical_root(&tmp);
    let forbidden = root.join("forbidden");
    fs::set_permissions(&forbidden, fs::Permissions::from_mode(0o000)).unwrap();
    // Privileged users can still read the folder.
    let enforced = fs::read_dir(&forbidden).is_err();

    let index: Index = [forbidden.clone()].into_iter().collect();
    let snap = build_snapshot(&root, &index).unwrap();
    let inputs = Inputs::new();
    let d = render(&snap, &ascii_settings(), &inputs.state()).unwrap();

    assert!(d.index_of(&forbidden).is_some(), "folder itself is listed");
    assert!(d.index_of(&root.join("open.txt")).is_some());
    if enforced {
        assert!(d.index_of(&forbidden.join("secret.txt")).is_none());
    }

    fs::set_permissions(&forbidden, fs::Permissions::from_mode(0o755)).unwrap();
}

// --- Symlinks ---

#[test]
#[cfg(unix)]
fn test_symlink_loop_stops_at_index() {
    let tmp = create_fixture(&["a/", "a/b/"]);
    let root = canonical_root(&tmp);
    std::os::unix::fs::symlink(root.join("a"), root.join("a/b/loop")).unwrap();

    let index: Index = [root.join("a"), root.join("a/b"), root.join("a/b/loop")]
        .into_iter()
        .collect();
    let snap = build_snapshot(&root, &index).unwrap();
    let inputs = Inputs::new();
    let d = render(&snap, &ascii_settings(), &inputs.state()).unwrap();
    // The open link lists its target once; its `b` is not in the index.
    assert_eq!(d.len(), 5);

    let looped = d.node_at(3).unwrap();
    assert!(looped.is_link());
    assert!(looped.is_folder());
    assert_eq!(looped.children.len(), 1);

    let inner = d.node_at(4).unwrap();
    assert_eq!(inner.path, root.join("a/b/loop/b"));
    assert!(inner.is_folder());
    assert!(inner.children.is_empty());
}

#[test]
#[cfg(unix)]
fn test_orphan_link_is_tagged_and_decorated() {
    let tmp = create_fixture(&[]);
    let root = canonical_root(&tmp);
    std::os::unix::fs::symlink(root.join("missing"), root.join("dangling")).unwrap();

    let snap = build_snapshot(&root, &Index::new()).unwrap();
    let node = &snap.children[&root.join("dangling")];
    assert!(node.mode.contains(&Mode::OrphanLink));
    assert!(node.mode.contains(&Mode::Link));

    let inputs = Inputs::new();
    let d = render(&snap, &ascii_settings(), &inputs.state()).unwrap();
    let line = &d.rendered[1];
    assert_eq!(line.line, "    - dangling -x");
    assert_eq!(line.highlights[0].group, "TreeOrphanLink");
}

// --- Degenerate trees ---

#[test]
fn test_empty_root_directory() {
    let tmp = create_fixture(&[]);
    let root = canonical_root(&tmp);
    let snap = build_snapshot(&root, &Index::new()).unwrap();
    let inputs = Inputs::new();
    let d = render(&snap, &ascii_settings(), &inputs.state()).unwrap();
    assert_eq!(d.len(), 1);
    assert_eq!(d.index_of(&root), Some(0));
}

#[test]
fn test_nested_empty_directories() {
    let tmp = create_fixture(&["a/b/c/"]);
    let root = canonical_root(&tmp);
    let index: Index = [root.join("a"), root.join("a/b")].into_iter().collect();
    let snap = build_snapshot(&root, &index).unwrap();
    let inputs = Inputs::new();
    let d = render(&snap, &ascii_settings(), &inputs.state()).unwrap();
    let names: Vec<&str> = d.lookup.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(&names[1..], &["a", "b", "c"]);
}

#[test]
fn test_file_root() {
    let root = Node::file("/lonely.txt");
    let inputs = Inputs::new().with_filter("*.md");
    let d = render(&root, &ascii_settings(), &inputs.state()).unwrap();
    assert_eq!(paths_of(&d), vec!["/lonely.txt"]);
}

#[test]
fn test_deep_tree() {
    let depth = 64;
    let mut path = PathBuf::from("/r");
    let mut chain = Vec::new();
    for i in 0..depth {
        path.push(format!("d{i}"));
        chain.push(path.clone());
    }
    let mut node = Node::file(chain[depth - 1].join("leaf.txt"));
    for dir in chain.iter().rev() {
        node = Node::folder(dir.clone()).with_children([node]);
    }
    let root = Node::folder("/r").with_children([node]);

    let inputs = Inputs::new().with_filter("leaf.txt");
    let d = render(&root, &ascii_settings(), &inputs.state()).unwrap();
    assert_eq!(d.len(), depth + 2);
    let leaf = d.rendered.last().unwrap();
    let spacer = 2 * (depth + 1) - 1;
    assert_eq!(leaf.line, format!("{}   - leaf.txt", " ".repeat(spacer)));
}

// --- Names ---

#[test]
fn test_entry_with_special_characters() {
    let tmp = create_fixture(&["caf\u{e9}.txt", "\u{65e5}\u{672c}\u{8a9e}.md", "emoji-\u{1f389}.txt"]);
    let root = canonical_root(&tmp);
    let snap = build_snapshot(&root, &Index::new()).unwrap();
    let inputs = Inputs::new();
    let d = render(&snap, &ascii_settings(), &inputs.state()).unwrap();
    let names: Vec<&str> = d.lookup.iter().map(|n| n.name.as_str()).collect();
    assert!(names.contains(&"caf\u{e9}.txt"));
    assert!(names.contains(&"\u{65e5}\u{672c}\u{8a9e}.md"));
    assert!(names.contains(&"emoji-\u{1f389}.txt"));

    let lines = to_lines(&d, &Palette::terminal_default());
    for (line, r) in lines.iter().zip(&d.rendered) {
        assert_eq!(line_to_plain_text(line), r.line);
    }
}

#[test]
fn test_accents_and_case_collate_together() {
    let root = Node::folder("/r").with_children([
        Node::file("/r/caf\u{e9}.txt"),
        Node::file("/r/Cafe.txt"),
        Node::file("/r/cafe.txt"),
        Node::file("/r/cab.txt"),
        Node::file("/r/Cad.txt"),
    ]);
    let mut settings = ascii_settings();
    settings.view.sort_by = vec![SortBy::FileName];
    let inputs = Inputs::new();
    let d = render(&root, &settings, &inputs.state()).unwrap();
    let names: Vec<&str> = d.lookup[1..].iter().map(|n| n.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["cab.txt", "Cad.txt", "cafe.txt", "Cafe.txt", "caf\u{e9}.txt"]
    );
}

#[test]
fn test_uppercase_extension_is_lowercased() {
    let mut settings = ascii_settings();
    settings.icons.ext_exact.insert("png".into(), "P".into());
    let root = Node::folder("/r").with_children([Node::file("/r/SHOT.PNG")]);
    let inputs = Inputs::new();
    let d = render(&root, &settings, &inputs.state()).unwrap();
    assert_eq!(d.rendered[1].line, "    P SHOT.PNG");
}

// --- Large Directory ---

#[test]
fn test_large_directory() {
    let names: Vec<String> = (0..500).map(|i| format!("file_{i:04}.txt")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let tmp = create_fixture(&refs);
    let root = canonical_root(&tmp);

    let snap = build_snapshot(&root, &Index::new()).unwrap();
    assert_eq!(snap.children.len(), 500);

    let view = View::new(&ascii_settings()).unwrap();
    let inputs = Inputs::new();
    let d = view.render(&snap, &inputs.state());
    assert_eq!(d.len(), 501);
    assert!(to_text(&d).lines().nth(1).unwrap().ends_with("file_0000.txt"));
    assert!(to_text(&d).ends_with("file_0499.txt"));
}
