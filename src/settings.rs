//! View settings: icon glyphs, highlight tables, sort keys, and ignore lists.
//!
//! Settings are an immutable value handed to every render pass. They are
//! loaded from TOML; every section falls back to built-in defaults, so a
//! partial file only overrides what it names.
//!
//! ```toml
//! [view]
//! sort_by = ["is_folder", "file_name"]
//! use_icons = true
//!
//! [[hl_context.mode_post]]
//! mode = "link"
//! group = "TreeLink"
//! ```

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::tree::{Mode, SortBy};

// ── Sections ─────────────────────────────────────────────────────────────────

/// Ordering and icon toggles.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub sort_by: Vec<SortBy>,
    /// When false, files get the default icon and folder names a trailing separator.
    pub use_icons: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            sort_by: vec![SortBy::IsFolder, SortBy::Ext, SortBy::FileName],
            use_icons: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FolderIcons {
    pub open: String,
    pub closed: String,
}

impl Default for FolderIcons {
    fn default() -> Self {
        Self {
            open: "\u{25be}".to_string(),   // ▾
            closed: "\u{25b8}".to_string(), // ▸
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LinkIcons {
    pub normal: String,
    pub broken: String,
}

impl Default for LinkIcons {
    fn default() -> Self {
        Self {
            normal: "\u{21e2}".to_string(), // ⇢
            broken: "\u{21cf}".to_string(), // ⇏
        }
    }
}

/// Single-glyph line markers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatusIcons {
    pub selected: String,
    pub active: String,
}

impl Default for StatusIcons {
    fn default() -> Self {
        Self {
            selected: "\u{2713}".to_string(), // ✓
            active: "\u{25b6}".to_string(),   // ▶
        }
    }
}

/// An ordered glob rule mapping a name pattern to an icon.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GlobIcon {
    pub pattern: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IconGlyphs {
    pub default_icon: String,
    pub folder: FolderIcons,
    pub link: LinkIcons,
    pub status: StatusIcons,
    /// Keyed by lowercased extension without the dot.
    pub ext_exact: HashMap<String, String>,
    pub name_exact: HashMap<String, String>,
    /// Tested in order; first match wins.
    pub name_glob: Vec<GlobIcon>,
}

impl Default for IconGlyphs {
    fn default() -> Self {
        Self {
            default_icon: "-".to_string(),
            folder: FolderIcons::default(),
            link: LinkIcons::default(),
            status: StatusIcons::default(),
            ext_exact: HashMap::new(),
            name_exact: HashMap::new(),
            name_glob: Vec::new(),
        }
    }
}

/// Highlight groups attached to badges.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BadgeGroups {
    pub quickfix: String,
    pub version_control: String,
}

impl Default for BadgeGroups {
    fn default() -> Self {
        Self {
            quickfix: "TreeQuickFix".to_string(),
            version_control: "TreeVersionControl".to_string(),
        }
    }
}

/// Icon-region highlights and badge groups.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HighlightSettings {
    /// Extension to group, applied to the icon region.
    pub exts: HashMap<String, String>,
    pub groups: BadgeGroups,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModeGroup {
    pub mode: Mode,
    pub group: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GlobGroup {
    pub pattern: String,
    pub group: String,
}

/// Tables driving name-region highlight resolution.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HlContext {
    /// Consulted before extension and name rules.
    pub mode_pre: Vec<ModeGroup>,
    /// Consulted after extension and name rules.
    pub mode_post: Vec<ModeGroup>,
    /// Final fallback for nodes no tier matched.
    pub mode_default: Option<String>,
    pub ext_lookup: HashMap<String, String>,
    pub name_lookup: Vec<GlobGroup>,
}

fn mode_group(mode: Mode, group: &str) -> ModeGroup {
    ModeGroup {
        mode,
        group: group.to_string(),
    }
}

impl Default for HlContext {
    fn default() -> Self {
        Self {
            mode_pre: vec![
                mode_group(Mode::OtherWritable, "TreeOtherWritable"),
                mode_group(Mode::StickyWritable, "TreeStickyWritable"),
            ],
            mode_post: vec![
                mode_group(Mode::OrphanLink, "TreeOrphanLink"),
                mode_group(Mode::Link, "TreeLink"),
                mode_group(Mode::Folder, "TreeFolder"),
                mode_group(Mode::Executable, "TreeExecutable"),
                mode_group(Mode::StickyDir, "TreeStickyDir"),
                mode_group(Mode::Pipe, "TreePipe"),
                mode_group(Mode::Socket, "TreeSocket"),
                mode_group(Mode::BlockDevice, "TreeBlockDevice"),
                mode_group(Mode::CharDevice, "TreeCharDevice"),
                mode_group(Mode::Door, "TreeDoor"),
            ],
            mode_default: None,
            ext_lookup: HashMap::new(),
            name_lookup: Vec::new(),
        }
    }
}

/// Ignore globs matched against node names and full paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Ignores {
    pub name: Vec<String>,
    pub path: Vec<String>,
}

impl Default for Ignores {
    fn default() -> Self {
        Self {
            name: [".DS_Store", ".directory", "thumbs.db", ".git"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            path: Vec::new(),
        }
    }
}

// ── Top-level settings ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub view: ViewSettings,
    pub icons: IconGlyphs,
    pub highlights: HighlightSettings,
    pub hl_context: HlContext,
    pub ignores: Ignores,
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and validate a settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Reject inconsistent highlight tables.
    ///
    /// Glob syntax is checked when the tables are compiled.
    pub fn validate(&self) -> Result<()> {
        check_modes("hl_context.mode_pre", &self.hl_context.mode_pre)?;
        check_modes("hl_context.mode_post", &self.hl_context.mode_post)?;
        if let Some(group) = &self.hl_context.mode_default {
            check_group("hl_context.mode_default", "", group)?;
        }
        for (ext, group) in &self.hl_context.ext_lookup {
            check_group("hl_context.ext_lookup", ext, group)?;
        }
        for rule in &self.hl_context.name_lookup {
            check_group("hl_context.name_lookup", &rule.pattern, &rule.group)?;
        }
        for (ext, group) in &self.highlights.exts {
            check_group("highlights.exts", ext, group)?;
        }
        check_group("highlights.groups", "quickfix", &self.highlights.groups.quickfix)?;
        check_group(
            "highlights.groups",
            "version_control",
            &self.highlights.groups.version_control,
        )?;
        Ok(())
    }
}

fn check_modes(table: &'static str, entries: &[ModeGroup]) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.mode) {
            return Err(ConfigError::DuplicateModeKey {
                table,
                mode: entry.mode.to_string(),
            });
        }
        check_group(table, entry.mode.as_str(), &entry.group)?;
    }
    Ok(())
}

fn check_group(table: &'static str, key: &str, group: &str) -> Result<()> {
    if group.trim().is_empty() {
        return Err(ConfigError::EmptyGroup {
            table,
            key: key.to_string(),
        });
    }
    Ok(())
}
