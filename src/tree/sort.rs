use serde::Deserialize;
use std::cmp::Ordering;
use std::str::FromStr;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::Node;
use crate::error::ConfigError;

/// Sibling ordering criteria, applied in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Folders before files.
    IsFolder,
    /// Collated extension.
    Ext,
    /// Collated name.
    FileName,
}

impl FromStr for SortBy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "is_folder" | "folder" => Ok(SortBy::IsFolder),
            "ext" => Ok(SortBy::Ext),
            "file_name" | "name" => Ok(SortBy::FileName),
            other => Err(ConfigError::UnknownSortKey(other.to_string())),
        }
    }
}

impl SortBy {
    /// Parse a comma-separated key list such as `is_folder,file_name`.
    pub fn parse_list(s: &str) -> Result<Vec<SortBy>, ConfigError> {
        s.split(',')
            .filter(|part| !part.trim().is_empty())
            .map(|part| part.parse::<SortBy>())
            .collect()
    }
}

/// Sort key approximating human collation.
///
/// Compares accent- and case-folded text first, then accents, then case
/// (lowercase before uppercase).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    base: String,
    accents: String,
    case: Vec<bool>,
}

pub fn collation_key(s: &str) -> CollationKey {
    let accents: String = s.nfkd().flat_map(char::to_lowercase).collect();
    let base = accents.chars().filter(|c| !is_combining_mark(*c)).collect();
    let case = s.chars().map(char::is_uppercase).collect();
    CollationKey {
        base,
        accents,
        case,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Projection {
    Rank(u8),
    Text(CollationKey),
}

const FOLDER_RANK: u8 = 0;
const FILE_RANK: u8 = 1;

/// Lexicographic comparator over the projections selected by a sort key list.
#[derive(Debug, Clone)]
pub struct Comparator {
    keys: Vec<SortBy>,
}

impl Comparator {
    pub fn new(keys: &[SortBy]) -> Self {
        Self {
            keys: keys.to_vec(),
        }
    }

    fn project(&self, node: &Node) -> Vec<Projection> {
        self.keys
            .iter()
            .map(|key| match key {
                SortBy::IsFolder => Projection::Rank(if node.is_folder() {
                    FOLDER_RANK
                } else {
                    FILE_RANK
                }),
                SortBy::Ext => Projection::Text(collation_key(&node.ext)),
                SortBy::FileName => Projection::Text(collation_key(&node.name)),
            })
            .collect()
    }

    pub fn compare(&self, a: &Node, b: &Node) -> Ordering {
        self.project(a).cmp(&self.project(b))
    }

    /// Stable sort; nodes with equal projections keep their incoming order.
    pub fn sort(&self, nodes: &mut [&Node]) {
        nodes.sort_by_cached_key(|node| self.project(node));
    }
}
