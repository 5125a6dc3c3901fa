use std::path::PathBuf;

use thiserror::Error;

/// Result alias for settings compilation and render passes.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration errors. These abort a render pass before any line is produced.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A sort key outside the closed `is_folder` / `ext` / `file_name` set.
    #[error("unknown sort key: {0:?}")]
    UnknownSortKey(String),

    /// A glob that failed to compile (ignore lists, icon/highlight tables, filter).
    #[error("invalid glob pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// The same mode listed twice in one highlight tier.
    #[error("mode {mode} listed more than once in {table}")]
    DuplicateModeKey { table: &'static str, mode: String },

    /// A highlight table entry that maps to an empty group name.
    #[error("empty highlight group for {key:?} in {table}")]
    EmptyGroup { table: &'static str, key: String },

    /// Malformed settings file.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// Settings file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
