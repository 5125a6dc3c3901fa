use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

/// Parse `PATH=VALUE`, splitting at the last `=`.
fn parse_pair<T>(s: &str) -> Result<(PathBuf, T), String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let (path, value) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected PATH=VALUE, got {s:?}"))?;
    let value = value.parse::<T>().map_err(|e| format!("{value:?}: {e}"))?;
    Ok((PathBuf::from(path), value))
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "viewtree",
    version,
    about = "Render a file tree the way a tree-view sidebar shows it",
    after_help = "Examples:\n  viewtree -o src --sort is_folder,file_name\n  viewtree --filter '*.rs' -o src -o src/bin\n  viewtree --config viewtree.toml --vc src/main.rs=M --badges"
)]
pub struct Args {
    /// Root directory (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Folders to expand, relative to the root (repeatable)
    #[arg(short = 'o', long = "open", action = clap::ArgAction::Append)]
    pub open: Vec<PathBuf>,

    /// Paths to mark as selected (repeatable)
    #[arg(short = 's', long = "select", action = clap::ArgAction::Append)]
    pub select: Vec<PathBuf>,

    /// Path to mark as the cursor line
    #[arg(short = 'c', long = "current")]
    pub current: Option<PathBuf>,

    /// Only show names matching this glob, plus their ancestors
    #[arg(short = 'f', long = "filter")]
    pub filter: Option<String>,

    /// Comma-separated sort keys: is_folder, ext, file_name
    #[arg(long = "sort")]
    pub sort: Option<String>,

    /// Settings file (TOML)
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Show entries hidden by ignore rules
    #[arg(short = 'a', long = "all")]
    pub show_hidden: bool,

    /// Use the default icon for every file
    #[arg(long = "no-icons")]
    pub no_icons: bool,

    /// Version-control status for a path, as PATH=CODE (repeatable)
    #[arg(long = "vc", value_name = "PATH=CODE", value_parser = parse_pair::<String>)]
    pub vc: Vec<(PathBuf, String)>,

    /// Quickfix location count for a path, as PATH=COUNT (repeatable)
    #[arg(long = "qf", value_name = "PATH=COUNT", value_parser = parse_pair::<usize>)]
    pub qf: Vec<(PathBuf, usize)>,

    /// Append quickfix/version-control badges to each line
    #[arg(long = "badges")]
    pub badges: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Log filter directive for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}
