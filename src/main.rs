#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write as _;
use tracing_subscriber::EnvFilter;

use viewtree::buffer::{to_text, to_text_with_badges};
use viewtree::cli::Args;
use viewtree::settings::Settings;
use viewtree::tree::{
    build_snapshot, resolve_under, FilterPattern, Index, QuickFix, Selection, SortBy, VCStatus,
};
use viewtree::view::{View, ViewState};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("viewtree: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_app() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    let root = args
        .path
        .canonicalize()
        .with_context(|| format!("{}: failed to resolve path", args.path.display()))?;
    anyhow::ensure!(root.is_dir(), "{}: Not a directory", root.display());

    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(keys) = &args.sort {
        settings.view.sort_by = SortBy::parse_list(keys)?;
    }
    if args.no_icons {
        settings.view.use_icons = false;
    }
    let view = View::new(&settings).context("invalid settings")?;

    let mut index: Index = resolve_under(&root, &args.open).into_iter().collect();
    index.insert(root.clone());
    let selection: Selection = resolve_under(&root, &args.select).into_iter().collect();
    let current = args
        .current
        .as_ref()
        .and_then(|p| resolve_under(&root, std::slice::from_ref(p)).pop());
    let filter = args.filter.as_deref().map(FilterPattern::new);

    let snapshot = build_snapshot(&root, &index)
        .with_context(|| format!("{}: failed to read tree", root.display()))?;

    let quickfix = QuickFix {
        locations: args
            .qf
            .iter()
            .map(|(p, n)| (root.join(p), *n))
            .collect(),
    };
    let vc = VCStatus {
        ignored: Default::default(),
        status: args
            .vc
            .iter()
            .map(|(p, code)| (root.join(p), code.clone()))
            .collect(),
    };
    let state = ViewState {
        index: &index,
        selection: &selection,
        filter: filter.as_ref(),
        quickfix: &quickfix,
        vc: &vc,
        show_hidden: args.show_hidden,
        current: current.as_deref(),
    };
    let derived = view.render(&snapshot, &state);

    let text = if args.badges {
        to_text_with_badges(&derived)
    } else {
        to_text(&derived)
    };
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}").context("failed to write output")?;
    Ok(())
}
