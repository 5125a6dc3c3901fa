#![forbid(unsafe_code)]
//! ViewTree: flattens a file tree snapshot into display lines for a
//! text-based tree view, with icons, badges, byte-offset highlight spans, and
//! a path-to-line index.

pub mod buffer;
pub mod cli;
pub mod error;
pub mod highlight;
pub mod render;
pub mod settings;
pub mod tree;
pub mod view;

pub use error::{ConfigError, Result};
pub use view::{render, Derived, View, ViewState};
