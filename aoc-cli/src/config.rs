//! Configuration resolution from CLI args

use crate::cli::Args;
use std::path::{Path, PathBuf};

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Year filter (None = all years)
    pub year_filter: Option<u16>,
    /// Day filter (None = all days)
    pub day_filter: Option<u8>,
    /// Part filter (None = all parts)
    pub part_filter: Option<u8>,
    /// Tags to filter solvers
    pub tags: Vec<String>,
    /// Explicit input file overriding the input directory
    pub input_file: Option<PathBuf>,
    /// Directory searched for per-day input files
    pub input_dir: PathBuf,
    /// Quiet mode
    pub quiet: bool,
}

impl Config {
    /// Build config from CLI args, expanding `~` in paths
    pub fn from_args(args: Args) -> Self {
        Config {
            year_filter: args.year,
            day_filter: args.day,
            part_filter: args.part,
            tags: args.tags,
            input_file: args.input.as_deref().map(expand_tilde),
            input_dir: expand_tilde(&args.input_dir),
            quiet: args.quiet,
        }
    }

    /// Default log filter when `RUST_LOG` is unset
    pub fn log_filter(&self) -> &'static str {
        if self.quiet { "warn" } else { "info" }
    }
}

/// Expand ~ to home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str()
        && (path_str.starts_with("~/") || path_str == "~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path_str.get(2..).unwrap_or_default());
    }
    path.to_path_buf()
}
