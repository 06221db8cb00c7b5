//! Command-line interface definitions.
//!
//! A single command: rewrite every matching file under a root directory
//! using the built-in mapping table, optionally extended or replaced by
//! `--map` entries and a JSON rules file.

use clap::Parser;
use rewrite_imports::rules::parse_mapping;
use std::path::PathBuf;

/// Rewrite flat module-path references into their nested homes.
#[derive(Debug, Parser)]
#[command(name = "rewrite-imports", author, version, about)]
pub struct Args {
    /// Root directory to rewrite.
    #[arg(required_unless_present = "print_rules")]
    pub root: Option<PathBuf>,

    /// Only files whose names end with this suffix are rewritten.
    #[arg(long, default_value = ".rs")]
    pub extension: String,

    /// Report what would change without writing any file.
    #[arg(long)]
    pub dry_run: bool,

    /// File name skipped when it sits directly in the root (it is still
    /// rewritten in subdirectories).
    #[arg(long, value_name = "NAME", default_value = "main.rs")]
    pub skip_root_file: String,

    /// Disable the root-only file exclusion.
    #[arg(long)]
    pub no_skip: bool,

    /// Extra literal mappings in `old=new` format, applied after the other rules.
    #[arg(long = "map", value_name = "OLD=NEW", value_parser = parse_mapping)]
    pub mappings: Vec<(String, String)>,

    /// JSON file holding `[{ "pattern": ..., "replacement": ... }]` regex rules.
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Do not include the built-in mapping table.
    #[arg(long)]
    pub no_default_rules: bool,

    /// Glob patterns for directories/files to exclude (e.g., "target", "*_generated.rs").
    /// By default, entries starting with `.` are excluded.
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// Disable default exclusion of `.` prefixed entries.
    #[arg(long)]
    pub no_default_excludes: bool,

    /// Interactively confirm each file's changes before writing.
    #[arg(short, long, conflicts_with_all = ["dry_run", "json"])]
    pub interactive: bool,

    /// List the files that would be scanned without processing them.
    #[arg(long)]
    pub list_files: bool,

    /// Print the effective mapping table and exit.
    #[arg(long)]
    pub print_rules: bool,

    /// Emit JSON instead of human-readable output: the run report, or the
    /// rule table in rules-file form with --print-rules.
    #[arg(long)]
    pub json: bool,

    /// Print additional diagnostics to stderr and changed lines to stdout.
    #[arg(short, long)]
    pub verbose: bool,
}
