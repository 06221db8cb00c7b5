//! rewrite-imports library for migrating module-path references.
//!
//! This library rewrites flat module paths (e.g. `crate::app`) into their new
//! nested homes (e.g. `crate::core::app`) across a source tree. The workflow
//! has three phases:
//!
//! 1. **Rules**: Build an ordered [`MappingTable`] of pattern-to-replacement rules
//! 2. **Scanning**: Collect source files under a root, honoring the root-only exclusion
//! 3. **Rewriting**: Apply the table to each file and aggregate per-file results
//!
//! # Example
//!
//! ```no_run
//! use rewrite_imports::{report, rules::MappingTable, scanner, rewriter::Mode};
//! use std::path::Path;
//!
//! let table = MappingTable::builtin().unwrap();
//! let scan = scanner::collect_source_files(Path::new("./src"), &Default::default()).unwrap();
//! let run = report::run(&scan.files, &table, Mode::DryRun);
//!
//! println!("{} file(s) would change", run.summary.would_update);
//! ```

pub mod error;
pub mod report;
pub mod rewriter;
pub mod rules;
pub mod scanner;

// Re-export commonly used types at crate root
pub use error::{Result, RewriteError};
pub use report::{FileReport, RunReport, Status, Summary};
pub use rewriter::{FileOutcome, Mode};
pub use rules::{MappingTable, Rule};
