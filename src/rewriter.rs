//! File rewriting for applying a mapping table.
//!
//! Content is transformed in memory by running every rule of the table over
//! the whole text in table order. A file is written back in full only when
//! the transformed text differs from what was read; unchanged files are never
//! touched.

use crate::error::{Result, RewriteError};
use crate::rules::MappingTable;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Whether changed files are written or only reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Write,
    DryRun,
}

/// Result of running a table over a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub content: String,
    /// Total matches replaced across all rules.
    pub replacements: usize,
}

/// A line whose text differs after rewriting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineChange {
    /// Line number, 1-indexed.
    pub line: usize,
    pub before: String,
    pub after: String,
}

/// Applies the rules of `table` to `content` in the given sequence order.
///
/// Each rule replaces every non-overlapping match across the whole text and
/// sees the output of the rules before it.
pub fn rewrite_content(content: &str, table: &MappingTable) -> Rewrite {
    let mut current = content.to_string();
    let mut replacements = 0;

    for rule in table.rules() {
        let (next, count) = rule.apply(&current);
        if count > 0 {
            replacements += count;
            current = next.into_owned();
        }
    }

    Rewrite {
        content: current,
        replacements,
    }
}

/// Lists the lines that differ between `before` and `after`.
///
/// Only meaningful when rewriting kept the line structure; if the line
/// counts differ, no per-line detail is produced.
pub fn changed_lines(before: &str, after: &str) -> Vec<LineChange> {
    if before.lines().count() != after.lines().count() {
        return Vec::new();
    }

    before
        .lines()
        .zip(after.lines())
        .enumerate()
        .filter(|(_, (old, new))| old != new)
        .map(|(idx, (old, new))| LineChange {
            line: idx + 1,
            before: old.to_string(),
            after: new.to_string(),
        })
        .collect()
}

/// A pending rewrite of one file, computed but not yet written.
#[derive(Debug, Clone)]
pub struct PlannedChange {
    pub path: PathBuf,
    pub content: String,
    pub replacements: usize,
    pub changes: Vec<LineChange>,
}

impl PlannedChange {
    /// Overwrites the file with the rewritten content.
    pub fn write(&self) -> Result<()> {
        std::fs::write(&self.path, &self.content).map_err(|source| RewriteError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Reads `file` and computes its rewrite without touching the disk.
///
/// Returns `None` when the table leaves the content unchanged.
pub fn plan_file(file: &Path, table: &MappingTable) -> Result<Option<PlannedChange>> {
    let original = read_source(file)?;
    let rewrite = rewrite_content(&original, table);

    if rewrite.content == original {
        return Ok(None);
    }

    Ok(Some(PlannedChange {
        path: file.to_path_buf(),
        changes: changed_lines(&original, &rewrite.content),
        content: rewrite.content,
        replacements: rewrite.replacements,
    }))
}

fn read_source(file: &Path) -> Result<String> {
    let bytes = std::fs::read(file).map_err(|source| RewriteError::Read {
        path: file.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|source| RewriteError::Decode {
        path: file.to_path_buf(),
        source,
    })
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Content changed and was written.
    Updated {
        replacements: usize,
        changes: Vec<LineChange>,
    },
    /// Content would change; dry-run left the file alone.
    WouldUpdate {
        replacements: usize,
        changes: Vec<LineChange>,
    },
    Unchanged,
}

/// Rewrites one file in place.
///
/// In [`Mode::Write`] a changed file is overwritten in full; in
/// [`Mode::DryRun`] nothing is written. Unchanged files are never written.
pub fn rewrite_file(file: &Path, table: &MappingTable, mode: Mode) -> Result<FileOutcome> {
    let Some(planned) = plan_file(file, table)? else {
        return Ok(FileOutcome::Unchanged);
    };

    match mode {
        Mode::Write => {
            planned.write()?;
            Ok(FileOutcome::Updated {
                replacements: planned.replacements,
                changes: planned.changes,
            })
        }
        Mode::DryRun => Ok(FileOutcome::WouldUpdate {
            replacements: planned.replacements,
            changes: planned.changes,
        }),
    }
}
