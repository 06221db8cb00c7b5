//! Per-file results and run summaries.
//!
//! Every visited file ends up as one [`FileReport`]. Failures are recorded
//! with their reason and never stop the run, so one unreadable file cannot
//! block the rest of a migration.

use crate::error::RewriteError;
use crate::rewriter::{self, FileOutcome, LineChange, Mode};
use crate::rules::MappingTable;
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Updated,
    WouldUpdate,
    Unchanged,
    /// Changes were found but the user declined to write them.
    Declined,
    Failed,
}

/// Result for a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub status: Status,
    pub replacements: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<LineChange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    pub fn from_outcome(path: &Path, outcome: FileOutcome) -> Self {
        let (status, replacements, changes) = match outcome {
            FileOutcome::Updated {
                replacements,
                changes,
            } => (Status::Updated, replacements, changes),
            FileOutcome::WouldUpdate {
                replacements,
                changes,
            } => (Status::WouldUpdate, replacements, changes),
            FileOutcome::Unchanged => (Status::Unchanged, 0, Vec::new()),
        };
        Self {
            path: path.to_path_buf(),
            status,
            replacements,
            changes,
            error: None,
        }
    }

    pub fn declined(path: &Path, replacements: usize, changes: Vec<LineChange>) -> Self {
        Self {
            path: path.to_path_buf(),
            status: Status::Declined,
            replacements,
            changes,
            error: None,
        }
    }

    pub fn failed(path: &Path, err: &RewriteError) -> Self {
        Self {
            path: path.to_path_buf(),
            status: Status::Failed,
            replacements: 0,
            changes: Vec::new(),
            error: Some(error_chain(err)),
        }
    }
}

/// Formats an error and all of its sources as `outer: inner: ...`.
pub fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Summary statistics from a run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub files_scanned: usize,
    pub updated: usize,
    pub would_update: usize,
    pub unchanged: usize,
    pub declined: usize,
    pub failed: usize,
    pub replacements: usize,
}

/// Complete run results.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub files: Vec<FileReport>,
    pub summary: Summary,
}

impl RunReport {
    pub fn push(&mut self, report: FileReport) {
        let summary = &mut self.summary;
        summary.files_scanned += 1;
        match report.status {
            Status::Updated => {
                summary.updated += 1;
                summary.replacements += report.replacements;
            }
            Status::WouldUpdate => {
                summary.would_update += 1;
                summary.replacements += report.replacements;
            }
            Status::Unchanged => summary.unchanged += 1,
            Status::Declined => summary.declined += 1,
            Status::Failed => summary.failed += 1,
        }
        self.files.push(report);
    }

    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.status == Status::Failed)
    }
}

/// Rewrites one file and folds any error into its report.
pub fn process_file(file: &Path, table: &MappingTable, mode: Mode) -> FileReport {
    match rewriter::rewrite_file(file, table, mode) {
        Ok(outcome) => FileReport::from_outcome(file, outcome),
        Err(err) => FileReport::failed(file, &err),
    }
}

/// Rewrites every file in order, continuing past failures.
pub fn run(files: &[PathBuf], table: &MappingTable, mode: Mode) -> RunReport {
    let mut report = RunReport::default();
    for file in files {
        report.push(process_file(file, table, mode));
    }
    report
}
