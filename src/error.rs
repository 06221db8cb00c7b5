//! Error types for scanning, rule loading and rewriting.
//! Each variant names the file or pattern it failed on.

use std::path::PathBuf;

/// Structured errors raised by the rewriting library.
///
/// The binary wraps these with `anyhow` for context chains; per-file
/// failures are carried in the run report instead of aborting the walk.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("Failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8")]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("Failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid regex pattern: {pattern}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid mapping '{input}', expected 'old=new'")]
    InvalidMapping { input: String },

    #[error("Failed to read rules file: {path}")]
    RulesFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse rules file: {path}")]
    RulesFileParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid exclude glob: {pattern}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Mapping table is empty")]
    EmptyTable,

    #[error("Root directory not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Failed to walk {path}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Result type alias using RewriteError.
pub type Result<T> = std::result::Result<T, RewriteError>;
