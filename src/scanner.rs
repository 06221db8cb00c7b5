//! Source file scanner.
//!
//! Recursively walks a root directory to collect files whose names end with
//! a configured extension. One filename can be skipped when it sits directly
//! in the root (it is processed normally anywhere deeper). Hidden entries and
//! entries matching exclude globs are pruned before descending. Symlinks to
//! files are collected; symlinked directories are not descended into, and
//! dangling links are reported as scan errors.

use crate::error::{Result, RewriteError};
use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Controls which files a scan yields.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Suffix a file name must end with, normalized to start with `.`.
    pub extension: String,
    /// File name skipped only when it lives directly in the root.
    pub skip_root_file: Option<String>,
    /// Globs matched against entry names; matches are pruned.
    pub excludes: Vec<Pattern>,
    /// Prune entries whose names start with `.` below the root.
    pub default_excludes: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extension: ".rs".to_string(),
            skip_root_file: Some("main.rs".to_string()),
            excludes: Vec::new(),
            default_excludes: true,
        }
    }
}

impl ScanOptions {
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = normalize_extension(extension);
        self
    }

    pub fn with_skip_root_file(mut self, name: Option<String>) -> Self {
        self.skip_root_file = name;
        self
    }

    /// Compiles exclude globs, failing on the first invalid one.
    pub fn with_excludes(mut self, globs: &[String]) -> Result<Self> {
        self.excludes = globs
            .iter()
            .map(|g| {
                Pattern::new(g).map_err(|source| RewriteError::InvalidGlob {
                    pattern: g.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self)
    }

    pub fn with_default_excludes(mut self, enabled: bool) -> Self {
        self.default_excludes = enabled;
        self
    }
}

/// Prefixes `ext` with `.` unless it already has one. An empty extension
/// stays empty and matches every file.
pub fn normalize_extension(ext: &str) -> String {
    if ext.is_empty() || ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

/// Files found by a scan plus the entries that could not be visited.
#[derive(Debug, Default)]
pub struct Scan {
    pub files: Vec<PathBuf>,
    pub errors: Vec<(PathBuf, RewriteError)>,
}

/// Collects matching files under `root`, sorted by path.
///
/// Fails only when `root` is not a directory. Errors on individual entries
/// are gathered into [`Scan::errors`] and the walk continues.
pub fn collect_source_files(root: &Path, options: &ScanOptions) -> Result<Scan> {
    if !root.is_dir() {
        return Err(RewriteError::RootNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut scan = Scan::default();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_excluded(e, options))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                let path = source
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                scan.errors.push((
                    path.clone(),
                    RewriteError::Walk { path, source },
                ));
                continue;
            }
        };

        if !is_included(&entry, options) {
            continue;
        }

        if entry.file_type().is_file() {
            scan.files.push(entry.into_path());
        } else if entry.path_is_symlink() {
            // Links to files are rewritten through the link; directory links stay unfollowed.
            match std::fs::metadata(entry.path()) {
                Ok(meta) if meta.is_file() => scan.files.push(entry.into_path()),
                Ok(_) => {}
                Err(source) => {
                    let path = entry.into_path();
                    scan.errors.push((
                        path.clone(),
                        RewriteError::Read { path, source },
                    ));
                }
            }
        }
    }

    scan.files.sort();
    Ok(scan)
}

fn is_excluded(entry: &walkdir::DirEntry, options: &ScanOptions) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let Some(name) = entry.file_name().to_str() else {
        return false;
    };
    (options.default_excludes && name.starts_with('.'))
        || options.excludes.iter().any(|p| p.matches(name))
}

fn is_included(entry: &walkdir::DirEntry, options: &ScanOptions) -> bool {
    let Some(name) = entry.file_name().to_str() else {
        return false;
    };
    if !name.ends_with(&options.extension) {
        return false;
    }
    let at_root = entry.depth() == 1;
    !(at_root && options.skip_root_file.as_deref() == Some(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    fn relative(scan: &Scan, root: &Path) -> Vec<String> {
        scan.files
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn collects_files_with_extension_recursively() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "lib.rs");
        touch(dir.path(), "ui/theme.rs");
        touch(dir.path(), "ui/deep/icons.rs");
        touch(dir.path(), "README.md");
        touch(dir.path(), "ui/notes.txt");

        let scan = collect_source_files(dir.path(), &ScanOptions::default()).unwrap();
        assert_eq!(
            relative(&scan, dir.path()),
            vec!["lib.rs", "ui/deep/icons.rs", "ui/theme.rs"]
        );
        assert!(scan.errors.is_empty());
    }

    #[test]
    fn skips_excluded_name_only_at_root() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "main.rs");
        touch(dir.path(), "bin/main.rs");
        touch(dir.path(), "app.rs");

        let scan = collect_source_files(dir.path(), &ScanOptions::default()).unwrap();
        assert_eq!(relative(&scan, dir.path()), vec!["app.rs", "bin/main.rs"]);
    }

    #[test]
    fn root_file_is_kept_when_skip_disabled() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "main.rs");

        let options = ScanOptions::default().with_skip_root_file(None);
        let scan = collect_source_files(dir.path(), &options).unwrap();
        assert_eq!(relative(&scan, dir.path()), vec!["main.rs"]);
    }

    #[test]
    fn custom_extension_without_dot_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.toml");
        touch(dir.path(), "b.rs");
        touch(dir.path(), "xtoml");

        let options = ScanOptions::default().with_extension("toml");
        let scan = collect_source_files(dir.path(), &options).unwrap();
        assert_eq!(relative(&scan, dir.path()), vec!["a.toml"]);
    }

    #[test]
    fn hidden_directories_are_pruned_by_default() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), ".git/hooks/x.rs");
        touch(dir.path(), "src/y.rs");

        let scan = collect_source_files(dir.path(), &ScanOptions::default()).unwrap();
        assert_eq!(relative(&scan, dir.path()), vec!["src/y.rs"]);

        let options = ScanOptions::default().with_default_excludes(false);
        let scan = collect_source_files(dir.path(), &options).unwrap();
        assert_eq!(
            relative(&scan, dir.path()),
            vec![".git/hooks/x.rs", "src/y.rs"]
        );
    }

    #[test]
    fn hidden_root_is_still_walked() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join(".hidden");
        touch(&root, "a.rs");

        let scan = collect_source_files(&root, &ScanOptions::default()).unwrap();
        assert_eq!(relative(&scan, &root), vec!["a.rs"]);
    }

    #[test]
    fn exclude_globs_prune_matching_entries() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "target/debug/build.rs");
        touch(dir.path(), "src/generated_api.rs");
        touch(dir.path(), "src/app.rs");

        let options = ScanOptions::default()
            .with_excludes(&["target".to_string(), "generated_*".to_string()])
            .unwrap();
        let scan = collect_source_files(dir.path(), &options).unwrap();
        assert_eq!(relative(&scan, dir.path()), vec!["src/app.rs"]);
    }

    #[test]
    fn invalid_exclude_glob_is_rejected() {
        let err = ScanOptions::default()
            .with_excludes(&["[".to_string()])
            .unwrap_err();
        assert!(matches!(err, RewriteError::InvalidGlob { .. }));
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_source_files(&dir.path().join("missing"), &ScanOptions::default())
            .unwrap_err();
        assert!(matches!(err, RewriteError::RootNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_files_are_collected() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let target = outside.path().join("target.rs");
        fs::write(&target, "use crate::app::Foo;\n").unwrap();
        touch(dir.path(), "plain.rs");
        std::os::unix::fs::symlink(&target, dir.path().join("linked.rs")).unwrap();

        let scan = collect_source_files(dir.path(), &ScanOptions::default()).unwrap();
        assert_eq!(relative(&scan, dir.path()), vec!["linked.rs", "plain.rs"]);
        assert!(scan.errors.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        touch(outside.path(), "elsewhere.rs");
        touch(dir.path(), "a.rs");
        std::os::unix::fs::symlink(outside.path(), dir.path().join("linked_dir.rs")).unwrap();

        let scan = collect_source_files(dir.path(), &ScanOptions::default()).unwrap();
        assert_eq!(relative(&scan, dir.path()), vec!["a.rs"]);
        assert!(scan.errors.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.rs");
        std::os::unix::fs::symlink(dir.path().join("gone.rs"), dir.path().join("dangling.rs"))
            .unwrap();

        let scan = collect_source_files(dir.path(), &ScanOptions::default()).unwrap();
        assert_eq!(relative(&scan, dir.path()), vec!["a.rs"]);
        assert_eq!(scan.errors.len(), 1);
        assert_eq!(scan.errors[0].0, dir.path().join("dangling.rs"));
        assert!(matches!(scan.errors[0].1, RewriteError::Read { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_is_collected_as_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.rs");
        touch(dir.path(), "open/b.rs");
        touch(dir.path(), "locked/c.rs");
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not stop a privileged user.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let scan = collect_source_files(dir.path(), &ScanOptions::default()).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(relative(&scan, dir.path()), vec!["a.rs", "open/b.rs"]);
        assert_eq!(scan.errors.len(), 1);
        assert_eq!(scan.errors[0].0, locked);
        assert!(matches!(scan.errors[0].1, RewriteError::Walk { .. }));
    }

    #[test]
    fn normalize_extension_cases() {
        assert_eq!(normalize_extension("rs"), ".rs");
        assert_eq!(normalize_extension(".rs"), ".rs");
        assert_eq!(normalize_extension(""), "");
    }
}
