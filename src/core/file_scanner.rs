use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use glob::Pattern;
use walkdir::{DirEntry, WalkDir};

use crate::core::registry::module_path::slash_path;

const SOURCE_EXTENSION: &str = "go";
const TEST_FILE_SUFFIX: &str = "_test.go";
const VENDOR_DIR: &str = "vendor";

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal directory paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// A source file and the scan root it was found under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub root: PathBuf,
}

/// Result of scanning files.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Files in scan order: roots in the given order, entries sorted by name.
    pub files: Vec<ScannedFile>,
    pub skipped_count: usize,
}

#[derive(Debug, Default)]
struct IgnoreRules {
    literal: Vec<PathBuf>,
    globs: Vec<Pattern>,
}

impl IgnoreRules {
    fn new(project_root: &Path, patterns: &[String]) -> Self {
        let mut rules = Self::default();
        for p in patterns {
            if is_glob_pattern(p) {
                match Pattern::new(p) {
                    Ok(pattern) => rules.globs.push(pattern),
                    Err(e) => tracing::warn!(pattern = %p, "invalid ignore pattern: {}", e),
                }
            } else {
                rules.literal.push(project_root.join(p));
            }
        }
        rules
    }

    fn is_ignored(&self, project_root: &Path, path: &Path) -> bool {
        if self.literal.iter().any(|ignored| path.starts_with(ignored)) {
            return true;
        }
        let relative = path
            .strip_prefix(project_root)
            .map(slash_path)
            .unwrap_or_else(|_| slash_path(path));
        self.globs.iter().any(|p| p.matches(&relative))
    }
}

/// Walk `roots` for Go source files.
///
/// Test files and hidden directories are always skipped, `vendor`
/// directories unless `include_vendor`. `ignores` are literal paths or glob
/// patterns relative to `project_root`. A root listed twice, or a file
/// reachable from several roots, is scanned once (first root wins).
pub fn scan_files(
    project_root: &Path,
    roots: &[PathBuf],
    ignores: &[String],
    include_vendor: bool,
) -> ScanResult {
    let rules = IgnoreRules::new(project_root, ignores);
    let mut result = ScanResult::default();
    let mut seen_roots: HashSet<PathBuf> = HashSet::new();
    let mut seen_files: HashSet<PathBuf> = HashSet::new();

    for root in roots {
        if !seen_roots.insert(identity(root)) {
            continue;
        }

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !skip_dir(entry, include_vendor));

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    result.skipped_count += 1;
                    tracing::warn!("cannot access path: {}", e);
                    continue;
                }
            };
            let path = entry.path();

            if !entry.file_type().is_file() || !is_scannable_file(path) {
                continue;
            }
            if rules.is_ignored(project_root, path) {
                tracing::debug!(path = %path.display(), "ignored by pattern");
                continue;
            }
            if !seen_files.insert(identity(path)) {
                continue;
            }

            result.files.push(ScannedFile {
                path: path.to_path_buf(),
                root: root.clone(),
            });
        }
    }

    result
}

fn skip_dir(entry: &DirEntry, include_vendor: bool) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || (!include_vendor && name == VENDOR_DIR)
}

fn is_scannable_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(SOURCE_EXTENSION)
        && !path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(TEST_FILE_SUFFIX))
}

fn identity(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
