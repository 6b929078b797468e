//! Per-file import table.
//!
//! Maps each scanned file to its package name and `alias -> import path`
//! bindings, so that qualified references like `user.LoginResponse` can be
//! traced back to the package they name.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::core::source::{ImportSpec, SourceFile};

/// Imports of a single file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileImports {
    /// Package the file itself declares.
    pub package: String,
    /// Alias -> import path.
    pub aliases: HashMap<String, String>,
}

impl FileImports {
    pub fn from_source(file: &SourceFile) -> Self {
        let aliases = file
            .imports
            .iter()
            .filter_map(|spec| Some((binding_name(spec)?, spec.path.clone())))
            .collect();
        Self {
            package: file.package.clone(),
            aliases,
        }
    }

    pub fn import_path(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }
}

/// All import tables, keyed by file path.
#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    files: HashMap<PathBuf, FileImports>,
}

impl ImportTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: PathBuf, imports: FileImports) {
        self.files.insert(path, imports);
    }

    pub fn get(&self, path: &Path) -> Option<&FileImports> {
        self.files.get(path)
    }

    /// Package declared by `path`, if the file was scanned.
    pub fn package_of(&self, path: &Path) -> Option<&str> {
        self.files.get(path).map(|f| f.package.as_str())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Name an import is referenced by inside the importing file.
///
/// Dot and blank imports introduce no usable qualifier and yield `None`.
fn binding_name(spec: &ImportSpec) -> Option<String> {
    match spec.alias.as_deref() {
        Some("." | "_") => None,
        Some(alias) => Some(alias.to_string()),
        None => Some(default_alias(&spec.path).to_string()),
    }
}

/// Default qualifier of an import path: its last segment, skipping a
/// trailing major-version segment such as `v2`.
pub fn default_alias(import_path: &str) -> &str {
    let mut segments = import_path.rsplit('/');
    let last = segments.next().unwrap_or(import_path);
    if is_major_version(last) {
        if let Some(prev) = segments.next() {
            return prev;
        }
    }
    last
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn spec(alias: Option<&str>, path: &str) -> ImportSpec {
        ImportSpec {
            alias: alias.map(str::to_string),
            path: path.to_string(),
            line: 1,
        }
    }

    #[test]
    fn test_default_alias() {
        assert_eq!(default_alias("example/internal/pkg/response"), "response");
        assert_eq!(default_alias("fmt"), "fmt");
        assert_eq!(default_alias("github.com/go-chi/chi/v5"), "chi");
        assert_eq!(default_alias("example/version"), "version");
    }

    #[test]
    fn test_from_source() {
        let file = SourceFile {
            package: "user".to_string(),
            imports: vec![
                spec(None, "example/internal/server/model/user"),
                spec(Some("resp"), "example/internal/pkg/response"),
                spec(Some("_"), "embed"),
                spec(Some("."), "example/dsl"),
            ],
            ..Default::default()
        };

        let imports = FileImports::from_source(&file);
        assert_eq!(imports.package, "user");
        assert_eq!(imports.aliases.len(), 2);
        assert_eq!(
            imports.import_path("user"),
            Some("example/internal/server/model/user")
        );
        assert_eq!(
            imports.import_path("resp"),
            Some("example/internal/pkg/response")
        );
        assert_eq!(imports.import_path("response"), None);
    }
}
