//! Canonical import paths for scanned directories.
//!
//! A directory's canonical import path is the `module` declared by the nearest
//! enclosing `go.mod` joined with the directory's path below it. Directories
//! below a `vendor/` folder are addressed by the path after `vendor/`.

use std::{
    collections::HashMap,
    fs,
    path::{Component, Path, PathBuf},
};

const GO_MOD: &str = "go.mod";
const VENDOR_DIR: &str = "vendor";

#[derive(Debug, Clone)]
struct GoModule {
    dir: PathBuf,
    path: String,
}

/// Per-run cache of `go.mod` lookups, keyed by directory.
#[derive(Debug, Default)]
pub struct ModuleIndex {
    cache: HashMap<PathBuf, Option<GoModule>>,
}

impl ModuleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical import path for the package in `dir`, if one can be derived.
    pub fn import_path_for(&mut self, dir: &Path) -> Option<String> {
        if let Some(vendored) = vendored_import_path(dir) {
            return Some(vendored);
        }

        let module = self.module_for(dir)?;
        let rel = dir.strip_prefix(&module.dir).ok()?;
        let rel = slash_path(rel);
        if rel.is_empty() {
            Some(module.path)
        } else {
            Some(format!("{}/{}", module.path, rel))
        }
    }

    fn module_for(&mut self, dir: &Path) -> Option<GoModule> {
        if let Some(cached) = self.cache.get(dir) {
            return cached.clone();
        }

        let found = match read_module_path(&dir.join(GO_MOD)) {
            Some(path) => Some(GoModule {
                dir: dir.to_path_buf(),
                path,
            }),
            None => dir.parent().and_then(|parent| self.module_for(parent)),
        };

        self.cache.insert(dir.to_path_buf(), found.clone());
        found
    }
}

fn read_module_path(go_mod: &Path) -> Option<String> {
    let content = fs::read_to_string(go_mod).ok()?;
    parse_module_line(&content)
}

/// Extract the module path from `go.mod` content.
pub fn parse_module_line(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        // "module" must be followed by whitespace, not e.g. "modules".
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let path = rest.split("//").next()?.trim().trim_matches('"');
        (!path.is_empty()).then(|| path.to_string())
    })
}

fn vendored_import_path(dir: &Path) -> Option<String> {
    let components: Vec<_> = dir.components().collect();
    let idx = components
        .iter()
        .rposition(|c| c.as_os_str() == VENDOR_DIR)?;
    let rest: PathBuf = components[idx + 1..].iter().collect();
    let rest = slash_path(&rest);
    (!rest.is_empty()).then_some(rest)
}

/// Render a relative path with `/` separators; the empty path renders empty.
pub fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Package path of `dir` relative to the scan root it was found under.
///
/// The root directory itself is `"."`.
pub fn package_path(root: &Path, dir: &Path) -> String {
    let rel = dir.strip_prefix(root).map(slash_path).unwrap_or_else(|_| slash_path(dir));
    if rel.is_empty() { ".".to_string() } else { rel }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_parse_module_line() {
        assert_eq!(
            parse_module_line("module example\n\ngo 1.22\n"),
            Some("example".to_string())
        );
        assert_eq!(
            parse_module_line("// comment\nmodule \"github.com/acme/shop\" // trailing\n"),
            Some("github.com/acme/shop".to_string())
        );
        assert_eq!(parse_module_line("go 1.22\n"), None);
        assert_eq!(parse_module_line("modules x\n"), None);
    }

    #[test]
    fn test_import_path_from_go_mod() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join(GO_MOD), "module example\n").unwrap();
        let dir = root.join("internal/server/model/user");
        fs::create_dir_all(&dir).unwrap();

        let mut index = ModuleIndex::new();
        assert_eq!(
            index.import_path_for(&dir),
            Some("example/internal/server/model/user".to_string())
        );
        assert_eq!(index.import_path_for(root), Some("example".to_string()));
    }

    #[test]
    fn test_vendored_import_path() {
        let mut index = ModuleIndex::new();
        assert_eq!(
            index.import_path_for(Path::new("/src/app/vendor/github.com/acme/lib")),
            Some("github.com/acme/lib".to_string())
        );
    }

    #[test]
    fn test_package_path() {
        let root = Path::new("/src/app");
        assert_eq!(
            package_path(root, Path::new("/src/app/internal/model")),
            "internal/model"
        );
        assert_eq!(package_path(root, root), ".");
    }
}
