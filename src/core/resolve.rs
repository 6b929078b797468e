//! Reference resolution - mapping a type token to a registered declaration.
//!
//! Tokens are resolved relative to the file they appear in:
//!
//! 1. **Unqualified** (`LoginRequest`): the file's own package first, then a
//!    registry-wide bare-name match when exactly one declaration has that name.
//! 2. **Qualified** (`user.LoginRequest`): the alias is looked up in the file's
//!    imports. Candidates are every declaration named `LoginRequest`:
//!    - a candidate whose canonical import path equals the bound path wins;
//!    - otherwise candidates whose scan-relative package path equals, is a
//!      suffix of, is a prefix of, or equals the import path minus its first
//!      segment are kept. A kept candidate whose package name equals the alias
//!      is returned immediately; else the longest package path wins (first
//!      registered on a tie).
//!    - When nothing matches (or the alias is not imported at all) the token
//!      is tried as a registry key directly.

use std::path::Path;

use crate::core::registry::{DeclId, ImportTable, Registry, TypeDeclaration};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("type '{0}' is not declared in this package or anywhere in the registry")]
    NotFound(String),
    #[error("type '{name}' is ambiguous: {count} declarations share the name")]
    Ambiguous { name: String, count: usize },
    #[error("package '{alias}' is not imported")]
    UnknownAlias { alias: String },
    #[error("no declaration of '{name}' matches import path '{import_path}'")]
    NoMatch { name: String, import_path: String },
}

/// Read-only view over the registry and import table.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    registry: &'a Registry,
    imports: &'a ImportTable,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a Registry, imports: &'a ImportTable) -> Self {
        Self { registry, imports }
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn get(&self, id: DeclId) -> &'a TypeDeclaration {
        self.registry.get(id)
    }

    /// Resolve `token` as referenced from `file`. One leading `*` is ignored.
    pub fn resolve(&self, token: &str, file: &Path) -> Result<DeclId, ResolveError> {
        let token = token.trim();
        let token = token.strip_prefix('*').unwrap_or(token);
        match token.split_once('.') {
            Some((alias, name)) => self.resolve_qualified(token, alias, name, file),
            None => self.resolve_unqualified(token, file),
        }
    }

    fn resolve_unqualified(&self, name: &str, file: &Path) -> Result<DeclId, ResolveError> {
        if let Some(package) = self.imports.package_of(file) {
            if let Some(id) = self.registry.lookup(&format!("{}.{}", package, name)) {
                return Ok(id);
            }
        }

        let mut candidates = self.registry.named(name).map(|(id, _)| id);
        match (candidates.next(), candidates.count()) {
            (Some(id), 0) => Ok(id),
            (Some(_), rest) => Err(ResolveError::Ambiguous {
                name: name.to_string(),
                count: rest + 1,
            }),
            (None, _) => Err(ResolveError::NotFound(name.to_string())),
        }
    }

    fn resolve_qualified(
        &self,
        token: &str,
        alias: &str,
        name: &str,
        file: &Path,
    ) -> Result<DeclId, ResolveError> {
        let import_path = self
            .imports
            .get(file)
            .and_then(|imports| imports.import_path(alias));

        let Some(import_path) = import_path else {
            return self
                .registry
                .lookup(token)
                .ok_or_else(|| ResolveError::UnknownAlias {
                    alias: alias.to_string(),
                });
        };

        if let Some(id) = self.match_import_path(alias, name, import_path) {
            return Ok(id);
        }

        self.registry
            .lookup(token)
            .ok_or_else(|| ResolveError::NoMatch {
                name: name.to_string(),
                import_path: import_path.to_string(),
            })
    }

    fn match_import_path(&self, alias: &str, name: &str, import_path: &str) -> Option<DeclId> {
        let candidates: Vec<(DeclId, &TypeDeclaration)> = self.registry.named(name).collect();

        if let Some((id, _)) = candidates
            .iter()
            .find(|(_, decl)| decl.import_path.as_deref() == Some(import_path))
        {
            return Some(*id);
        }

        let mut best: Option<(DeclId, usize)> = None;
        for (id, decl) in candidates {
            if !path_matches(&decl.package_path, import_path) {
                continue;
            }
            if decl.package == alias {
                return Some(id);
            }
            let len = decl.package_path.len();
            if best.is_none_or(|(_, best_len)| len > best_len) {
                best = Some((id, len));
            }
        }
        best.map(|(id, _)| id)
    }
}

/// Whether a scan-relative package path plausibly names `import_path`.
///
/// Comparisons respect segment boundaries, so `user` matches
/// `example/model/user` but not `example/model/superuser`.
pub fn path_matches(package_path: &str, import_path: &str) -> bool {
    if package_path.is_empty() || package_path == "." {
        return false;
    }
    package_path == import_path
        || import_path
            .strip_suffix(package_path)
            .is_some_and(|head| head.ends_with('/'))
        || import_path
            .strip_prefix(package_path)
            .is_some_and(|tail| tail.starts_with('/'))
        || import_path
            .split_once('/')
            .is_some_and(|(_, rest)| rest == package_path)
}
