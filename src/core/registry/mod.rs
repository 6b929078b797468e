//! Type registry - every struct declaration discovered under the scan roots.
//!
//! The registry is built once per run by [`RegistryBuilder`] and is read-only
//! afterwards. Declarations are keyed by `"package.TypeName"`.
//!
//! ## Module Structure
//!
//! - `imports`: per-file alias -> import path table
//! - `module_path`: canonical import paths derived from `go.mod`
//! - `tag`: struct tag parsing (serialization names, optional marker)
//!
//! ## Duplicate Keys
//!
//! Two packages with the same name may declare the same type name. All
//! declarations are kept; [`Registry::lookup`] returns the first one
//! registered (first scan root wins) and [`Registry::collisions`] lists the
//! rest so callers can warn about them.

pub mod imports;
pub mod module_path;
pub mod tag;

use std::{collections::HashMap, path::PathBuf};

use crate::core::source::{RawField, SourceFile, StructDecl};

pub use imports::{FileImports, ImportTable};
pub use module_path::ModuleIndex;
use tag::{TagInfo, parse_serialization_tag};

/// One documented field of a struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Serialized name. For embedded fields this equals `type_token`.
    pub name: String,
    pub type_token: String,
    pub required: bool,
    pub remark: String,
    pub embedded: bool,
}

/// A struct declaration as registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    pub name: String,
    /// Declared package name.
    pub package: String,
    /// Directory of the declaring file relative to its scan root.
    pub package_path: String,
    /// Canonical import path, when a `go.mod` or `vendor/` layout gives one.
    pub import_path: Option<String>,
    /// File the declaration came from.
    pub file: PathBuf,
    pub line: usize,
    pub fields: Vec<Field>,
}

impl TypeDeclaration {
    pub fn key(&self) -> String {
        make_key(&self.package, &self.name)
    }
}

/// Registry key for a type in a package.
pub fn make_key(package: &str, name: &str) -> String {
    format!("{}.{}", package, name)
}

/// Stable handle to a registered declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(usize);

/// Where a scanned file's package lives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageLocation {
    pub package_path: String,
    pub import_path: Option<String>,
}

#[derive(Debug, Default)]
pub struct Registry {
    decls: Vec<TypeDeclaration>,
    by_key: HashMap<String, Vec<DeclId>>,
}

impl Registry {
    pub fn get(&self, id: DeclId) -> &TypeDeclaration {
        &self.decls[id.0]
    }

    /// First declaration registered under `key`.
    pub fn lookup(&self, key: &str) -> Option<DeclId> {
        self.by_key.get(key).and_then(|ids| ids.first().copied())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// All declarations in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &TypeDeclaration)> {
        self.decls.iter().enumerate().map(|(i, d)| (DeclId(i), d))
    }

    /// Declarations whose bare type name is `name`, in registration order.
    pub fn named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = (DeclId, &'a TypeDeclaration)> {
        self.iter().filter(move |(_, d)| d.name == name)
    }

    /// Keys registered more than once, with every declaration for the key.
    pub fn collisions(&self) -> Vec<(&str, &[DeclId])> {
        let mut out: Vec<(&str, &[DeclId])> = self
            .by_key
            .iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(k, ids)| (k.as_str(), ids.as_slice()))
            .collect();
        out.sort_by_key(|(_, ids)| ids[0]);
        out
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    fn insert(&mut self, decl: TypeDeclaration) -> DeclId {
        let id = DeclId(self.decls.len());
        self.by_key.entry(decl.key()).or_default().push(id);
        self.decls.push(decl);
        id
    }
}

/// Builds the [`Registry`] and [`ImportTable`] from parsed files.
///
/// # Usage
///
/// ```ignore
/// let mut builder = RegistryBuilder::new();
/// for (file, location) in parsed {
///     builder.add_file(&file, &location);
/// }
/// let (registry, imports) = builder.finish();
/// ```
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registry: Registry,
    imports: ImportTable,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every struct of `file` and record its imports.
    pub fn add_file(&mut self, file: &SourceFile, location: &PackageLocation) -> Vec<DeclId> {
        self.imports
            .insert(file.path.clone(), FileImports::from_source(file));

        file.structs
            .iter()
            .map(|decl| self.registry.insert(declaration(file, decl, location)))
            .collect()
    }

    pub fn finish(self) -> (Registry, ImportTable) {
        (self.registry, self.imports)
    }
}

fn declaration(file: &SourceFile, decl: &StructDecl, location: &PackageLocation) -> TypeDeclaration {
    TypeDeclaration {
        name: decl.name.clone(),
        package: file.package.clone(),
        package_path: location.package_path.clone(),
        import_path: location.import_path.clone(),
        file: file.path.clone(),
        line: decl.line,
        fields: decl.fields.iter().flat_map(fields_of).collect(),
    }
}

/// Expand one field declaration line into registry fields.
fn fields_of(raw: &RawField) -> Vec<Field> {
    let remark = raw.comment.clone().unwrap_or_default();

    if raw.is_embedded() {
        return vec![Field {
            name: raw.type_token.clone(),
            type_token: raw.type_token.clone(),
            required: true,
            remark,
            embedded: true,
        }];
    }

    let tag = raw.tag.as_deref().and_then(parse_serialization_tag);
    if tag == Some(TagInfo::Excluded) {
        return Vec::new();
    }

    raw.names
        .iter()
        .map(|ident| {
            let (name, required) = match &tag {
                Some(TagInfo::Named { name, optional }) if !name.is_empty() => {
                    (name.clone(), !optional)
                }
                Some(TagInfo::Named { optional, .. }) => (ident.clone(), !optional),
                _ => (ident.clone(), true),
            };
            Field {
                name,
                type_token: raw.type_token.clone(),
                required,
                remark: remark.clone(),
                embedded: false,
            }
        })
        .collect()
}
