use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use rayon::prelude::*;

use crate::{
    config::{Config, resolve_path},
    core::{
        assemble::{Assembled, Assembler},
        file_scanner::{ScannedFile, scan_files},
        registry::{
            ImportTable, ModuleIndex, PackageLocation, Registry, RegistryBuilder,
            module_path::package_path,
        },
        resolve::Resolver,
        source::{GoParser, ParseError, SourceFile, SourceParser},
        validate::missing_fields,
    },
    issues::{DuplicateTypeIssue, Issue, MissingFieldIssue, SourceContext},
};

/// Fatal failure on one source file. A registry built without that file
/// cannot be trusted, so the whole run stops.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Resolved scan settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocOptions {
    /// Project root; ignore patterns are relative to it.
    pub project_root: PathBuf,
    /// Tree whose documented functions become descriptors.
    pub doc_root: PathBuf,
    /// Further trees that only contribute struct declarations.
    pub extra_roots: Vec<PathBuf>,
    pub include_vendor: bool,
    pub ignores: Vec<String>,
    pub marker: String,
}

impl DocOptions {
    pub fn from_config(config: &Config, base_dir: &Path) -> Self {
        Self {
            project_root: resolve_path(base_dir, &config.root),
            doc_root: resolve_path(base_dir, config.doc_root()),
            extra_roots: config
                .extra_roots
                .iter()
                .map(|r| resolve_path(base_dir, r))
                .collect(),
            include_vendor: config.include_vendor,
            ignores: config.ignores.clone(),
            marker: config.marker.clone(),
        }
    }

    /// Scan roots in priority order: doc root, project root, extra roots.
    pub fn roots(&self) -> Vec<PathBuf> {
        let mut roots = vec![self.doc_root.clone(), self.project_root.clone()];
        roots.extend(self.extra_roots.iter().cloned());
        roots
    }
}

/// A parsed file and where its package lives.
#[derive(Debug)]
pub struct ParsedFile {
    pub source: SourceFile,
    pub location: PackageLocation,
    /// Whether the file was found under the doc root.
    pub documented: bool,
}

/// Scan, parse and register everything once; assemble on demand.
///
/// # Pipeline
///
/// 1. **Scan**: walk every root (doc root first) for `.go` files.
/// 2. **Parse**: parse all files in parallel. Any read or syntax failure
///    aborts the run.
/// 3. **Register**: after every parse finished, merge the files into one
///    [`Registry`] and [`ImportTable`] in scan order.
/// 4. **Assemble**: build descriptors for documented functions under the doc
///    root, resolving against the finished registry.
pub struct DocContext {
    pub options: DocOptions,
    pub files: Vec<ParsedFile>,
    pub registry: Registry,
    pub imports: ImportTable,
    /// Issues found while registering (duplicate declarations).
    pub registry_issues: Vec<Issue>,
    pub skipped_count: usize,
}

impl DocContext {
    pub fn build(options: DocOptions) -> Result<Self, ScanError> {
        Self::build_with(options, &GoParser::new())
    }

    pub fn build_with(options: DocOptions, parser: &dyn SourceParser) -> Result<Self, ScanError> {
        let roots = options.roots();
        let scan = scan_files(
            &options.project_root,
            &roots,
            &options.ignores,
            options.include_vendor,
        );
        tracing::debug!(files = scan.files.len(), "scanned source files");

        let sources = scan
            .files
            .par_iter()
            .map(|scanned| parse_file(parser, scanned))
            .collect::<Result<Vec<_>, ScanError>>()?;

        let mut modules = ModuleIndex::new();
        let mut builder = RegistryBuilder::new();
        let mut locations: HashMap<PathBuf, PackageLocation> = HashMap::new();
        let mut files = Vec::with_capacity(sources.len());

        for (scanned, source) in scan.files.iter().zip(sources) {
            let dir = scanned.path.parent().unwrap_or(Path::new("")).to_path_buf();
            let location = locations
                .entry(dir.clone())
                .or_insert_with(|| PackageLocation {
                    package_path: package_path(&scanned.root, &dir),
                    import_path: modules.import_path_for(&canonical(&dir)),
                })
                .clone();
            builder.add_file(&source, &location);
            files.push(ParsedFile {
                source,
                location,
                documented: scanned.root == options.doc_root,
            });
        }

        let (registry, imports) = builder.finish();
        tracing::debug!(types = registry.len(), "built type registry");

        let registry_issues = duplicate_issues(&registry);

        Ok(Self {
            options,
            files,
            registry,
            imports,
            registry_issues,
            skipped_count: scan.skipped_count,
        })
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.registry, &self.imports)
    }

    /// Assemble descriptors for every documented function under the doc root.
    ///
    /// The result carries registry issues, per-function warnings and one
    /// `missing-field` error per invalid descriptor.
    pub fn assemble(&self) -> Assembled {
        let assembler = Assembler::new(self.resolver(), &self.options.marker);

        let per_file: Vec<Assembled> = self
            .files
            .par_iter()
            .filter(|f| f.documented)
            .map(|f| assembler.assemble_file(&f.source))
            .collect();

        let mut out = Assembled {
            descriptors: Vec::new(),
            issues: self.registry_issues.clone(),
        };
        for assembled in per_file {
            out.extend(assembled);
        }

        for descriptor in &out.descriptors {
            let missing = missing_fields(descriptor);
            if !missing.is_empty() {
                out.issues.push(
                    MissingFieldIssue {
                        context: SourceContext::new(&descriptor.file, descriptor.line)
                            .in_function(&descriptor.function),
                        missing,
                    }
                    .into(),
                );
            }
        }

        tracing::debug!(
            descriptors = out.descriptors.len(),
            issues = out.issues.len(),
            "assembled documentation"
        );
        out
    }
}

fn parse_file(parser: &dyn SourceParser, scanned: &ScannedFile) -> Result<SourceFile, ScanError> {
    let code = fs::read_to_string(&scanned.path).map_err(|source| ScanError::Io {
        path: scanned.path.clone(),
        source,
    })?;
    parser
        .parse(&scanned.path, &code)
        .map_err(|source| ScanError::Parse {
            path: scanned.path.clone(),
            source,
        })
}

fn canonical(dir: &Path) -> PathBuf {
    fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf())
}

fn duplicate_issues(registry: &Registry) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (key, ids) in registry.collisions() {
        let kept = registry.get(ids[0]);
        for id in &ids[1..] {
            let ignored = registry.get(*id);
            tracing::warn!(
                key,
                kept = %kept.file.display(),
                ignored = %ignored.file.display(),
                "duplicate type declaration"
            );
            issues.push(
                DuplicateTypeIssue {
                    context: SourceContext::new(&ignored.file, ignored.line),
                    key: key.to_string(),
                    kept: kept.file.clone(),
                }
                .into(),
            );
        }
    }
    issues
}
