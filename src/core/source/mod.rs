//! Source syntax capability.
//!
//! The rest of the pipeline never touches a concrete syntax tree. It consumes
//! the [`SourceFile`] model produced by a [`SourceParser`]:
//! - package name and import specs (for the import table)
//! - struct declarations with their raw field list (for the type registry)
//! - function declarations with their leading comment block (for directives)
//!
//! `go`: the tree-sitter backed parser for Go sources.

pub mod go;

use std::path::{Path, PathBuf};

pub use go::GoParser;

/// One parsed source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Declared package name (`package user` -> "user").
    pub package: String,
    pub imports: Vec<ImportSpec>,
    pub structs: Vec<StructDecl>,
    pub functions: Vec<FunctionDecl>,
}

/// A single import spec, `alias "path"` or just `"path"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit alias, if any. `.` and `_` are kept verbatim.
    pub alias: Option<String>,
    pub path: String,
    pub line: usize,
}

/// A struct-shaped type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    pub name: String,
    pub line: usize,
    pub fields: Vec<RawField>,
}

/// One field declaration line of a struct.
///
/// `A, B int` yields a single `RawField` with two names; an embedded field has
/// no names at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField {
    pub names: Vec<String>,
    /// Declared type with whitespace collapsed, e.g. `*Foo`, `[]Bar`, `pkg.Baz`.
    pub type_token: String,
    /// Tag text without the surrounding quotes/backticks.
    pub tag: Option<String>,
    /// Trailing `//` comment text, trimmed.
    pub comment: Option<String>,
    pub line: usize,
}

impl RawField {
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

/// A function or method declaration together with its doc comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    pub line: usize,
    pub doc: Vec<CommentLine>,
}

/// A single doc-comment line with comment markers stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentLine {
    pub text: String,
    /// 1-based source line.
    pub line: usize,
}

impl CommentLine {
    pub fn new(text: impl Into<String>, line: usize) -> Self {
        Self {
            text: text.into(),
            line,
        }
    }
}

/// Errors from turning source text into a [`SourceFile`].
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("syntax error at {line}:{column}")]
    Syntax { line: usize, column: usize },
    #[error("parser produced no tree")]
    NoTree,
    #[error("failed to load grammar: {0}")]
    Language(String),
}

/// Turns one file's source text into the [`SourceFile`] model.
pub trait SourceParser: Sync {
    fn parse(&self, path: &Path, code: &str) -> Result<SourceFile, ParseError>;
}
