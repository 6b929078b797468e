//! Core documentation pipeline.
//!
//! ## Module Structure
//!
//! - `source`: syntax capability (`SourceFile` model, tree-sitter Go parser)
//! - `file_scanner`: walking scan roots for source files
//! - `registry`: type registry and per-file import tables
//! - `directive`: doc-comment directive tokenizer and type mapping
//! - `resolve`: type reference resolution
//! - `flatten`: struct flattening into leaf parameters
//! - `composite`: `Base{field=Type}` response bodies
//! - `assemble`: building descriptors from documented functions
//! - `validate`: required-field checks
//! - `diff`: snapshot comparison
//! - `output`: rendering and writing snapshots
//! - `context`: the scan → parse → register → assemble orchestrator

pub mod assemble;
pub mod composite;
pub mod context;
pub mod descriptor;
pub mod diff;
pub mod directive;
pub mod file_scanner;
pub mod flatten;
pub mod output;
pub mod registry;
pub mod resolve;
pub mod source;
pub mod validate;

pub use context::{DocContext, DocOptions, ScanError};
pub use descriptor::{ApiDescriptor, Parameter};
pub use diff::DiffResult;
