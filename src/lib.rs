//! apiscribe - API documentation from annotated Go handlers
//!
//! apiscribe scans a Go project for functions whose doc comments carry
//! `@<marker>` directives, resolves the referenced request and response
//! types against every struct declared in the project, and writes a JSON
//! snapshot describing each endpoint. Snapshots can be diffed against a
//! fresh scan to review API changes.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (generate, diff, init)
//! - `config`: Configuration file loading and parsing
//! - `core`: Documentation pipeline (scan, register, resolve, assemble)
//! - `issues`: Issue type definitions and reporting

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
