use std::path::PathBuf;

use crate::{core::DiffResult, issues::Issue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Generate,
    Diff,
    Init,
}

#[derive(Debug)]
pub enum CommandSummary {
    Generate(GenerateSummary),
    Diff(DiffSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct GenerateSummary {
    pub output: PathBuf,
    pub endpoint_count: usize,
    /// False when the snapshot already matched.
    pub written: bool,
}

#[derive(Debug)]
pub struct DiffSummary {
    pub output: PathBuf,
    /// `None` when invalid documentation blocked the comparison.
    pub diff: Option<DiffResult>,
    pub json: bool,
    /// Whether the snapshot was rewritten (`--write`).
    pub written: bool,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
    pub error: Option<String>,
}

/// Result of running apiscribe commands
pub struct CommandResult {
    pub kind: CommandKind,
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
    /// All issues found while building documentation.
    /// Empty for `init`.
    pub issues: Vec<Issue>,
    /// Number of source files that were scanned.
    pub files_scanned: usize,
}
