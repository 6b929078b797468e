use std::path::PathBuf;

use anyhow::{Context, Result};

use super::{CommandKind, CommandResult, CommandSummary};
use crate::{
    cli::args::CommonArgs,
    config::{load_config, resolve_path},
    core::{DocContext, DocOptions, assemble::Assembled},
    issues::{Issue, Report, Severity},
};

/// Everything a documentation command needs once config and flags are merged.
pub struct Prepared {
    pub options: DocOptions,
    pub output: PathBuf,
}

/// Load config and apply CLI overrides (CLI > config file > defaults).
///
/// Config paths are relative to the config file, CLI paths to the working
/// directory.
pub fn prepare(common: &CommonArgs) -> Result<Prepared> {
    let start = common.root.clone().unwrap_or_else(|| PathBuf::from("."));
    let loaded = load_config(&start)?;

    if !loaded.from_file {
        tracing::debug!("no apiscribe.json found, using default configuration");
    }

    let mut options = DocOptions::from_config(&loaded.config, &loaded.base_dir);

    if let Some(root) = &common.root {
        options.project_root = root.clone();
        if loaded.config.doc_root.is_none() {
            options.doc_root = root.clone();
        }
    }
    if let Some(doc_root) = &common.doc_root {
        options.doc_root = doc_root.clone();
    }

    let output = common
        .output
        .clone()
        .unwrap_or_else(|| resolve_path(&loaded.base_dir, &loaded.config.output));

    Ok(Prepared { options, output })
}

/// Scan, register and assemble.
pub fn build_docs(options: DocOptions) -> Result<(Assembled, usize)> {
    let context = DocContext::build(options).context("Failed to scan sources")?;
    if context.skipped_count > 0 {
        tracing::warn!(
            count = context.skipped_count,
            "paths skipped due to access errors"
        );
    }
    let files = context.files.len();
    Ok((context.assemble(), files))
}

pub fn finish(
    kind: CommandKind,
    summary: CommandSummary,
    mut issues: Vec<Issue>,
    files_scanned: usize,
) -> CommandResult {
    issues.sort_by(|a, b| {
        let (a, b) = (a.context(), b.context());
        a.file
            .cmp(&b.file)
            .then_with(|| a.line.cmp(&b.line))
            .then_with(|| a.column.cmp(&b.column))
    });

    let mut error_count = issues
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();
    let warning_count = issues.len() - error_count;

    if let CommandSummary::Init(ref summary) = summary
        && summary.error.is_some()
    {
        error_count += 1;
    }

    CommandResult {
        kind,
        summary,
        error_count,
        warning_count,
        issues,
        files_scanned,
    }
}
