use anyhow::Result;

use super::{
    CommandKind, CommandResult, CommandSummary, DiffSummary,
    helper::{build_docs, finish, prepare},
};
use crate::{
    cli::args::DiffCommand,
    core::{
        diff::diff as diff_snapshots,
        output::{load_snapshot, render_json, write_if_changed},
    },
};

/// Compare freshly built documentation against the written snapshot.
///
/// No changes is a normal outcome. With `--write` the snapshot is replaced
/// when something changed.
pub fn diff(cmd: DiffCommand) -> Result<CommandResult> {
    let prepared = prepare(&cmd.common)?;
    let (assembled, files_scanned) = build_docs(prepared.options)?;

    let blocked = assembled.issues.iter().any(|i| i.is_error());
    let (result, written) = if blocked {
        (None, false)
    } else {
        let previous = load_snapshot(&prepared.output)?;
        let result = diff_snapshots(&previous, &assembled.descriptors);
        let written = if cmd.write && result.has_changes() {
            write_if_changed(&prepared.output, &render_json(&assembled.descriptors)?)?
        } else {
            false
        };
        (Some(result), written)
    };

    let summary = CommandSummary::Diff(DiffSummary {
        output: prepared.output,
        diff: result,
        json: cmd.json,
        written,
    });
    Ok(finish(
        CommandKind::Diff,
        summary,
        assembled.issues,
        files_scanned,
    ))
}
