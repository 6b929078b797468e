use anyhow::Result;

use super::{
    CommandKind, CommandResult, CommandSummary, GenerateSummary,
    helper::{build_docs, finish, prepare},
};
use crate::{
    cli::args::GenerateCommand,
    core::output::{render_json, write_if_changed},
};

/// Build documentation and write the snapshot.
///
/// Nothing is written while any descriptor fails validation.
pub fn generate(cmd: GenerateCommand) -> Result<CommandResult> {
    let prepared = prepare(&cmd.common)?;
    let (assembled, files_scanned) = build_docs(prepared.options)?;

    let blocked = assembled.issues.iter().any(|i| i.is_error());
    let written = if blocked {
        false
    } else {
        let json = render_json(&assembled.descriptors)?;
        write_if_changed(&prepared.output, &json)?
    };

    let summary = CommandSummary::Generate(GenerateSummary {
        output: prepared.output,
        endpoint_count: assembled.descriptors.len(),
        written,
    });
    Ok(finish(
        CommandKind::Generate,
        summary,
        assembled.issues,
        files_scanned,
    ))
}
