//! Report formatting and printing utilities.
//!
//! Issues are displayed in cargo-style format. Separate from core logic so the
//! pipeline can be used as a library.

use std::{
    io::{self, Write},
    path::Path,
};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{
    CommandResult, CommandSummary, DiffSummary, GenerateSummary, InitSummary,
};
use crate::{
    config::CONFIG_FILE_NAME,
    core::{ApiDescriptor, DiffResult},
    issues::{Issue, Report, Severity},
};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print issues in cargo-style format to stdout.
pub fn report(issues: &[Issue]) {
    report_to(issues, &mut io::stdout().lock());
}

/// Print issues to a custom writer.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let max_line_width = calculate_max_line_width(issues);
    for issue in issues {
        print_issue(issue, writer, max_line_width);
    }
    print_summary(issues, writer);
}

pub fn print(result: &CommandResult) {
    match &result.summary {
        CommandSummary::Generate(summary) => print_generate(result, summary),
        CommandSummary::Diff(summary) => print_diff(result, summary),
        CommandSummary::Init(summary) => print_init(summary),
    }
}

// ============================================================
// Internal Functions
// ============================================================

/// Paths are shown without a leading `./`.
fn display_path(path: &Path) -> String {
    path.strip_prefix(".").unwrap_or(path).display().to_string()
}

fn print_issue<W: Write>(issue: &Issue, writer: &mut W, max_line_width: usize) {
    let ctx = issue.context();

    let severity_str = match issue.report_severity() {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    // Clickable location: --> path:line:col
    let _ = writeln!(
        writer,
        "{:>width$}{} {}:{}:{}",
        "",
        "-->".blue(),
        display_path(&ctx.file),
        ctx.line,
        ctx.column.unwrap_or(1),
        width = max_line_width
    );

    if let Some(function) = &ctx.function {
        print_note(writer, max_line_width, "in:".bold(), function);
    }
    if let Some(details) = issue.details() {
        print_note(writer, max_line_width, "note:".bold(), &details);
    }
    if let Some(hint) = issue.hint() {
        print_note(writer, max_line_width, "hint:".bold().cyan(), hint);
    }

    let _ = writeln!(writer); // Empty line between issues
}

fn print_note<W: Write>(
    writer: &mut W,
    max_line_width: usize,
    label: colored::ColoredString,
    text: &str,
) {
    let _ = writeln!(
        writer,
        "{:>width$} {} {} {}",
        "",
        "=".blue(),
        label,
        text,
        width = max_line_width
    );
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Error)
        .count();
    let total_warnings = issues.len() - total_errors;

    let _ = writeln!(
        writer,
        "{} {} problems ({} {}, {} {})",
        FAILURE_MARK.red(),
        issues.len(),
        total_errors,
        if total_errors == 1 { "error" } else { "errors" }.red(),
        total_warnings,
        if total_warnings == 1 {
            "warning"
        } else {
            "warnings"
        }
        .yellow()
    );
}

fn calculate_max_line_width(issues: &[Issue]) -> usize {
    issues
        .iter()
        .map(|i| i.context().line)
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

fn print_generate(result: &CommandResult, summary: &GenerateSummary) {
    report(&result.issues);

    if result.error_count > 0 {
        eprintln!(
            "{} {} not written, fix the errors above",
            FAILURE_MARK.red(),
            display_path(&summary.output)
        );
        return;
    }

    let status = if summary.written { "" } else { " (unchanged)" };
    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Documented {} from {} -> {}{}",
            plural(summary.endpoint_count, "endpoint"),
            plural(result.files_scanned, "source file"),
            display_path(&summary.output),
            status
        )
        .green()
    );
}

fn print_diff(result: &CommandResult, summary: &DiffSummary) {
    // Keep stdout parseable in JSON mode.
    if summary.json {
        report_to(&result.issues, &mut io::stderr().lock());
    } else {
        report(&result.issues);
    }

    let Some(diff) = &summary.diff else {
        eprintln!(
            "{} cannot compare against {}, fix the errors above",
            FAILURE_MARK.red(),
            display_path(&summary.output)
        );
        return;
    };

    if summary.json {
        match serde_json::to_string_pretty(diff) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("{} {}", "error:".bold().red(), e),
        }
    } else {
        print_diff_to(diff, &summary.output, &mut io::stdout().lock());
    }

    if summary.written {
        let line = format!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Wrote {}", display_path(&summary.output)).green()
        );
        if summary.json {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

/// Human-readable diff listing.
pub fn print_diff_to<W: Write>(diff: &DiffResult, snapshot: &Path, writer: &mut W) {
    if !diff.has_changes() {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("No changes since {}", display_path(snapshot)).green()
        );
        return;
    }

    let width = diff
        .added
        .iter()
        .chain(&diff.removed)
        .chain(diff.changed.iter().map(|c| &c.new))
        .map(|d| UnicodeWidthStr::width(d.diff_key().as_str()))
        .max()
        .unwrap_or(0);

    print_section(writer, "Added", &diff.added, "+".green(), width);
    print_section(writer, "Removed", &diff.removed, "-".red(), width);
    let changed: Vec<ApiDescriptor> = diff.changed.iter().map(|c| c.new.clone()).collect();
    print_section(writer, "Changed", &changed, "~".yellow(), width);

    let _ = writeln!(writer, "{}", diff.summary().bold());
}

fn print_section<W: Write>(
    writer: &mut W,
    title: &str,
    endpoints: &[ApiDescriptor],
    mark: colored::ColoredString,
    width: usize,
) {
    if endpoints.is_empty() {
        return;
    }
    let _ = writeln!(writer, "{} ({}):", title.bold(), endpoints.len());
    for endpoint in endpoints {
        let key = endpoint.diff_key();
        let padding = width.saturating_sub(UnicodeWidthStr::width(key.as_str()));
        let _ = writeln!(
            writer,
            "  {} {}{:padding$}  {}",
            mark,
            key,
            "",
            endpoint.title.dimmed(),
            padding = padding
        );
    }
}

fn print_init(summary: &InitSummary) {
    if let Some(error) = &summary.error {
        eprintln!("{} {}", "error:".bold().red(), error);
        return;
    }
    if summary.created {
        println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
}
