//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `generate`: Scan sources and write the documentation snapshot
//! - `diff`: Compare the current sources against the written snapshot
//! - `init`: Initialize an apiscribe configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Generate(cmd)) => cmd.common.verbose,
            Some(Command::Diff(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Project root to scan for struct declarations (overrides config file)
    #[arg(long, env = "APISCRIBE_ROOT")]
    pub root: Option<PathBuf>,

    /// Directory containing documented handlers (overrides config file)
    #[arg(long)]
    pub doc_root: Option<PathBuf>,

    /// Snapshot file to write or compare against (overrides config file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct DiffCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Print the diff as JSON
    #[arg(long)]
    pub json: bool,

    /// Write the new snapshot when there are changes
    #[arg(long)]
    pub write: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract documentation from annotated handlers and write the snapshot
    Generate(GenerateCommand),
    /// Show endpoints added, removed or changed since the last snapshot
    Diff(DiffCommand),
    /// Initialize a new apiscribe.json configuration file
    Init,
}
