//! Dispatches parsed arguments to the matching command handler.

use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{CommandResult, diff::diff, generate::generate, init::init},
};

pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Generate(cmd)) => generate(cmd),
        Some(Command::Diff(cmd)) => diff(cmd),
        Some(Command::Init) => init(),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
