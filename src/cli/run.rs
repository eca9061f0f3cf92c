//! Dispatches parsed arguments to the matching command handler.
//!
//! # Returns
//! - `Ok(CommandResult)` with the command summary and failure count
//! - `Err` if the command fails (e.g., invalid config, unreadable input)
use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{CommandResult, init::init, lookup::lookup, translate::translate, works::works},
};

pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Run(cmd)) => translate(cmd),
        Some(Command::Lookup(cmd)) => lookup(cmd),
        Some(Command::Works(cmd)) => works(cmd),
        Some(Command::Init) => init(),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
