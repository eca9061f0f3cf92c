use anyhow::Result;

use super::helper::load_app_config;
use super::{CommandResult, CommandSummary, WorksSummary};
use crate::cli::args::WorksCommand;
use crate::config::ConfigOverrides;
use crate::works::{extract_works, write_works};

pub fn works(cmd: WorksCommand) -> Result<CommandResult> {
    let loaded = load_app_config(&cmd.common, &ConfigOverrides::default())?;
    let config = &loaded.config;
    let input = cmd.input.as_ref().unwrap_or(&config.files.output_path);

    let works = extract_works(input, config.delimiter()?)?;
    write_works(&cmd.output, &works)?;

    Ok(CommandResult::new(CommandSummary::Works(WorksSummary {
        works,
        output_path: cmd.output,
    })))
}
