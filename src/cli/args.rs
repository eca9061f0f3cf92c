//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `run`: Translate every tag of the input file, resuming from previous output
//! - `lookup`: Resolve a single tag and print the candidates
//! - `works`: Collect work titles from a translated file
//! - `init`: Write a default configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::config::ConfigOverrides;
use crate::lookup::SourceKind;
use crate::translator::Provider;

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
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Configuration file (default: search upward for config.yaml)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct RunArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Input tag file (overrides config file)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Success output file (overrides config file)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Failure output file (overrides config file)
    #[arg(long)]
    pub failed: Option<PathBuf>,

    /// Number of ambiguous tags sent to the AI per request
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Pause after each processed tag, in seconds
    #[arg(long)]
    pub sleep_sec: Option<f64>,

    /// AI provider used for disambiguation
    #[arg(long, value_enum)]
    pub provider: Option<Provider>,

    /// Lookup sources in tier order: --sources danbooru,wikipedia,pixiv
    #[arg(long, value_enum, value_delimiter = ',')]
    pub sources: Vec<SourceKind>,
}

impl RunArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            input_path: self.input.clone(),
            output_path: self.output.clone(),
            failed_path: self.failed.clone(),
            batch_size: self.batch_size,
            sleep_sec: self.sleep_sec,
            provider: self.provider,
            sources: self.sources.clone(),
        }
    }
}

#[derive(Debug, Args)]
pub struct RunCommand {
    #[command(flatten)]
    pub args: RunArgs,
}

#[derive(Debug, Args)]
pub struct LookupCommand {
    /// Tag to resolve, e.g. hakurei_reimu
    pub tag: String,

    #[command(flatten)]
    pub common: CommonArgs,

    /// Lookup sources in tier order (overrides config file)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub sources: Vec<SourceKind>,
}

#[derive(Debug, Args)]
pub struct WorksCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Translated file to read (default: files.output_path)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// File to write work titles to
    #[arg(long, default_value = "works.txt")]
    pub output: PathBuf,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Translate tags to Japanese names, resuming from previous output
    Run(RunCommand),
    /// Resolve a single tag through the lookup sources without writing output
    Lookup(LookupCommand),
    /// Extract work titles from the parenthetical qualifiers of translated tags
    Works(WorksCommand),
    /// Initialize a new config.yaml configuration file
    Init,
}
