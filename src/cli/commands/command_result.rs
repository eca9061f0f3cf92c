use std::path::PathBuf;

use crate::cache::CacheState;
use crate::pipeline::RunSummary;
use crate::resolver::ResolutionResult;

#[derive(Debug)]
pub enum CommandSummary {
    Run(RunReport),
    Lookup(LookupReport),
    Works(WorksSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct RunReport {
    pub summary: RunSummary,
    pub output_path: PathBuf,
    pub failed_path: PathBuf,
}

#[derive(Debug)]
pub struct LookupReport {
    pub tag: String,
    pub sources: Vec<&'static str>,
    pub result: ResolutionResult,
    /// What the output files already record for this tag, if anything.
    pub cached: Option<CacheState>,
}

#[derive(Debug)]
pub struct WorksSummary {
    pub works: Vec<String>,
    pub output_path: PathBuf,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running transchara commands
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    /// Tags that could not be translated. A non-zero count exits with 1.
    pub failure_count: usize,
}

impl CommandResult {
    pub fn new(summary: CommandSummary) -> Self {
        Self {
            summary,
            failure_count: 0,
        }
    }
}
