//! Summary printing for CLI commands.
//!
//! Per-tag progress goes through `tracing`; this module only prints the
//! end-of-command summary to stdout.

use std::{
    env,
    io::{self, Write},
    time::Duration,
};

use colored::Colorize;

use super::commands::{
    CommandResult, CommandSummary, InitSummary, LookupReport, RunReport, WorksSummary,
};
use crate::cache::CacheState;
use crate::config::CONFIG_FILE_NAME;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

const DISABLE_TIMING_ENV: &str = "TRANSCHARA_DISABLE_TIMING";

pub fn print(result: &CommandResult) {
    let stdout = &mut io::stdout().lock();
    match &result.summary {
        CommandSummary::Run(report) => {
            let timing = env::var_os(DISABLE_TIMING_ENV).is_none();
            print_run_to(report, timing, stdout);
        }
        CommandSummary::Lookup(report) => print_lookup_to(report, stdout),
        CommandSummary::Works(summary) => print_works_to(summary, stdout),
        CommandSummary::Init(summary) => print_init_to(summary, stdout),
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}

pub fn print_run_to<W: Write>(report: &RunReport, timing: bool, writer: &mut W) {
    let summary = &report.summary;
    let mut headline = format!(
        "Translated {} tag(s) ({} direct, {} by AI)",
        summary.resolved(),
        summary.direct,
        summary.ai_resolved
    );
    if timing {
        headline.push_str(&format!(" in {}", format_elapsed(summary.elapsed)));
    }
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), headline.green());

    let _ = writeln!(
        writer,
        "  {} read, {} cached, {} skipped, {} AI batch(es)",
        summary.read, summary.cache_hits, summary.skipped_rows, summary.batches
    );

    if summary.failed > 0 {
        let _ = writeln!(
            writer,
            "{} {} (see {})",
            FAILURE_MARK.red(),
            format!("{} tag(s) could not be translated", summary.failed).red(),
            report.failed_path.display()
        );
    }
    let _ = writeln!(
        writer,
        "  {} {}",
        "output:".dimmed(),
        report.output_path.display()
    );
}

pub fn print_lookup_to<W: Write>(report: &LookupReport, writer: &mut W) {
    let sources = report.sources.join(", ");
    if let Some(name) = report.result.name() {
        let _ = writeln!(
            writer,
            "{} {} → {}",
            SUCCESS_MARK.green(),
            report.tag,
            name.green().bold()
        );
    } else if report.result.candidates.is_empty() {
        let _ = writeln!(
            writer,
            "{} {}",
            FAILURE_MARK.red(),
            format!("No candidates for {} ({})", report.tag, sources).red()
        );
    } else {
        let _ = writeln!(
            writer,
            "{} {} is ambiguous, candidates:",
            "warning:".bold().yellow(),
            report.tag
        );
        for candidate in &report.result.candidates {
            let _ = writeln!(writer, "  - {}", candidate);
        }
    }

    match &report.cached {
        Some(CacheState::Resolved(name)) => {
            let _ = writeln!(writer, "  {} {}", "cached:".dimmed(), name);
        }
        Some(CacheState::Failed) => {
            let _ = writeln!(writer, "  {} previously failed", "cached:".dimmed());
        }
        None => {}
    }
}

pub fn print_works_to<W: Write>(summary: &WorksSummary, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Wrote {} work title(s) to {}",
            summary.works.len(),
            summary.output_path.display()
        )
        .green()
    );
}

pub fn print_init_to<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
}
