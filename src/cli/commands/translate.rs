use std::time::Duration;

use anyhow::{Context, Result};

use super::helper::{load_app_config, log_config_source};
use super::{CommandResult, CommandSummary, RunReport};
use crate::batch::BatchDisambiguator;
use crate::cache::CacheStore;
use crate::cli::args::RunCommand;
use crate::logging::init_logging;
use crate::lookup::create_sources;
use crate::pipeline::{Pipeline, PipelineOptions};
use crate::rate_limit::RateLimiter;
use crate::record::RecordSource;
use crate::resolver::NameResolver;
use crate::translator::create_translator;
use crate::writer::ResultWriter;

pub fn translate(cmd: RunCommand) -> Result<CommandResult> {
    let args = cmd.args;
    let loaded = load_app_config(&args.common, &args.overrides())?;
    let config = &loaded.config;
    init_logging(&config.files.log_path, args.common.verbose)?;
    log_config_source(&loaded);

    let translator = create_translator(config.default_provider, config)?;
    let delimiter = config.delimiter()?;
    let files = &config.files;
    let processing = &config.processing;

    let cache = CacheStore::load_with_failures(&files.output_path, &files.failed_path, delimiter)?;
    tracing::info!("Loaded {} cached tag(s)", cache.len());

    let mut resolver = NameResolver::new(
        create_sources(config)?,
        RateLimiter::from_rate(processing.requests_per_second),
    );
    tracing::debug!(
        sources = ?resolver.source_names(),
        provider = %config.default_provider,
        "Starting run"
    );

    let rows = RecordSource::open(&files.input_path, delimiter, processing.min_fields)?;
    let mut writer = ResultWriter::open(&files.output_path, &files.failed_path, delimiter)?;

    let batch = BatchDisambiguator::new(
        processing.batch_size,
        RateLimiter::from_rate(processing.requests_per_second),
    );
    let options = PipelineOptions {
        prompt_prefix: config.openai.prompt.clone(),
        record_delay: Duration::try_from_secs_f64(processing.sleep_sec)
            .context("Invalid 'processing.sleep_sec'")?,
    };

    let mut pipeline = Pipeline::new(&cache, &mut resolver, translator.as_ref(), batch, options);
    let summary = pipeline.run(rows, &mut writer)?;
    writer.flush()?;

    tracing::info!(
        read = summary.read,
        cache_hits = summary.cache_hits,
        resolved = summary.resolved(),
        failed = summary.failed,
        "Run complete"
    );

    let failure_count = summary.failed;
    Ok(CommandResult {
        summary: CommandSummary::Run(RunReport {
            summary,
            output_path: files.output_path.clone(),
            failed_path: files.failed_path.clone(),
        }),
        failure_count,
    })
}
