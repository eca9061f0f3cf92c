use anyhow::Result;

use super::helper::{load_app_config, log_config_source};
use super::{CommandResult, CommandSummary, LookupReport};
use crate::cache::CacheStore;
use crate::cli::args::LookupCommand;
use crate::config::ConfigOverrides;
use crate::logging::init_logging;
use crate::lookup::create_sources;
use crate::rate_limit::RateLimiter;
use crate::resolver::NameResolver;

/// Resolves one tag through the configured tiers. Nothing is written.
pub fn lookup(cmd: LookupCommand) -> Result<CommandResult> {
    let overrides = ConfigOverrides {
        sources: cmd.sources,
        ..ConfigOverrides::default()
    };
    let loaded = load_app_config(&cmd.common, &overrides)?;
    let config = &loaded.config;
    init_logging(&config.files.log_path, cmd.common.verbose)?;
    log_config_source(&loaded);

    let cache = CacheStore::load_with_failures(
        &config.files.output_path,
        &config.files.failed_path,
        config.delimiter()?,
    )?;

    let mut resolver = NameResolver::new(
        create_sources(config)?,
        RateLimiter::from_rate(config.processing.requests_per_second),
    );
    let result = resolver.resolve(&cmd.tag);
    let cached = cache.get(&cmd.tag).cloned();

    Ok(CommandResult::new(CommandSummary::Lookup(LookupReport {
        tag: cmd.tag,
        sources: resolver.source_names(),
        result,
        cached,
    })))
}
