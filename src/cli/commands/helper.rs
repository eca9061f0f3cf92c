use std::env;

use anyhow::{Context, Result};

use crate::cli::args::CommonArgs;
use crate::config::{ConfigLoadResult, ConfigOverrides, load_config};

/// Loads the config for a command: file, then environment, then CLI overrides.
pub fn load_app_config(common: &CommonArgs, overrides: &ConfigOverrides) -> Result<ConfigLoadResult> {
    let cwd = env::current_dir().context("Failed to get current directory")?;
    let mut loaded = load_config(&cwd, common.config.as_deref())?;

    loaded.config.fill_from_env(|key| env::var(key).ok());
    loaded.config.apply_overrides(overrides);
    loaded.config.validate()?;
    Ok(loaded)
}

pub fn log_config_source(loaded: &ConfigLoadResult) {
    match &loaded.path {
        Some(path) => tracing::debug!("Using config file {}", path.display()),
        None => tracing::debug!("No config file found, using defaults"),
    }
}
