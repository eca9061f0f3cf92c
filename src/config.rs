use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use serde::{Deserialize, Serialize};

use crate::lookup::SourceKind;
use crate::lookup::danbooru::DANBOORU_BASE_URL;
use crate::translator::Provider;

pub const CONFIG_FILE_NAME: &str = "config.yaml";

pub const DEFAULT_PROMPT: &str = "For each tag below, choose the most appropriate Japanese name from its candidates. \
Reply with exactly one name per line, in the same order as the tags, and nothing else.\n";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
    #[serde(default)]
    pub resolution: ResolutionConfig,
    #[serde(default)]
    pub default_provider: Provider,
    #[serde(default)]
    pub danbooru: DanbooruConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub anthropic: AnthropicConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilesConfig {
    #[serde(default = "default_input_path")]
    pub input_path: PathBuf,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    #[serde(default = "default_failed_path")]
    pub failed_path: PathBuf,
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProcessingConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_sleep_sec")]
    pub sleep_sec: f64,
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: f64,
    #[serde(default = "default_min_fields")]
    pub min_fields: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolutionConfig {
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceKind>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DanbooruConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_danbooru_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_prompt")]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_openai_model")]
    pub model: String,
    #[serde(default = "default_openai_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnthropicConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_anthropic_model")]
    pub model: String,
}

fn default_input_path() -> PathBuf {
    PathBuf::from("tags.csv")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("translated.csv")
}

fn default_failed_path() -> PathBuf {
    PathBuf::from("failed.csv")
}

fn default_log_path() -> PathBuf {
    PathBuf::from("translation_failures.log")
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_batch_size() -> usize {
    10
}

fn default_sleep_sec() -> f64 {
    0.5
}

fn default_requests_per_second() -> f64 {
    4.0
}

fn default_min_fields() -> usize {
    1
}

fn default_sources() -> Vec<SourceKind> {
    vec![SourceKind::Danbooru]
}

fn default_danbooru_url() -> String {
    DANBOORU_BASE_URL.to_string()
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-5-haiku-latest".to_string()
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            input_path: default_input_path(),
            output_path: default_output_path(),
            failed_path: default_failed_path(),
            log_path: default_log_path(),
            delimiter: default_delimiter(),
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            sleep_sec: default_sleep_sec(),
            requests_per_second: default_requests_per_second(),
            min_fields: default_min_fields(),
        }
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
        }
    }
}

impl Default for DanbooruConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            api_key: String::new(),
            base_url: default_danbooru_url(),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            api_key: None,
            model: default_openai_model(),
            base_url: default_openai_url(),
        }
    }
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_anthropic_model(),
        }
    }
}

/// Call-time values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub failed_path: Option<PathBuf>,
    pub batch_size: Option<usize>,
    pub sleep_sec: Option<f64>,
    pub provider: Option<Provider>,
    pub sources: Vec<SourceKind>,
}

impl AppConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.processing.batch_size == 0 {
            bail!("Invalid 'processing.batch_size': must be at least 1");
        }
        let sleep = self.processing.sleep_sec;
        if !sleep.is_finite() || sleep < 0.0 {
            bail!("Invalid 'processing.sleep_sec': {}", sleep);
        }
        let rate = self.processing.requests_per_second;
        if !rate.is_finite() || rate <= 0.0 {
            bail!("Invalid 'processing.requests_per_second': {}", rate);
        }
        self.delimiter()
            .with_context(|| format!("Invalid 'files.delimiter': {:?}", self.files.delimiter))?;
        if self.resolution.sources.is_empty() {
            bail!("Invalid 'resolution.sources': at least one source is required");
        }
        Ok(())
    }

    /// The field delimiter as a single byte.
    pub fn delimiter(&self) -> Result<u8> {
        let mut chars = self.files.delimiter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii() => Ok(c as u8),
            _ => bail!("delimiter must be a single ASCII character"),
        }
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(path) = &overrides.input_path {
            self.files.input_path = path.clone();
        }
        if let Some(path) = &overrides.output_path {
            self.files.output_path = path.clone();
        }
        if let Some(path) = &overrides.failed_path {
            self.files.failed_path = path.clone();
        }
        if let Some(batch_size) = overrides.batch_size {
            self.processing.batch_size = batch_size;
        }
        if let Some(sleep_sec) = overrides.sleep_sec {
            self.processing.sleep_sec = sleep_sec;
        }
        if let Some(provider) = overrides.provider {
            self.default_provider = provider;
        }
        if !overrides.sources.is_empty() {
            self.resolution.sources = overrides.sources.clone();
        }
    }

    /// Fills credentials left empty in the file from environment variables.
    pub fn fill_from_env(&mut self, get: impl Fn(&str) -> Option<String>) {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());

        if !present(&self.openai.api_key) {
            self.openai.api_key = get("OPENAI_API_KEY");
        }
        if !present(&self.anthropic.api_key) {
            self.anthropic.api_key = get("ANTHROPIC_API_KEY");
        }
        if self.danbooru.username.trim().is_empty()
            && let Some(username) = get("DANBOORU_USERNAME")
        {
            self.danbooru.username = username;
        }
        if self.danbooru.api_key.trim().is_empty()
            && let Some(api_key) = get("DANBOORU_API_KEY")
        {
            self.danbooru.api_key = api_key;
        }
    }
}

pub fn default_config_yaml() -> Result<String> {
    let config = AppConfig::default();
    serde_yaml::to_string(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: AppConfig,
    /// The file the config was read from, or `None` when using defaults.
    pub path: Option<PathBuf>,
}

pub fn load_config_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: AppConfig = if content.trim().is_empty() {
        AppConfig::default()
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?
    };
    Ok(config)
}

/// Loads `explicit` if given, otherwise searches upward from `start_dir`.
pub fn load_config(start_dir: &Path, explicit: Option<&Path>) -> Result<ConfigLoadResult> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file(start_dir),
    };
    match path {
        Some(path) => {
            let config = load_config_file(&path)?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: AppConfig::default(),
            path: None,
        }),
    }
}
