//! External name sources queried by the resolver.
//!
//! Every source returns a [`LookupOutcome`] instead of raising: network,
//! auth and decode problems are reported as `Failed` so the resolver can
//! decide to move on to the next tier.

use std::{fmt, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod danbooru;
pub mod pixiv;
pub mod wikipedia;

pub use danbooru::{DanbooruAuth, DanbooruWiki};
pub use pixiv::{PIXIV_DIC_BASE_URL, PixivDictionary};
pub use wikipedia::{WIKIPEDIA_API_URL, WikipediaLanglinks};

use crate::config::AppConfig;

pub const USER_AGENT: &str = concat!(
    "transchara/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/osuiso-depot/trans_chara)"
);

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LookupError::Parse(err.to_string())
        } else {
            LookupError::Network(err.to_string())
        }
    }
}

/// Result of asking one source about one tag.
#[derive(Debug)]
pub enum LookupOutcome {
    /// Candidate names in source order. May be empty.
    Found(Vec<String>),
    /// The source has no entry for the tag.
    Empty,
    Failed(LookupError),
}

impl LookupOutcome {
    pub fn single(name: String) -> Self {
        if name.trim().is_empty() {
            LookupOutcome::Empty
        } else {
            LookupOutcome::Found(vec![name])
        }
    }
}

/// A collaborator that maps a tag to Japanese name candidates.
pub trait LookupSource {
    fn name(&self) -> &'static str;
    fn lookup(&self, tag: &str) -> LookupOutcome;
}

/// Identifies a source in configuration and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Danbooru tag wiki (`other_names`)
    Danbooru,
    /// English Wikipedia language links
    Wikipedia,
    /// Pixiv encyclopedia page title
    Pixiv,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Danbooru => "danbooru",
            SourceKind::Wikipedia => "wikipedia",
            SourceKind::Pixiv => "pixiv",
        };
        f.write_str(name)
    }
}

impl FromStr for SourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        <Self as ValueEnum>::from_str(s, true).map_err(|e| anyhow::anyhow!(e))
    }
}

/// Builds the configured source for `kind`.
pub fn create_source(kind: SourceKind, config: &AppConfig) -> Result<Box<dyn LookupSource>> {
    let source: Box<dyn LookupSource> = match kind {
        SourceKind::Danbooru => Box::new(DanbooruWiki::new(
            config.danbooru.base_url.clone(),
            DanbooruAuth {
                username: config.danbooru.username.clone(),
                api_key: config.danbooru.api_key.clone(),
            },
        )?),
        SourceKind::Wikipedia => Box::new(WikipediaLanglinks::new(WIKIPEDIA_API_URL, "ja")?),
        SourceKind::Pixiv => Box::new(PixivDictionary::new(PIXIV_DIC_BASE_URL)?),
    };
    Ok(source)
}

/// Builds the resolver tiers in configured order.
pub fn create_sources(config: &AppConfig) -> Result<Vec<Box<dyn LookupSource>>> {
    config
        .resolution
        .sources
        .iter()
        .map(|kind| {
            create_source(*kind, config).with_context(|| format!("Failed to set up source '{}'", kind))
        })
        .collect()
}

pub(crate) fn http_client() -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(HTTP_TIMEOUT)
        .build()
        .context("failed to build HTTP client")
}

/// Converts an underscore tag into an encyclopedia-style title.
///
/// Underscores become spaces and each alphabetic run is capitalized.
///
/// # Examples
///
/// ```
/// use transchara::lookup::format_title;
///
/// assert_eq!(format_title("mystia_lorelei"), "Mystia Lorelei");
/// assert_eq!(format_title("HATSUNE_miku"), "Hatsune Miku");
/// ```
pub fn format_title(tag: &str) -> String {
    let mut title = String::with_capacity(tag.len());
    let mut in_word = false;
    for c in tag.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if in_word {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            title.push(c);
            in_word = false;
        }
    }
    title
}
