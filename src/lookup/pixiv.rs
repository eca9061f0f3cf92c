//! Pixiv encyclopedia fallback.
//!
//! Only the article `<title>` is read; the page body is not parsed.

use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use reqwest::blocking::Client;

use super::{LookupError, LookupOutcome, LookupSource, format_title, http_client};

pub const PIXIV_DIC_BASE_URL: &str = "https://dic.pixiv.net/a/";

static TITLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<title>([^<]+)とは.*? - ピクシブ百科事典</title>").expect("valid pixiv title regex")
});

pub struct PixivDictionary {
    client: Client,
    base_url: String,
}

impl PixivDictionary {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.into(),
        })
    }

    pub fn article_name(&self, title: &str) -> Result<Option<String>, LookupError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| LookupError::Network(format!("invalid Pixiv base url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| LookupError::Network("Pixiv base url cannot be a base".into()))?
            .pop_if_empty()
            .push(title);

        tracing::debug!(title = %title, url = %url, "Querying Pixiv encyclopedia");

        let response = self.client.get(url).send()?;
        if response.status() != reqwest::StatusCode::OK {
            return Ok(None);
        }
        let body = response.text()?;
        Ok(extract_article_name(&body))
    }
}

fn extract_article_name(html: &str) -> Option<String> {
    TITLE_REGEX
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
}

impl LookupSource for PixivDictionary {
    fn name(&self) -> &'static str {
        "pixiv"
    }

    fn lookup(&self, tag: &str) -> LookupOutcome {
        match self.article_name(&format_title(tag)) {
            Ok(Some(name)) => LookupOutcome::single(name),
            Ok(None) => LookupOutcome::Empty,
            Err(err) => LookupOutcome::Failed(err),
        }
    }
}
