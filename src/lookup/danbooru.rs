//! Danbooru tag wiki client.

use anyhow::Result;
use reqwest::{StatusCode, blocking::Client};
use serde::Deserialize;

use super::{LookupError, LookupOutcome, LookupSource, http_client};

pub const DANBOORU_BASE_URL: &str = "https://danbooru.donmai.us";

#[derive(Debug, Clone, Default)]
pub struct DanbooruAuth {
    pub username: String,
    pub api_key: String,
}

impl DanbooruAuth {
    fn is_set(&self) -> bool {
        !self.username.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}

/// The fields of a wiki page this tool cares about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WikiPage {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub other_names: Vec<String>,
}

pub struct DanbooruWiki {
    client: Client,
    base_url: String,
    auth: DanbooruAuth,
}

impl DanbooruWiki {
    pub fn new(base_url: impl Into<String>, auth: DanbooruAuth) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Fetches the wiki page for `tag`. `Ok(None)` means the page does not exist.
    pub fn wiki_page(&self, tag: &str) -> Result<Option<WikiPage>, LookupError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| LookupError::Network(format!("invalid Danbooru base url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| LookupError::Network("Danbooru base url cannot be a base".into()))?
            .pop_if_empty()
            .push("wiki_pages")
            .push(&format!("{tag}.json"));

        tracing::debug!(tag = %tag, url = %url, "Querying Danbooru wiki");

        let mut request = self.client.get(url);
        if self.auth.is_set() {
            request = request.query(&[
                ("login", self.auth.username.as_str()),
                ("api_key", self.auth.api_key.as_str()),
            ]);
        }
        let response = request.send()?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LookupError::Api(status.as_u16(), body));
        }

        let page: WikiPage = response.json()?;
        Ok(Some(page))
    }
}

impl LookupSource for DanbooruWiki {
    fn name(&self) -> &'static str {
        "danbooru"
    }

    fn lookup(&self, tag: &str) -> LookupOutcome {
        match self.wiki_page(tag) {
            Ok(Some(page)) => LookupOutcome::Found(clean_names(page.other_names)),
            Ok(None) => LookupOutcome::Empty,
            Err(err) => LookupOutcome::Failed(err),
        }
    }
}

/// Drops blank entries and surrounding whitespace, keeping source order.
fn clean_names(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}
