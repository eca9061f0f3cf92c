//! English Wikipedia language-link lookup.

use std::collections::HashMap;

use anyhow::Result;
use reqwest::blocking::Client;
use serde::Deserialize;

use super::{LookupError, LookupOutcome, LookupSource, format_title, http_client};

pub const WIKIPEDIA_API_URL: &str = "https://en.wikipedia.org/w/api.php";

pub struct WikipediaLanglinks {
    client: Client,
    api_url: String,
    language: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<Query>,
}

#[derive(Debug, Deserialize)]
struct Query {
    #[serde(default)]
    pages: HashMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    missing: Option<serde_json::Value>,
    #[serde(default)]
    langlinks: Vec<Langlink>,
}

#[derive(Debug, Deserialize)]
struct Langlink {
    lang: String,
    #[serde(rename = "*")]
    title: String,
}

impl WikipediaLanglinks {
    pub fn new(api_url: impl Into<String>, language: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            api_url: api_url.into(),
            language: language.into(),
        })
    }

    /// Title of the target-language article linked from the English page, if any.
    pub fn linked_title(&self, title: &str) -> Result<Option<String>, LookupError> {
        tracing::debug!(title = %title, "Querying Wikipedia langlinks");

        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("prop", "langlinks"),
                ("lllang", self.language.as_str()),
                ("titles", title),
                ("redirects", "1"),
                ("format", "json"),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LookupError::Api(status.as_u16(), body));
        }

        let body = response.text()?;
        parse_linked_title(&body, &self.language)
    }
}

fn parse_linked_title(body: &str, language: &str) -> Result<Option<String>, LookupError> {
    let parsed: QueryResponse =
        serde_json::from_str(body).map_err(|e| LookupError::Parse(e.to_string()))?;
    let Some(query) = parsed.query else {
        return Ok(None);
    };
    Ok(query
        .pages
        .into_values()
        .filter(|page| page.missing.is_none())
        .flat_map(|page| page.langlinks)
        .find(|link| link.lang == language)
        .map(|link| link.title))
}

impl LookupSource for WikipediaLanglinks {
    fn name(&self) -> &'static str {
        "wikipedia"
    }

    fn lookup(&self, tag: &str) -> LookupOutcome {
        match self.linked_title(&format_title(tag)) {
            Ok(Some(title)) => LookupOutcome::single(title),
            Ok(None) => LookupOutcome::Empty,
            Err(err) => LookupOutcome::Failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_linked_title() {
        let body = r#"{
            "batchcomplete": "",
            "query": {
                "pages": {
                    "123": {
                        "pageid": 123,
                        "title": "Hatsune Miku",
                        "langlinks": [{ "lang": "ja", "*": "初音ミク" }]
                    }
                }
            }
        }"#;
        assert_eq!(
            parse_linked_title(body, "ja").unwrap(),
            Some("初音ミク".to_string())
        );
    }

    #[test]
    fn test_parse_missing_page() {
        let body = r#"{
            "query": {
                "pages": {
                    "-1": { "ns": 0, "title": "Nobody Here", "missing": "" }
                }
            }
        }"#;
        assert_eq!(parse_linked_title(body, "ja").unwrap(), None);
    }

    #[test]
    fn test_parse_page_without_target_language() {
        let body = r#"{
            "query": { "pages": { "5": { "title": "Chen", "langlinks": [{ "lang": "de", "*": "Chen" }] } } }
        }"#;
        assert_eq!(parse_linked_title(body, "ja").unwrap(), None);
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            parse_linked_title("<html>", "ja"),
            Err(LookupError::Parse(_))
        ));
    }
}
