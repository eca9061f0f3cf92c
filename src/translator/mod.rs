//! AI translator capability.
//!
//! The pipeline only needs `translate(prompt) -> answers`, one answer per
//! line of the model reply. Provider selection is configuration.

use std::fmt;

use anyhow::{Result, bail};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

mod anthropic;
mod openai;

pub use anthropic::AnthropicTranslator;
pub use openai::OpenAiTranslator;

pub trait Translator {
    fn provider_name(&self) -> &str;

    /// Sends `prompt` and returns the reply split into answers, in order.
    fn translate(&self, prompt: &str) -> Result<Vec<String>>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    #[value(name = "openai")]
    OpenAi,
    Anthropic,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::OpenAi => f.write_str("openai"),
            Provider::Anthropic => f.write_str("anthropic"),
        }
    }
}

/// Builds the translator for `provider` from the configured credentials.
///
/// Fails when the provider has no API key; callers treat this as fatal.
pub fn create_translator(provider: Provider, config: &AppConfig) -> Result<Box<dyn Translator>> {
    match provider {
        Provider::OpenAi => {
            let settings = &config.openai;
            let Some(api_key) = settings.api_key.as_deref().filter(|k| !k.trim().is_empty())
            else {
                bail!("missing OpenAI API key (set openai.api_key or OPENAI_API_KEY)");
            };
            Ok(Box::new(OpenAiTranslator::new(
                api_key.to_string(),
                settings.base_url.clone(),
                settings.model.clone(),
            )?))
        }
        Provider::Anthropic => {
            let settings = &config.anthropic;
            let Some(api_key) = settings.api_key.as_deref().filter(|k| !k.trim().is_empty())
            else {
                bail!("missing Anthropic API key (set anthropic.api_key or ANTHROPIC_API_KEY)");
            };
            Ok(Box::new(AnthropicTranslator::new(
                api_key.to_string(),
                settings.model.clone(),
            )?))
        }
    }
}

/// Splits a model reply into one answer per line, in order.
///
/// Blank lines inside the reply are kept as empty answers so later answers
/// stay aligned with their items. Blank lines before the first and after the
/// last answer are dropped.
pub fn split_answers(reply: &str) -> Vec<String> {
    let lines: Vec<&str> = reply.lines().map(str::trim).collect();
    let Some(start) = lines.iter().position(|line| !line.is_empty()) else {
        return Vec::new();
    };
    let end = lines
        .iter()
        .rposition(|line| !line.is_empty())
        .unwrap_or(start);
    lines[start..=end].iter().map(|line| line.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_answers() {
        let reply = "\n博麗霊夢\n  霧雨魔理沙  \nチルノ\n\n";
        assert_eq!(split_answers(reply), vec!["博麗霊夢", "霧雨魔理沙", "チルノ"]);
        assert!(split_answers("  \n").is_empty());
        assert!(split_answers("").is_empty());
    }

    #[test]
    fn test_split_answers_keeps_inner_blank_lines() {
        assert_eq!(split_answers("甲\n\n丙"), vec!["甲", "", "丙"]);
        assert_eq!(split_answers("甲\r\n  \r\n丙\r\n"), vec!["甲", "", "丙"]);
    }

    #[test]
    fn test_missing_key_is_error() {
        let mut config = AppConfig::default();
        config.openai.api_key = None;
        config.anthropic.api_key = Some("   ".into());

        let err = create_translator(Provider::OpenAi, &config).err().unwrap();
        assert!(err.to_string().contains("OpenAI API key"));
        assert!(create_translator(Provider::Anthropic, &config).is_err());
    }

    #[test]
    fn test_create_with_key() {
        let mut config = AppConfig::default();
        config.openai.api_key = Some("sk-test".into());
        config.anthropic.api_key = Some("sk-ant-test".into());

        let openai = create_translator(Provider::OpenAi, &config).unwrap();
        assert_eq!(openai.provider_name(), "openai");
        let anthropic = create_translator(Provider::Anthropic, &config).unwrap();
        assert_eq!(anthropic.provider_name(), "anthropic");
    }

    #[test]
    fn test_provider_serde_names() {
        let provider: Provider = serde_yaml::from_str("openai").unwrap();
        assert_eq!(provider, Provider::OpenAi);
        let provider: Provider = serde_yaml::from_str("anthropic").unwrap();
        assert_eq!(provider, Provider::Anthropic);
        assert_eq!(Provider::OpenAi.to_string(), "openai");
    }
}
