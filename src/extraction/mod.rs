// src/extraction/mod.rs
//! Skill extraction from free text (bios, job descriptions)
//!
//! Two strategies behind one trait. The external one asks a chat-completion
//! service and keeps only curated terms; the fallback one matches
//! whitespace tokens against the vocabulary. The choice is made once, when
//! the extractor is built.

use crate::app_log;
use crate::core::config_manager::CompletionConfig;
use crate::skills::Vocabulary;
use anyhow::Result;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

pub mod external;
pub mod fallback;

pub use external::{CompletionClient, ExternalExtractor};
pub use fallback::FallbackExtractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorStrategy {
    External,
    Fallback,
}

impl fmt::Display for ExtractorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractorStrategy::External => write!(f, "external"),
            ExtractorStrategy::Fallback => write!(f, "fallback"),
        }
    }
}

#[rocket::async_trait]
pub trait SkillExtractor: Send + Sync {
    fn strategy(&self) -> ExtractorStrategy;

    /// Recognized skill terms in their curated spelling, without duplicates.
    /// Failures are logged and yield an empty list.
    async fn extract(&self, text: &str) -> Vec<String>;
}

/// Pick the strategy from configuration: credentials present means external.
pub fn build_extractor(
    config: &CompletionConfig,
    vocabulary: Arc<Vocabulary>,
) -> Result<Arc<dyn SkillExtractor>> {
    match &config.api_key {
        Some(api_key) => {
            let client = CompletionClient::new(
                api_key.clone(),
                config.base_url.clone(),
                config.model.clone(),
                config.timeout_seconds,
            )?;
            app_log!(
                info,
                "Skill extraction via completion service {} (model {})",
                config.base_url,
                config.model
            );
            Ok(Arc::new(ExternalExtractor::new(client, vocabulary)))
        }
        None => {
            app_log!(
                info,
                "No completion API key configured, using vocabulary skill extraction"
            );
            Ok(Arc::new(FallbackExtractor::new(vocabulary)))
        }
    }
}

/// Append `term` unless already present
pub(crate) fn push_unique(terms: &mut Vec<String>, term: &str) {
    if !terms.iter().any(|t| t == term) {
        terms.push(term.to_string());
    }
}
