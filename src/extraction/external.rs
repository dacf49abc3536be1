// src/extraction/external.rs
//! Skill extraction through an OpenAI-compatible chat-completion service.
//!
//! Suggested terms are kept only when the vocabulary knows them. The lookup
//! ignores case and surrounding blanks (`"javascript"` and `" PYTHON "` are
//! kept as `"JavaScript"` and `"Python"`), unlike the fallback strategy,
//! which matches tokens exactly.

use super::{push_unique, ExtractorStrategy, SkillExtractor};
use crate::app_log;
use crate::skills::Vocabulary;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const CHAT_COMPLETIONS_ENDPOINT: &str = "/chat/completions";
const EXTRACTION_TEMPERATURE: f32 = 0.3;

const EXTRACTION_INSTRUCTION: &str = "Extract technical and professional skills from the given text. \
Return only the skills as a JSON array of strings. \
Focus on programming languages, frameworks, tools, and technologies.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Minimal chat-completion client (OpenAI-compatible `/chat/completions`)
pub struct CompletionClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl CompletionClient {
    pub fn new(api_key: String, base_url: String, model: String, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    /// Send one system + user exchange and return the reply text
    pub async fn send_completion(&self, instruction: &str, content: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, CHAT_COMPLETIONS_ENDPOINT);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: instruction,
                },
                ChatMessage {
                    role: "user",
                    content,
                },
            ],
            temperature: EXTRACTION_TEMPERATURE,
        };

        app_log!(trace, "Calling completion service: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to completion service")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("Completion service returned error {}: {}", status, error_text);
        }

        let chat: ChatResponse = response
            .json()
            .await
            .context("Failed to parse completion service response")?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow::anyhow!("Completion service returned no content"))
    }
}

/// Skills suggested by the completion service, filtered to the vocabulary
pub struct ExternalExtractor {
    client: CompletionClient,
    vocabulary: Arc<Vocabulary>,
}

impl ExternalExtractor {
    pub fn new(client: CompletionClient, vocabulary: Arc<Vocabulary>) -> Self {
        Self { client, vocabulary }
    }

    async fn try_extract(&self, text: &str) -> Result<Vec<String>> {
        let reply = self
            .client
            .send_completion(EXTRACTION_INSTRUCTION, text)
            .await?;

        let suggested = parse_skill_list(&reply)?;
        let skills = filter_to_vocabulary(&suggested, &self.vocabulary);

        app_log!(
            debug,
            "Completion service suggested {} skills, {} recognized",
            suggested.len(),
            skills.len()
        );

        Ok(skills)
    }
}

#[rocket::async_trait]
impl SkillExtractor for ExternalExtractor {
    fn strategy(&self) -> ExtractorStrategy {
        ExtractorStrategy::External
    }

    async fn extract(&self, text: &str) -> Vec<String> {
        match self.try_extract(text).await {
            Ok(skills) => skills,
            Err(e) => {
                app_log!(error, "Skill extraction failed: {:#}", e);
                Vec::new()
            }
        }
    }
}

/// Parse a reply expected to hold a JSON array of strings.
///
/// A surrounding markdown code fence is tolerated; non-string items are
/// skipped.
pub fn parse_skill_list(reply: &str) -> Result<Vec<String>> {
    let payload = strip_code_fence(reply);

    let items: Vec<serde_json::Value> = serde_json::from_str(payload)
        .with_context(|| format!("Completion reply is not a JSON array: {}", reply))?;

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            serde_json::Value::String(s) => Some(s),
            _ => None,
        })
        .collect())
}

/// Keep curated terms only, in vocabulary spelling, first occurrence wins
pub fn filter_to_vocabulary(suggested: &[String], vocabulary: &Vocabulary) -> Vec<String> {
    let mut skills = Vec::new();
    for term in suggested {
        if let Some(canonical) = vocabulary.canonical(term) {
            push_unique(&mut skills, canonical);
        }
    }
    skills
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
