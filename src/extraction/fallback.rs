// src/extraction/fallback.rs
use super::{push_unique, ExtractorStrategy, SkillExtractor};
use crate::skills::Vocabulary;
use std::sync::Arc;

/// Whitespace tokens that exactly match a curated term
pub struct FallbackExtractor {
    vocabulary: Arc<Vocabulary>,
}

impl FallbackExtractor {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self { vocabulary }
    }

    pub fn extract_terms(&self, text: &str) -> Vec<String> {
        let mut skills = Vec::new();
        for token in text.split_whitespace() {
            if self.vocabulary.contains(token) {
                push_unique(&mut skills, token);
            }
        }
        skills
    }
}

#[rocket::async_trait]
impl SkillExtractor for FallbackExtractor {
    fn strategy(&self) -> ExtractorStrategy {
        ExtractorStrategy::Fallback
    }

    async fn extract(&self, text: &str) -> Vec<String> {
        self.extract_terms(text)
    }
}
