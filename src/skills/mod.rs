// src/skills/mod.rs
//! Skill terms: normalization into comparable sets, and the curated vocabulary

use serde::Serialize;
use std::collections::BTreeSet;

pub mod vocabulary;

pub use vocabulary::Vocabulary;

/// Normalized skill terms: trimmed, lower-cased, non-empty, no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SkillSet {
    terms: BTreeSet<String>,
}

impl SkillSet {
    /// Build a set from free-text entries. Never fails.
    pub fn normalize<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = entries
            .into_iter()
            .filter_map(|entry| normalize_term(entry.as_ref()))
            .collect();

        Self { terms }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Membership test; the query goes through the same normalization.
    pub fn contains(&self, term: &str) -> bool {
        normalize_term(term).is_some_and(|t| self.terms.contains(&t))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    pub fn intersection_len(&self, other: &SkillSet) -> usize {
        self.terms.intersection(&other.terms).count()
    }

    pub fn union_len(&self, other: &SkillSet) -> usize {
        self.terms.union(&other.terms).count()
    }
}

impl<S: AsRef<str>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::normalize(iter)
    }
}

fn normalize_term(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
