// src/matching/ranker.rs
use super::scorer::rounded_score;
use crate::app_log;
use crate::skills::SkillSet;
use serde::Serialize;

pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 10;

/// A caller record paired with its match score.
///
/// `match_score` is `None` when the ranker had no reference skills to score
/// against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredEntity<T> {
    #[serde(flatten)]
    pub record: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<u32>,
}

/// Ranking output: best score first, ties in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RankedList<T> {
    entries: Vec<ScoredEntity<T>>,
}

impl<T> RankedList<T> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredEntity<T>> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[ScoredEntity<T>] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ScoredEntity<T>> {
        self.entries
    }

    pub fn records(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.record)
    }
}

impl<T> IntoIterator for RankedList<T> {
    type Item = ScoredEntity<T>;
    type IntoIter = std::vec::IntoIter<ScoredEntity<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Ranker {
    limit: usize,
}

impl Ranker {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Score every candidate against `reference` and keep the best `limit`.
    ///
    /// With an empty reference nothing is scored: the first `limit`
    /// candidates come back in their input order.
    pub fn rank<T, F>(&self, reference: &SkillSet, candidates: Vec<T>, skills_of: F) -> RankedList<T>
    where
        F: Fn(&T) -> SkillSet,
    {
        if reference.is_empty() {
            app_log!(
                debug,
                "No reference skills, returning first {} of {} candidates unscored",
                self.limit,
                candidates.len()
            );
            let entries = candidates
                .into_iter()
                .take(self.limit)
                .map(|record| ScoredEntity {
                    record,
                    match_score: None,
                })
                .collect();
            return RankedList { entries };
        }

        let mut scored: Vec<(u32, T)> = candidates
            .into_iter()
            .map(|record| {
                let score = rounded_score(reference, &skills_of(&record));
                (score, record)
            })
            .collect();

        // sort_by is stable: equal scores keep input order
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.truncate(self.limit);

        app_log!(
            debug,
            "Ranked {} candidates against {} reference skills",
            scored.len(),
            reference.len()
        );

        let entries = scored
            .into_iter()
            .map(|(score, record)| ScoredEntity {
                record,
                match_score: Some(score),
            })
            .collect();

        RankedList { entries }
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(DEFAULT_RECOMMENDATION_LIMIT)
    }
}
