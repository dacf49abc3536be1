// src/matching/mod.rs
//! Set-overlap scoring and recommendation ranking

pub mod ranker;
pub mod scorer;

pub use ranker::{RankedList, Ranker, ScoredEntity, DEFAULT_RECOMMENDATION_LIMIT};
pub use scorer::{match_score, rounded_score};
