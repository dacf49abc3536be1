//! Skill-based matching between job postings and candidate profiles.

pub mod auth;
pub mod cli;
pub mod core;
pub mod engine;
pub mod extraction;
pub mod matching;
pub mod skills;
pub mod types;
pub mod utils;
pub mod web;

pub use engine::SkillEngine;
pub use matching::{match_score, RankedList, Ranker, ScoredEntity};
pub use skills::{SkillSet, Vocabulary};
pub use web::{build_rocket, start_web_server};

/// Application log line, forwarded to `tracing` at the given level
#[macro_export]
macro_rules! app_log {
    ($level:ident, $($arg:tt)+) => {
        ::tracing::$level!($($arg)+)
    };
}
