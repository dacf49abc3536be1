// src/matching/scorer.rs
use crate::skills::SkillSet;

/// Jaccard similarity of two skill sets scaled to 0..=100.
///
/// An empty reference set carries no signal and scores 0.
pub fn match_score(reference: &SkillSet, candidate: &SkillSet) -> f64 {
    if reference.is_empty() {
        return 0.0;
    }

    let union = reference.union_len(candidate);
    let intersection = reference.intersection_len(candidate);

    100.0 * intersection as f64 / union as f64
}

/// Score rounded to a whole percentage, as shown on ranked records
pub fn rounded_score(reference: &SkillSet, candidate: &SkillSet) -> u32 {
    match_score(reference, candidate).round() as u32
}
