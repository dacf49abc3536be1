// src/engine.rs
//! Matching service used by the HTTP handlers and the CLI

use crate::app_log;
use crate::core::ConfigManager;
use crate::extraction::{build_extractor, ExtractorStrategy, SkillExtractor};
use crate::matching::{match_score, RankedList, Ranker};
use crate::types::{Job, JobDraft, Profile, ProfileUpdate};
use crate::utils::non_blank;
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;

pub struct SkillEngine {
    extractor: Arc<dyn SkillExtractor>,
    ranker: Ranker,
}

impl SkillEngine {
    pub fn new(extractor: Arc<dyn SkillExtractor>, ranker: Ranker) -> Self {
        Self { extractor, ranker }
    }

    pub fn from_config(config: &ConfigManager) -> Result<Self> {
        let vocabulary = Arc::new(config.load_vocabulary()?);
        let extractor = build_extractor(&config.completion, vocabulary)?;
        let ranker = Ranker::new(config.environment.recommendation_limit);
        Ok(Self::new(extractor, ranker))
    }

    pub fn strategy(&self) -> ExtractorStrategy {
        self.extractor.strategy()
    }

    pub fn ranker(&self) -> Ranker {
        self.ranker
    }

    pub async fn extract_skills(&self, text: &str) -> Vec<String> {
        self.extractor.extract(text).await
    }

    /// Score of one profile against one job, the job's skills being the reference
    pub fn match_score(&self, job: &Job, profile: &Profile) -> f64 {
        match_score(&job.skill_set(), &profile.skill_set())
    }

    pub fn recommend_jobs(&self, profile: &Profile, jobs: Vec<Job>) -> RankedList<Job> {
        self.recommend_jobs_with(self.ranker, profile, jobs)
    }

    pub fn recommend_jobs_with(&self, ranker: Ranker, profile: &Profile, jobs: Vec<Job>) -> RankedList<Job> {
        ranker.rank(&profile.skill_set(), jobs, Job::skill_set)
    }

    pub fn recommend_candidates(&self, job: &Job, profiles: Vec<Profile>) -> RankedList<Profile> {
        self.ranker.rank(&job.skill_set(), profiles, Profile::skill_set)
    }

    /// Turn a validated posting into a job, extracting skills from its description
    pub async fn prepare_job(&self, draft: JobDraft, created_by: Option<String>) -> Job {
        let ai_extracted_skills = self.extract_skills(&draft.description).await;
        app_log!(
            info,
            "Extracted {} skills for job '{}' ({})",
            ai_extracted_skills.len(),
            draft.title,
            self.strategy()
        );
        draft.into_job(created_by, ai_extracted_skills)
    }

    /// Apply a partial update. A new bio is mined for skills; extracted
    /// skills are replaced only when the bio yielded some.
    pub async fn apply_profile_update(&self, mut profile: Profile, update: ProfileUpdate) -> Profile {
        if let Some(full_name) = non_blank(update.full_name) {
            profile.full_name = Some(full_name);
        }

        if let Some(skills) = update.skills {
            profile.skills = skills.into_terms();
        }

        if let Some(bio) = non_blank(update.bio) {
            let extracted = self.extract_skills(&bio).await;
            if !extracted.is_empty() {
                profile.ai_extracted_skills = extracted;
            }
            profile.bio = Some(bio);
        }

        profile.updated_at = Utc::now();
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::FallbackExtractor;
    use crate::skills::Vocabulary;
    use crate::types::{NewJob, TermList};

    fn engine(limit: usize) -> SkillEngine {
        let extractor = Arc::new(FallbackExtractor::new(Arc::new(Vocabulary::default())));
        SkillEngine::new(extractor, Ranker::new(limit))
    }

    fn draft(title: &str, requirements: &str, description: &str) -> JobDraft {
        NewJob {
            title: title.to_string(),
            description: description.to_string(),
            requirements: TermList::Text(requirements.to_string()),
            salary: 5000.0,
            location: "Remote".to_string(),
            job_type: "Full Time".to_string(),
            experience: 2,
            positions: 1,
            company: None,
        }
        .validate()
        .unwrap()
    }

    fn profile(user: &str, skills: &[&str]) -> Profile {
        let mut profile = Profile::new(user);
        profile.skills = skills.iter().map(|s| s.to_string()).collect();
        profile
    }

    #[tokio::test]
    async fn test_prepare_job_extracts_from_description() {
        let engine = engine(10);
        let job = engine
            .prepare_job(
                draft("Platform Engineer", "Kubernetes", "We run Docker and Terraform on AWS daily."),
                Some("r1".to_string()),
            )
            .await;

        assert_eq!(job.ai_extracted_skills, vec!["Docker", "Terraform", "AWS"]);
        assert_eq!(job.created_by.as_deref(), Some("r1"));
    }

    #[tokio::test]
    async fn test_job_match_score() {
        let engine = engine(10);
        let job = draft("Web Developer", "javascript, react, node.js", "Frontend and backend work.")
            .into_job(None, Vec::new());
        let applicant = profile("u1", &["JavaScript", "React", "Redux"]);

        assert_eq!(engine.match_score(&job, &applicant), 50.0);
        assert_eq!(engine.match_score(&job, &profile("u2", &[])), 0.0);
    }

    #[tokio::test]
    async fn test_recommend_jobs_ranks_and_truncates() {
        let engine = engine(2);
        let jobs = vec![
            draft("Data Engineer", "Python, SQL, Spark", "Pipelines at scale.").into_job(None, vec![]),
            draft("PHP Developer", "PHP, Laravel", "Maintain the shop.").into_job(None, vec![]),
            draft("ML Engineer", "Python, PyTorch", "Train the models.").into_job(None, vec![]),
        ];
        let user = profile("u1", &["python", "pytorch"]);

        let ranked = engine.recommend_jobs(&user, jobs);
        let titles: Vec<_> = ranked.records().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["ML Engineer", "Data Engineer"]);
        assert_eq!(ranked.entries()[0].match_score, Some(100));
        assert_eq!(ranked.entries()[1].match_score, Some(25));
    }

    #[tokio::test]
    async fn test_recommend_without_skills_keeps_order() {
        let engine = engine(10);
        let jobs = vec![
            draft("First Job", "Go", "Write some services.").into_job(None, vec![]),
            draft("Second Job", "Rust", "Write some services.").into_job(None, vec![]),
        ];

        let ranked = engine.recommend_jobs(&profile("u1", &[]), jobs);
        let titles: Vec<_> = ranked.records().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["First Job", "Second Job"]);
        assert!(ranked.iter().all(|e| e.match_score.is_none()));
    }

    #[tokio::test]
    async fn test_recommend_candidates() {
        let engine = engine(10);
        let job = draft("Backend", "Node.js, MongoDB", "APIs and data stores.").into_job(None, vec![]);
        let profiles = vec![
            profile("designer", &["Figma"]),
            profile("dev", &["Node.js", "MongoDB"]),
        ];

        let ranked = engine.recommend_candidates(&job, profiles);
        let users: Vec<_> = ranked.records().map(|p| p.user_id.as_str()).collect();
        assert_eq!(users, vec!["dev", "designer"]);
    }

    #[tokio::test]
    async fn test_profile_update_rules() {
        let engine = engine(10);
        let mut existing = profile("u1", &["Java"]);
        existing.ai_extracted_skills = vec!["Spring Boot".to_string()];

        // bio without recognizable skills keeps previous extraction
        let updated = engine
            .apply_profile_update(
                existing,
                ProfileUpdate {
                    full_name: Some("Ada".to_string()),
                    bio: Some("I like long walks".to_string()),
                    skills: None,
                },
            )
            .await;
        assert_eq!(updated.full_name.as_deref(), Some("Ada"));
        assert_eq!(updated.skills, vec!["Java"]);
        assert_eq!(updated.ai_extracted_skills, vec!["Spring Boot"]);
        assert_eq!(updated.bio.as_deref(), Some("I like long walks"));

        let updated = engine
            .apply_profile_update(
                updated,
                ProfileUpdate {
                    full_name: None,
                    bio: Some("Now writing Rust and Go".to_string()),
                    skills: Some(TermList::Text("Rust, Go".to_string())),
                },
            )
            .await;
        assert_eq!(updated.full_name.as_deref(), Some("Ada"));
        assert_eq!(updated.skills, vec!["Rust", "Go"]);
        assert_eq!(updated.ai_extracted_skills, vec!["Rust", "Go"]);
    }
}
