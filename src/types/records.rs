// src/types/records.rs
//! Job and profile records as the matching layer sees them

use crate::skills::SkillSet;
use crate::utils::{non_blank, split_comma_list};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Full Time")]
    FullTime,
    #[serde(rename = "Part Time")]
    PartTime,
    Contract,
    Internship,
}

impl JobType {
    pub const ALL: [JobType; 4] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
        JobType::Internship,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full Time",
            JobType::PartTime => "Part Time",
            JobType::Contract => "Contract",
            JobType::Internship => "Internship",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = ValidationError;

    /// Exact spelling only
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                ValidationError::new(format!(
                    "Job type must be exactly one of: Full Time, Part Time, Contract, Internship (got '{}')",
                    s
                ))
            })
    }
}

/// Rejected user input, reported back verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// A list of terms given either as a JSON array or a comma-separated string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TermList {
    List(Vec<String>),
    Text(String),
}

impl TermList {
    pub fn into_terms(self) -> Vec<String> {
        match self {
            TermList::List(items) => items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            TermList::Text(raw) => split_comma_list(&raw),
        }
    }
}

impl Default for TermList {
    fn default() -> Self {
        TermList::List(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub salary: f64,
    pub location: String,
    pub job_type: JobType,
    pub experience_level: u32,
    pub positions: u32,
    pub company: Option<String>,
    pub created_by: Option<String>,
    pub ai_extracted_skills: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// Stated requirements followed by extracted skills
    pub fn skill_terms(&self) -> impl Iterator<Item = &str> {
        self.requirements
            .iter()
            .chain(self.ai_extracted_skills.iter())
            .map(String::as_str)
    }

    pub fn skill_set(&self) -> SkillSet {
        SkillSet::normalize(self.skill_terms())
    }
}

/// Job posting as submitted, before validation
#[derive(Debug, Clone, Deserialize)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub requirements: TermList,
    pub salary: f64,
    pub location: String,
    pub job_type: String,
    #[serde(default)]
    pub experience: i64,
    pub positions: i64,
    #[serde(default)]
    pub company: Option<String>,
}

/// A posting that passed validation; skills still to be extracted
#[derive(Debug, Clone, PartialEq)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub salary: f64,
    pub location: String,
    pub job_type: JobType,
    pub experience_level: u32,
    pub positions: u32,
    pub company: Option<String>,
}

impl NewJob {
    pub fn validate(self) -> Result<JobDraft, ValidationError> {
        let title = self.title.trim().to_string();
        if title.chars().count() < 3 {
            return Err(ValidationError::new(
                "Title must be at least 3 characters long",
            ));
        }

        let description = self.description.trim().to_string();
        if description.chars().count() < 10 {
            return Err(ValidationError::new(
                "Description must be at least 10 characters long",
            ));
        }

        let requirements = self.requirements.into_terms();
        if requirements.is_empty() {
            return Err(ValidationError::new(
                "Requirements must be comma-separated values",
            ));
        }

        if !self.salary.is_finite() || self.salary <= 0.0 {
            return Err(ValidationError::new("Salary must be a positive number"));
        }

        let experience_level = u32::try_from(self.experience)
            .map_err(|_| ValidationError::new("Experience must be a non-negative number"))?;

        let positions = u32::try_from(self.positions)
            .ok()
            .filter(|p| *p > 0)
            .ok_or_else(|| ValidationError::new("Positions must be a positive integer"))?;

        let location = self.location.trim().to_string();
        if location.chars().count() < 2 {
            return Err(ValidationError::new(
                "Location must be at least 2 characters long",
            ));
        }

        let job_type: JobType = self.job_type.parse()?;

        Ok(JobDraft {
            title,
            description,
            requirements,
            salary: self.salary,
            location,
            job_type,
            experience_level,
            positions,
            company: non_blank(self.company),
        })
    }
}

impl JobDraft {
    pub fn into_job(self, created_by: Option<String>, ai_extracted_skills: Vec<String>) -> Job {
        Job {
            id: uuid::Uuid::new_v4().to_string(),
            title: self.title,
            description: self.description,
            requirements: self.requirements,
            salary: self.salary,
            location: self.location,
            job_type: self.job_type,
            experience_level: self.experience_level,
            positions: self.positions,
            company: self.company,
            created_by,
            ai_extracted_skills,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub ai_extracted_skills: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            full_name: None,
            bio: None,
            skills: Vec::new(),
            ai_extracted_skills: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// Declared skills followed by extracted skills
    pub fn skill_terms(&self) -> impl Iterator<Item = &str> {
        self.skills
            .iter()
            .chain(self.ai_extracted_skills.iter())
            .map(String::as_str)
    }

    pub fn skill_set(&self) -> SkillSet {
        SkillSet::normalize(self.skill_terms())
    }
}

/// Partial profile change; absent fields stay untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Option<TermList>,
}
