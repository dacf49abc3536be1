// src/core/database.rs
//! SQLite record store for jobs and profiles

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

use crate::types::{Job, JobType, Profile};
use crate::utils::{keyword_words, title_matches};

// ===== Connection Management =====

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the database file and run migrations
    pub async fn new(database_path: &Path) -> Result<Self> {
        if let Some(parent) = database_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        let pool = SqlitePool::connect(&database_url).await.with_context(|| {
            format!("Failed to connect to database: {}", database_path.display())
        })?;

        info!("Database connection established: {}", database_path.display());

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Close every pooled connection; later queries fail
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connections closed");
    }

    pub fn jobs(&self) -> JobRepository<'_> {
        JobRepository::new(&self.pool)
    }

    pub fn profiles(&self) -> ProfileRepository<'_> {
        ProfileRepository::new(&self.pool)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS jobs (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                requirements TEXT NOT NULL DEFAULT '[]',
                salary REAL NOT NULL,
                location TEXT NOT NULL,
                job_type TEXT NOT NULL,
                experience_level INTEGER NOT NULL DEFAULT 0,
                positions INTEGER NOT NULL DEFAULT 1,
                company TEXT,
                created_by TEXT,
                ai_extracted_skills TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                user_id TEXT PRIMARY KEY,
                full_name TEXT,
                bio TEXT,
                skills TEXT NOT NULL DEFAULT '[]',
                ai_extracted_skills TEXT NOT NULL DEFAULT '[]',
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_jobs_created_at ON jobs(created_at);")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_jobs_created_by ON jobs(created_by);")
            .execute(&self.pool)
            .await?;

        info!("Database migrations completed");
        Ok(())
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }
}

// ===== Rows =====

#[derive(Debug, sqlx::FromRow)]
struct JobRow {
    id: String,
    title: String,
    description: String,
    requirements: String,
    salary: f64,
    location: String,
    job_type: String,
    experience_level: i64,
    positions: i64,
    company: Option<String>,
    created_by: Option<String>,
    ai_extracted_skills: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for Job {
    type Error = anyhow::Error;

    fn try_from(row: JobRow) -> Result<Self> {
        let job_type: JobType = row
            .job_type
            .parse()
            .with_context(|| format!("Stored job {} has an unknown job type", row.id))?;

        Ok(Job {
            requirements: decode_list(&row.requirements, "requirements")?,
            ai_extracted_skills: decode_list(&row.ai_extracted_skills, "ai_extracted_skills")?,
            experience_level: u32::try_from(row.experience_level).with_context(|| {
                format!(
                    "Stored job {} has an invalid experience level: {}",
                    row.id, row.experience_level
                )
            })?,
            positions: u32::try_from(row.positions).with_context(|| {
                format!("Stored job {} has an invalid position count: {}", row.id, row.positions)
            })?,
            id: row.id,
            title: row.title,
            description: row.description,
            salary: row.salary,
            location: row.location,
            job_type,
            company: row.company,
            created_by: row.created_by,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    user_id: String,
    full_name: Option<String>,
    bio: Option<String>,
    skills: String,
    ai_extracted_skills: String,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = anyhow::Error;

    fn try_from(row: ProfileRow) -> Result<Self> {
        Ok(Profile {
            skills: decode_list(&row.skills, "skills")?,
            ai_extracted_skills: decode_list(&row.ai_extracted_skills, "ai_extracted_skills")?,
            user_id: row.user_id,
            full_name: row.full_name,
            bio: row.bio,
            updated_at: row.updated_at,
        })
    }
}

fn decode_list(raw: &str, column: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw).with_context(|| format!("Invalid JSON list in column {}", column))
}

fn encode_list(items: &[String]) -> Result<String> {
    serde_json::to_string(items).context("Failed to encode list column")
}

const JOB_COLUMNS: &str = "id, title, description, requirements, salary, location, job_type, \
     experience_level, positions, company, created_by, ai_extracted_skills, created_at";

// ===== Jobs =====

pub struct JobRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> JobRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, job: &Job) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO jobs (id, title, description, requirements, salary, location, job_type,
                              experience_level, positions, company, created_by,
                              ai_extracted_skills, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&job.id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(encode_list(&job.requirements)?)
        .bind(job.salary)
        .bind(&job.location)
        .bind(job.job_type.as_str())
        .bind(i64::from(job.experience_level))
        .bind(i64::from(job.positions))
        .bind(&job.company)
        .bind(&job.created_by)
        .bind(encode_list(&job.ai_extracted_skills)?)
        .bind(job.created_at)
        .execute(self.pool)
        .await
        .context("Failed to insert job")?;

        info!("Created job {} ({})", job.id, job.title);
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Job>> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {} FROM jobs WHERE id = ?",
            JOB_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Job::try_from).transpose()
    }

    /// Jobs posted by one user, newest first
    pub async fn list_by_creator(&self, user_id: &str) -> Result<Vec<Job>> {
        let rows = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {} FROM jobs WHERE created_by = ? ORDER BY created_at DESC, rowid DESC",
            JOB_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Job::try_from).collect()
    }

    /// Newest first; a keyword keeps jobs whose title contains any of its words
    pub async fn list(&self, keyword: Option<&str>) -> Result<Vec<Job>> {
        let rows = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {} FROM jobs ORDER BY created_at DESC, rowid DESC",
            JOB_COLUMNS
        ))
        .fetch_all(self.pool)
        .await?;

        let words = keyword.map(keyword_words).unwrap_or_default();

        rows.into_iter()
            .filter(|row| title_matches(&row.title, &words))
            .map(Job::try_from)
            .collect()
    }
}

// ===== Profiles =====

pub struct ProfileRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProfileRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user(&self, user_id: &str) -> Result<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT user_id, full_name, bio, skills, ai_extracted_skills, updated_at
            FROM profiles
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Profile::try_from).transpose()
    }

    pub async fn upsert(&self, profile: &Profile) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, full_name, bio, skills, ai_extracted_skills, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                full_name = excluded.full_name,
                bio = excluded.bio,
                skills = excluded.skills,
                ai_extracted_skills = excluded.ai_extracted_skills,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&profile.user_id)
        .bind(&profile.full_name)
        .bind(&profile.bio)
        .bind(encode_list(&profile.skills)?)
        .bind(encode_list(&profile.ai_extracted_skills)?)
        .bind(profile.updated_at)
        .execute(self.pool)
        .await
        .context("Failed to save profile")?;

        info!("Saved profile for user {}", profile.user_id);
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<Profile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT user_id, full_name, bio, skills, ai_extracted_skills, updated_at
            FROM profiles
            ORDER BY updated_at DESC, rowid DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Profile::try_from).collect()
    }
}
