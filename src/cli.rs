// src/cli.rs
use crate::app_log;
use crate::core::{ConfigManager, Database};
use crate::engine::SkillEngine;
use crate::matching::match_score;
use crate::skills::SkillSet;
use crate::types::{NewJob, Profile, TermList};
use crate::utils::split_comma_list;
use crate::web::start_web_server;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jobmatch")]
#[command(about = "Skill-based job and candidate matching")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Score two comma-separated skill lists
    Score {
        #[arg(long)]
        reference: String,
        #[arg(long)]
        candidate: String,
    },
    /// Extract recognized skills from free text
    Extract { text: String },
    /// Import job postings from a CSV file
    ImportJobs { csv_file: PathBuf },
    /// List stored jobs, optionally filtered by title keyword
    ListJobs {
        #[arg(long)]
        keyword: Option<String>,
    },
    /// Recommend stored jobs for a comma-separated skill list
    Recommend {
        #[arg(long)]
        skills: String,
        #[arg(long)]
        limit: Option<usize>,
    },
}

/// One CSV line. Requirements are comma-separated inside the field.
#[derive(Debug, Deserialize)]
struct JobCsvRow {
    title: String,
    description: String,
    requirements: String,
    salary: f64,
    location: String,
    job_type: String,
    #[serde(default)]
    experience: Option<i64>,
    positions: i64,
    #[serde(default)]
    company: Option<String>,
}

impl From<JobCsvRow> for NewJob {
    fn from(row: JobCsvRow) -> Self {
        NewJob {
            title: row.title,
            description: row.description,
            requirements: TermList::Text(row.requirements),
            salary: row.salary,
            location: row.location,
            job_type: row.job_type,
            experience: row.experience.unwrap_or(0),
            positions: row.positions,
            company: row.company,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub rejected: usize,
}

pub async fn handle_command(cli: Cli, config: ConfigManager) -> Result<()> {
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => start_web_server(config).await,

        Command::Score {
            reference,
            candidate,
        } => {
            let reference = SkillSet::normalize(split_comma_list(&reference));
            let candidate = SkillSet::normalize(split_comma_list(&candidate));
            app_log!(
                info,
                "Match score: {:.2} ({} shared of {} distinct skills)",
                match_score(&reference, &candidate),
                reference.intersection_len(&candidate),
                reference.union_len(&candidate)
            );
            Ok(())
        }

        Command::Extract { text } => {
            let engine = SkillEngine::from_config(&config)?;
            let skills = engine.extract_skills(&text).await;
            if skills.is_empty() {
                app_log!(info, "No recognized skills ({})", engine.strategy());
            } else {
                app_log!(info, "Skills ({}): {}", engine.strategy(), skills.join(", "));
            }
            Ok(())
        }

        Command::ImportJobs { csv_file } => {
            if !csv_file.exists() {
                anyhow::bail!("CSV file not found: {}", csv_file.display());
            }

            let content = tokio::fs::read(&csv_file)
                .await
                .with_context(|| format!("Failed to read {}", csv_file.display()))?;

            let (engine, db) = open(&config).await?;
            let summary = import_jobs(content.as_slice(), &engine, &db).await?;

            app_log!(info, "Import completed:");
            app_log!(info, "  Imported: {}", summary.imported);
            app_log!(info, "  Rejected: {}", summary.rejected);
            Ok(())
        }

        Command::ListJobs { keyword } => {
            let db = open_database(&config).await?;
            let jobs = db.jobs().list(keyword.as_deref()).await?;

            if jobs.is_empty() {
                app_log!(info, "No jobs found.");
                return Ok(());
            }

            app_log!(
                info,
                "{:<38} {:<30} {:<12} {:<20} {:<16}",
                "ID", "Title", "Type", "Location", "Created"
            );
            app_log!(info, "{}", "-".repeat(120));
            for job in jobs {
                app_log!(
                    info,
                    "{:<38} {:<30} {:<12} {:<20} {:<16}",
                    job.id,
                    job.title,
                    job.job_type.as_str(),
                    job.location,
                    job.created_at.format("%Y-%m-%d %H:%M")
                );
            }
            Ok(())
        }

        Command::Recommend { skills, limit } => {
            let (engine, db) = open(&config).await?;
            let ranker = match limit {
                Some(0) => anyhow::bail!("--limit must be at least 1"),
                Some(limit) => engine.ranker().with_limit(limit),
                None => engine.ranker(),
            };

            let mut profile = Profile::new("cli");
            profile.skills = split_comma_list(&skills);

            let jobs = db.jobs().list(None).await?;
            let ranked = engine.recommend_jobs_with(ranker, &profile, jobs);

            if ranked.is_empty() {
                app_log!(info, "No jobs to recommend.");
            }
            for entry in ranked.iter() {
                match entry.match_score {
                    Some(score) => app_log!(info, "{:>3}%  {}  ({})", score, entry.record.title, entry.record.id),
                    None => app_log!(info, "  -   {}  ({})", entry.record.title, entry.record.id),
                }
            }
            Ok(())
        }
    }
}

/// Validate and store every row; bad rows are counted and skipped.
pub async fn import_jobs<R: Read>(reader: R, engine: &SkillEngine, db: &Database) -> Result<ImportSummary> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut summary = ImportSummary::default();

    for (index, result) in reader.deserialize::<JobCsvRow>().enumerate() {
        let line = index + 2;
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                summary.rejected += 1;
                app_log!(warn, "Line {}: CSV parsing error: {}", line, e);
                continue;
            }
        };

        let draft = match NewJob::from(row).validate() {
            Ok(draft) => draft,
            Err(e) => {
                summary.rejected += 1;
                app_log!(warn, "Line {}: {}", line, e);
                continue;
            }
        };

        let job = engine.prepare_job(draft, None).await;
        match db.jobs().create(&job).await {
            Ok(()) => {
                summary.imported += 1;
                app_log!(info, "Added: {} ({})", job.title, job.id);
            }
            Err(e) => {
                summary.rejected += 1;
                app_log!(error, "Line {}: failed to store job: {}", line, e);
            }
        }
    }

    Ok(summary)
}

async fn open_database(config: &ConfigManager) -> Result<Database> {
    config.ensure_directories().await?;
    Database::new(&config.environment.database_path).await
}

async fn open(config: &ConfigManager) -> Result<(SkillEngine, Database)> {
    let engine = SkillEngine::from_config(config)?;
    let db = open_database(config).await?;
    Ok((engine, db))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::FallbackExtractor;
    use crate::matching::Ranker;
    use crate::skills::Vocabulary;
    use std::sync::Arc;

    const JOBS_CSV: &str = "\
title,description,requirements,salary,location,job_type,experience,positions,company
Rust Engineer,Build services with Docker and Kafka,\"Rust, SQL\",7000,Zurich,Full Time,3,1,Acme
No,Too short,Go,100,Remote,Contract,,1,
Data Analyst,Dashboards in Tableau for finance,\"SQL, Power BI\",4000,Remote,Part Time,,2,
Tester,Manual testing of the web shop,QA,3000,Remote,Freelance,1,1,
";

    fn engine() -> SkillEngine {
        let extractor = Arc::new(FallbackExtractor::new(Arc::new(Vocabulary::default())));
        SkillEngine::new(extractor, Ranker::default())
    }

    #[tokio::test]
    async fn test_import_jobs_counts_rejected_rows() {
        let path = std::env::temp_dir().join(format!("jobmatch_cli_{}.db", uuid::Uuid::new_v4()));
        let db = Database::new(&path).await.unwrap();

        let summary = import_jobs(JOBS_CSV.as_bytes(), &engine(), &db).await.unwrap();
        assert_eq!(summary, ImportSummary { imported: 2, rejected: 2 });

        let jobs = db.jobs().list(Some("rust")).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].requirements, vec!["Rust", "SQL"]);
        assert_eq!(jobs[0].ai_extracted_skills, vec!["Docker", "Kafka"]);
        assert_eq!(jobs[0].company.as_deref(), Some("Acme"));

        let analyst = db.jobs().list(Some("analyst")).await.unwrap();
        assert_eq!(analyst[0].experience_level, 0);
        assert_eq!(analyst[0].company, None);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_cli_defaults_to_serve() {
        let cli = Cli::parse_from(["jobmatch"]);
        assert!(cli.command.is_none());

        let cli = Cli::parse_from(["jobmatch", "recommend", "--skills", "Rust, SQL", "--limit", "3"]);
        match cli.command {
            Some(Command::Recommend { skills, limit }) => {
                assert_eq!(skills, "Rust, SQL");
                assert_eq!(limit, Some(3));
            }
            _ => panic!("expected recommend"),
        }
    }
}
