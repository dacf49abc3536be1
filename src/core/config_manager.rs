// src/core/config_manager.rs
//! Unified configuration: optional config.yaml plus environment variables

use crate::matching::DEFAULT_RECOMMENDATION_LIMIT;
use crate::skills::Vocabulary;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_COMPLETION_URL: &str = "https://api.openai.com/v1";
const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PORT: u16 = 8000;
const LOCAL_JWT_SECRET: &str = "jobmatch-local-secret";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub completion: CompletionConfig,
    pub server: ServerSettings,
}

#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub name: String,
    pub database_path: PathBuf,
    pub vocabulary_path: Option<PathBuf>,
    pub recommendation_limit: usize,
}

/// External completion service settings. No key means vocabulary-only extraction.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub port: u16,
    pub jwt_secret: String,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: Option<EnvironmentSection>,
    #[serde(default)]
    production: Option<EnvironmentSection>,
}

#[derive(Debug, Default, Deserialize)]
struct EnvironmentSection {
    database_path: Option<PathBuf>,
    vocabulary_path: Option<PathBuf>,
    recommendation_limit: Option<usize>,
}

impl ConfigManager {
    /// Load from `config.yaml` in the working directory and the process environment
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.yaml"), |key| std::env::var(key).ok())
    }

    pub fn load_from<F>(config_path: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let name = env("JOBMATCH_ENV")
            .or_else(|| env("ENVIRONMENT"))
            .unwrap_or_else(|| "local".to_string());
        info!("Loading configuration for environment: {}", name);

        let environment = Self::load_environment(config_path, &name)?;
        let completion = Self::load_completion(&env)?;
        let server = Self::load_server(&env, &name)?;

        Ok(Self {
            environment,
            completion,
            server,
        })
    }

    fn load_environment(config_path: &Path, name: &str) -> Result<EnvironmentConfig> {
        let file = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            serde_yaml::from_str::<ConfigFile>(&content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?
        } else {
            info!("{} not found, using defaults", config_path.display());
            ConfigFile::default()
        };

        let section = match name {
            "production" => file.production,
            _ => file.local,
        }
        .unwrap_or_default();

        let recommendation_limit = section
            .recommendation_limit
            .unwrap_or(DEFAULT_RECOMMENDATION_LIMIT);
        if recommendation_limit == 0 {
            anyhow::bail!("recommendation_limit must be at least 1");
        }

        Ok(EnvironmentConfig {
            name: name.to_string(),
            database_path: resolve_path(
                section
                    .database_path
                    .unwrap_or_else(|| PathBuf::from("data/jobmatch.db")),
            )?,
            vocabulary_path: section.vocabulary_path.map(resolve_path).transpose()?,
            recommendation_limit,
        })
    }

    fn load_completion<F>(env: &F) -> Result<CompletionConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = env("COMPLETION_API_KEY")
            .or_else(|| env("OPENAI_API_KEY"))
            .filter(|key| !key.trim().is_empty());

        let timeout_seconds = match env("COMPLETION_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("COMPLETION_TIMEOUT_SECS must be a number of seconds"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_seconds == 0 {
            anyhow::bail!("COMPLETION_TIMEOUT_SECS must be at least 1");
        }

        Ok(CompletionConfig {
            api_key,
            base_url: env("COMPLETION_API_URL").unwrap_or_else(|| DEFAULT_COMPLETION_URL.to_string()),
            model: env("COMPLETION_MODEL").unwrap_or_else(|| DEFAULT_COMPLETION_MODEL.to_string()),
            timeout_seconds,
        })
    }

    fn load_server<F>(env: &F, name: &str) -> Result<ServerSettings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match env("PORT").or_else(|| env("ROCKET_PORT")) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid port number"))?,
            None => DEFAULT_PORT,
        };

        let jwt_secret = match env("JWT_SECRET") {
            Some(secret) => secret,
            None if name == "production" => {
                anyhow::bail!("JWT_SECRET environment variable not set")
            }
            None => LOCAL_JWT_SECRET.to_string(),
        };

        Ok(ServerSettings { port, jwt_secret })
    }

    /// Curated vocabulary from the configured file, or the built-in list
    pub fn load_vocabulary(&self) -> Result<Vocabulary> {
        match &self.environment.vocabulary_path {
            Some(path) => {
                let vocabulary = Vocabulary::from_toml_file(path)?;
                info!(
                    "Loaded {} vocabulary terms from {}",
                    vocabulary.len(),
                    path.display()
                );
                Ok(vocabulary)
            }
            None => Ok(Vocabulary::default()),
        }
    }

    /// Ensure the database directory exists
    pub async fn ensure_directories(&self) -> Result<()> {
        if let Some(db_parent) = self.environment.database_path.parent() {
            tokio::fs::create_dir_all(db_parent).await.with_context(|| {
                format!(
                    "Failed to create database directory: {}",
                    db_parent.display()
                )
            })?;
        }
        Ok(())
    }
}

fn resolve_path(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path)
    } else {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(current_dir.join(path))
    }
}
