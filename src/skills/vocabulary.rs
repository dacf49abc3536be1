// src/skills/vocabulary.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const DEFAULT_SKILLS: &[&str] = &[
    "JavaScript", "Python", "Java", "React", "Node.js", "MongoDB", "PostgreSQL",
    "AWS", "Docker", "Kubernetes", "Git", "TypeScript", "Angular", "Vue.js",
    "Express.js", "Django", "Flask", "Spring Boot", "Laravel", "PHP", "C++",
    "C#", "Go", "Rust", "Swift", "Kotlin", "Scala", "Ruby", "Elixir",
    "GraphQL", "REST API", "Microservices", "CI/CD", "Jenkins", "GitHub Actions",
    "Terraform", "Ansible", "Kafka", "Redis", "Elasticsearch", "Machine Learning",
    "Deep Learning", "TensorFlow", "PyTorch", "Scikit-learn", "Data Science",
    "SQL", "NoSQL", "Big Data", "Hadoop", "Spark", "Tableau", "Power BI",
];

#[derive(Debug, Deserialize)]
struct VocabularyFile {
    skills: Vec<String>,
}

/// Curated list of recognized skill terms.
///
/// Terms keep their canonical spelling. `contains` is exact, `canonical`
/// resolves a term regardless of case to the curated spelling.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    terms: Vec<String>,
    by_folded: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocabulary = Self {
            terms: Vec::new(),
            by_folded: HashMap::new(),
        };

        for term in terms {
            let term: String = term.into();
            let term = term.trim();
            if term.is_empty() {
                continue;
            }
            let folded = term.to_lowercase();
            if vocabulary.by_folded.contains_key(&folded) {
                continue;
            }
            vocabulary.by_folded.insert(folded, vocabulary.terms.len());
            vocabulary.terms.push(term.to_string());
        }

        vocabulary
    }

    /// Load from a TOML file of the form `skills = ["Rust", "SQL"]`
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read vocabulary file: {}", path.display()))?;

        let file: VocabularyFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse vocabulary file: {}", path.display()))?;

        let vocabulary = Self::new(file.skills);
        if vocabulary.is_empty() {
            anyhow::bail!("Vocabulary file {} lists no skills", path.display());
        }

        Ok(vocabulary)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.by_folded
            .get(&term.to_lowercase())
            .is_some_and(|&idx| self.terms[idx] == term)
    }

    pub fn canonical(&self, term: &str) -> Option<&str> {
        self.by_folded
            .get(&term.trim().to_lowercase())
            .map(|&idx| self.terms[idx].as_str())
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_SKILLS.iter().copied())
    }
}
