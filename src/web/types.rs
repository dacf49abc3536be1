// src/web/types.rs
use crate::extraction::ExtractorStrategy;
use crate::matching::ScoredEntity;
use crate::skills::SkillSet;
use crate::types::{Job, TermList};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};

/// Error half of every handler result
pub type ApiError = (Status, Json<StandardErrorResponse>);

// ===== Standard response envelopes =====

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Error,
}

// Request wrapper with conversation_id support
#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardRequest<T> {
    #[serde(flatten)]
    pub data: T,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

// Helper trait for extracting conversation_id
pub trait WithConversationId {
    fn conversation_id(&self) -> Option<String>;
}

impl<T> WithConversationId for StandardRequest<T> {
    fn conversation_id(&self) -> Option<String> {
        self.conversation_id.clone()
    }
}

impl TextResponse {
    pub fn success(message: String, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
            conversation_id,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
            conversation_id,
        }
    }
}

impl StandardErrorResponse {
    pub fn new(
        error: String,
        error_code: String,
        suggestions: Vec<String>,
        conversation_id: Option<String>,
    ) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
            conversation_id,
        }
    }
}

/// Build the error half of a handler result
pub fn api_error(
    status: Status,
    error: impl Into<String>,
    error_code: &str,
    suggestions: &[&str],
    conversation_id: Option<String>,
) -> ApiError {
    (
        status,
        Json(StandardErrorResponse::new(
            error.into(),
            error_code.to_string(),
            suggestions.iter().map(|s| s.to_string()).collect(),
            conversation_id,
        )),
    )
}

pub fn database_error(conversation_id: Option<String>) -> ApiError {
    api_error(
        Status::InternalServerError,
        "Database operation failed",
        "DATABASE_ERROR",
        &["Try again in a few moments"],
        conversation_id,
    )
}

// ===== Request bodies =====

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ExtractSkillsRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ScoreRequest {
    #[serde(default)]
    pub reference: TermList,
    #[serde(default)]
    pub candidate: TermList,
}

// ===== Response payloads =====

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ExtractedSkillsData {
    pub skills: Vec<String>,
    pub strategy: ExtractorStrategy,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ScoreData {
    pub reference: SkillSet,
    pub candidate: SkillSet,
    pub intersection: usize,
    pub union: usize,
    pub match_score: f64,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct JobListData {
    /// True when the list was ranked against the caller's skills
    pub ranked: bool,
    pub jobs: Vec<ScoredEntity<Job>>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct JobDetailData {
    pub job: Job,
    /// Null for anonymous callers
    pub match_score: Option<f64>,
}
