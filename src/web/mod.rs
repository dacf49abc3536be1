// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use types::*;

use crate::app_log;
use crate::auth::{failure_reason, AuthConfig, AuthenticatedUser, OptionalAuth};
use crate::core::{ConfigManager, Database};
use crate::engine::SkillEngine;
use crate::matching::RankedList;
use crate::types::{Job, NewJob, Profile, ProfileUpdate};
use anyhow::{Context, Result};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

#[get("/health")]
pub async fn health(
    auth: OptionalAuth,
    engine: &State<SkillEngine>,
    db: &State<Database>,
) -> Result<Json<TextResponse>, ApiError> {
    handlers::health_handler(auth, engine, db).await
}

#[post("/skills/extract", data = "<request>")]
pub async fn extract_skills(
    request: Json<StandardRequest<ExtractSkillsRequest>>,
    auth: AuthenticatedUser,
    engine: &State<SkillEngine>,
) -> Result<Json<DataResponse<ExtractedSkillsData>>, ApiError> {
    handlers::extract_skills_handler(request, auth, engine).await
}

#[post("/skills/score", data = "<request>")]
pub async fn score_skills(
    request: Json<StandardRequest<ScoreRequest>>,
) -> Json<DataResponse<ScoreData>> {
    handlers::score_skills_handler(request).await
}

#[get("/jobs?<keyword>")]
pub async fn list_jobs(
    keyword: Option<String>,
    auth: OptionalAuth,
    engine: &State<SkillEngine>,
    db: &State<Database>,
) -> Result<Json<DataResponse<JobListData>>, ApiError> {
    handlers::list_jobs_handler(keyword, auth, engine, db).await
}

#[post("/jobs", data = "<request>")]
pub async fn create_job(
    request: Json<StandardRequest<NewJob>>,
    auth: AuthenticatedUser,
    engine: &State<SkillEngine>,
    db: &State<Database>,
) -> Result<(Status, Json<DataResponse<Job>>), ApiError> {
    handlers::create_job_handler(request, auth, engine, db).await
}

#[get("/jobs/mine")]
pub async fn my_jobs(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<Job>>>, ApiError> {
    handlers::my_jobs_handler(auth, db).await
}

#[get("/jobs/recommendations")]
pub async fn job_recommendations(
    auth: AuthenticatedUser,
    engine: &State<SkillEngine>,
    db: &State<Database>,
) -> Result<Json<DataResponse<RankedList<Job>>>, ApiError> {
    handlers::job_recommendations_handler(auth, engine, db).await
}

#[get("/jobs/<id>")]
pub async fn get_job(
    id: &str,
    auth: OptionalAuth,
    engine: &State<SkillEngine>,
    db: &State<Database>,
) -> Result<Json<DataResponse<JobDetailData>>, ApiError> {
    handlers::get_job_handler(id, auth, engine, db).await
}

#[get("/jobs/<id>/candidates")]
pub async fn job_candidates(
    id: &str,
    auth: AuthenticatedUser,
    engine: &State<SkillEngine>,
    db: &State<Database>,
) -> Result<Json<DataResponse<RankedList<Profile>>>, ApiError> {
    handlers::job_candidates_handler(id, auth, engine, db).await
}

#[get("/profile")]
pub async fn get_profile(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<Profile>>, ApiError> {
    handlers::get_profile_handler(auth, db).await
}

#[post("/profile", data = "<request>")]
pub async fn update_profile(
    request: Json<StandardRequest<ProfileUpdate>>,
    auth: AuthenticatedUser,
    engine: &State<SkillEngine>,
    db: &State<Database>,
) -> Result<Json<DataResponse<Profile>>, ApiError> {
    handlers::update_profile_handler(request, auth, engine, db).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(401)]
pub fn unauthorized(req: &Request) -> Json<StandardErrorResponse> {
    let reason = failure_reason(req)
        .map(|e| e.message())
        .unwrap_or("Authentication required");

    Json(StandardErrorResponse::new(
        reason.to_string(),
        "UNAUTHORIZED".to_string(),
        vec!["Login is required".to_string()],
        None,
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Resource not found".to_string(),
        "NOT_FOUND".to_string(),
        vec!["Check the request path".to_string()],
        None,
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body does not match the expected fields".to_string(),
        "INVALID_FIELDS".to_string(),
        vec![
            "Verify all required fields are present".to_string(),
            "Check field types (numbers, lists, strings)".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
        None,
    ))
}

/// Assemble the application on a given Rocket instance
pub fn mount(rocket: Rocket<Build>, engine: SkillEngine, db: Database, auth: AuthConfig) -> Rocket<Build> {
    rocket
        .attach(Cors)
        .manage(engine)
        .manage(db)
        .manage(auth)
        .register(
            "/api",
            catchers![bad_request, unauthorized, not_found, unprocessable, internal_error],
        )
        .mount(
            "/api",
            routes![
                health,
                extract_skills,
                score_skills,
                list_jobs,
                create_job,
                my_jobs,
                job_recommendations,
                get_job,
                job_candidates,
                get_profile,
                update_profile,
                options,
            ],
        )
}

/// Build with Rocket's default configuration (used by tests and embedding)
pub fn build_rocket(engine: SkillEngine, db: Database, auth: AuthConfig) -> Rocket<Build> {
    mount(rocket::build(), engine, db, auth)
}

// Main server start function
pub async fn start_web_server(config: ConfigManager) -> Result<()> {
    config.ensure_directories().await?;

    let db = Database::new(&config.environment.database_path).await?;
    let engine = SkillEngine::from_config(&config)?;
    let auth = AuthConfig::new(&config.server.jwt_secret);

    app_log!(info, "Starting jobmatch API server");
    app_log!(info, "Environment: {}", config.environment.name);
    app_log!(info, "Database: {}", config.environment.database_path.display());
    app_log!(info, "Skill extraction: {}", engine.strategy());
    app_log!(
        info,
        "Recommendation limit: {}",
        config.environment.recommendation_limit
    );
    app_log!(info, "Server: http://0.0.0.0:{}", config.server.port);

    let figment = rocket::Config::figment()
        .merge(("port", config.server.port))
        .merge(("address", "0.0.0.0"));

    let rocket = mount(rocket::custom(figment), engine, db, auth)
        .launch()
        .await
        .context("Rocket server failed")?;

    if let Some(db) = rocket.state::<Database>() {
        db.close().await;
    }

    Ok(())
}
