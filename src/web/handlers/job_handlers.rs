// src/web/handlers/job_handlers.rs
use crate::app_log;
use crate::auth::{AuthenticatedUser, OptionalAuth};
use crate::core::Database;
use crate::engine::SkillEngine;
use crate::matching::{RankedList, ScoredEntity};
use crate::types::{Job, NewJob, Profile};
use crate::web::types::*;

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::error;

pub async fn list_jobs_handler(
    keyword: Option<String>,
    auth: OptionalAuth,
    engine: &State<SkillEngine>,
    db: &State<Database>,
) -> Result<Json<DataResponse<JobListData>>, ApiError> {
    let keyword = keyword.filter(|k| !k.trim().is_empty());

    let jobs = db.jobs().list(keyword.as_deref()).await.map_err(|e| {
        error!("Failed to list jobs: {}", e);
        database_error(None)
    })?;

    let profile = match auth.user_id() {
        Some(user_id) => db.profiles().find_by_user(user_id).await.map_err(|e| {
            error!("Failed to load profile for {}: {}", user_id, e);
            database_error(None)
        })?,
        None => None,
    };

    // Rank only when the caller has skills to rank on
    let data = match profile.filter(|p| p.skill_terms().next().is_some()) {
        Some(profile) => JobListData {
            ranked: true,
            jobs: engine.recommend_jobs(&profile, jobs).into_entries(),
        },
        None => JobListData {
            ranked: false,
            jobs: jobs
                .into_iter()
                .map(|record| ScoredEntity {
                    record,
                    match_score: None,
                })
                .collect(),
        },
    };

    Ok(Json(DataResponse::success(
        format!("Found {} jobs", data.jobs.len()),
        data,
        None,
    )))
}

pub async fn create_job_handler(
    request: Json<StandardRequest<NewJob>>,
    auth: AuthenticatedUser,
    engine: &State<SkillEngine>,
    db: &State<Database>,
) -> Result<(Status, Json<DataResponse<Job>>), ApiError> {
    let conversation_id = request.conversation_id();
    let request = request.into_inner();

    let draft = request.data.validate().map_err(|e| {
        api_error(
            Status::BadRequest,
            e.message,
            "VALIDATION_ERROR",
            &["Check the job fields and try again"],
            conversation_id.clone(),
        )
    })?;

    let job = engine
        .prepare_job(draft, Some(auth.user_id().to_string()))
        .await;

    db.jobs().create(&job).await.map_err(|e| {
        error!("Failed to store job for {}: {}", auth.user_id(), e);
        database_error(conversation_id.clone())
    })?;

    app_log!(info, "User {} posted job {}", auth.user_id(), job.id);

    Ok((
        Status::Created,
        Json(DataResponse::success(
            "Job Created Successfully".to_string(),
            job,
            conversation_id,
        )),
    ))
}

pub async fn my_jobs_handler(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<Job>>>, ApiError> {
    let jobs = db.jobs().list_by_creator(auth.user_id()).await.map_err(|e| {
        error!("Failed to list jobs posted by {}: {}", auth.user_id(), e);
        database_error(None)
    })?;

    Ok(Json(DataResponse::success(
        format!("Found {} jobs", jobs.len()),
        jobs,
        None,
    )))
}

pub async fn get_job_handler(
    id: &str,
    auth: OptionalAuth,
    engine: &State<SkillEngine>,
    db: &State<Database>,
) -> Result<Json<DataResponse<JobDetailData>>, ApiError> {
    let job = find_job(id, db).await?;

    let match_score = match auth.user_id() {
        Some(user_id) => {
            let profile = db
                .profiles()
                .find_by_user(user_id)
                .await
                .map_err(|e| {
                    error!("Failed to load profile for {}: {}", user_id, e);
                    database_error(None)
                })?
                .unwrap_or_else(|| Profile::new(user_id));
            Some(engine.match_score(&job, &profile))
        }
        None => None,
    };

    Ok(Json(DataResponse::success(
        format!("Job {}", job.title),
        JobDetailData { job, match_score },
        None,
    )))
}

pub async fn job_recommendations_handler(
    auth: AuthenticatedUser,
    engine: &State<SkillEngine>,
    db: &State<Database>,
) -> Result<Json<DataResponse<RankedList<Job>>>, ApiError> {
    let profile = db
        .profiles()
        .find_by_user(auth.user_id())
        .await
        .map_err(|e| {
            error!("Failed to load profile for {}: {}", auth.user_id(), e);
            database_error(None)
        })?
        .ok_or_else(|| profile_not_found(auth.user_id()))?;

    let jobs = db.jobs().list(None).await.map_err(|e| {
        error!("Failed to list jobs: {}", e);
        database_error(None)
    })?;

    let recommendations = engine.recommend_jobs(&profile, jobs);

    app_log!(
        info,
        "Recommended {} jobs to user {}",
        recommendations.len(),
        auth.user_id()
    );

    Ok(Json(DataResponse::success(
        format!("{} recommended jobs", recommendations.len()),
        recommendations,
        None,
    )))
}

pub async fn job_candidates_handler(
    id: &str,
    auth: AuthenticatedUser,
    engine: &State<SkillEngine>,
    db: &State<Database>,
) -> Result<Json<DataResponse<RankedList<Profile>>>, ApiError> {
    let job = find_job(id, db).await?;

    let profiles = db.profiles().list().await.map_err(|e| {
        error!("Failed to list profiles: {}", e);
        database_error(None)
    })?;

    let candidates = engine.recommend_candidates(&job, profiles);

    app_log!(
        info,
        "User {} ranked {} candidates for job {}",
        auth.user_id(),
        candidates.len(),
        job.id
    );

    Ok(Json(DataResponse::success(
        format!("{} recommended candidates", candidates.len()),
        candidates,
        None,
    )))
}

async fn find_job(id: &str, db: &Database) -> Result<Job, ApiError> {
    db.jobs()
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to load job {}: {}", id, e);
            database_error(None)
        })?
        .ok_or_else(|| {
            api_error(
                Status::NotFound,
                "Job Not Found",
                "JOB_NOT_FOUND",
                &["Check the job id"],
                None,
            )
        })
}

pub(crate) fn profile_not_found(user_id: &str) -> ApiError {
    api_error(
        Status::NotFound,
        format!("No profile found for user {}", user_id),
        "PROFILE_NOT_FOUND",
        &["Create your profile with POST /api/profile first"],
        None,
    )
}
