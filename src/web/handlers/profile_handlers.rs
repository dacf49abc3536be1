// src/web/handlers/profile_handlers.rs
use super::job_handlers::profile_not_found;
use crate::app_log;
use crate::auth::AuthenticatedUser;
use crate::core::Database;
use crate::engine::SkillEngine;
use crate::types::{Profile, ProfileUpdate};
use crate::web::types::*;

use rocket::serde::json::Json;
use rocket::State;
use tracing::error;

pub async fn get_profile_handler(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<Profile>>, ApiError> {
    let profile = db
        .profiles()
        .find_by_user(auth.user_id())
        .await
        .map_err(|e| {
            error!("Failed to load profile for {}: {}", auth.user_id(), e);
            database_error(None)
        })?
        .ok_or_else(|| profile_not_found(auth.user_id()))?;

    Ok(Json(DataResponse::success(
        "Profile loaded".to_string(),
        profile,
        None,
    )))
}

pub async fn update_profile_handler(
    request: Json<StandardRequest<ProfileUpdate>>,
    auth: AuthenticatedUser,
    engine: &State<SkillEngine>,
    db: &State<Database>,
) -> Result<Json<DataResponse<Profile>>, ApiError> {
    let conversation_id = request.conversation_id();
    let request = request.into_inner();

    let existing = db
        .profiles()
        .find_by_user(auth.user_id())
        .await
        .map_err(|e| {
            error!("Failed to load profile for {}: {}", auth.user_id(), e);
            database_error(conversation_id.clone())
        })?
        .unwrap_or_else(|| Profile::new(auth.user_id()));

    let profile = engine.apply_profile_update(existing, request.data).await;

    db.profiles().upsert(&profile).await.map_err(|e| {
        error!("Failed to save profile for {}: {}", auth.user_id(), e);
        database_error(conversation_id.clone())
    })?;

    app_log!(
        info,
        "User {} updated profile: {} skills, {} extracted",
        auth.user_id(),
        profile.skills.len(),
        profile.ai_extracted_skills.len()
    );

    Ok(Json(DataResponse::success(
        "Update Success".to_string(),
        profile,
        conversation_id,
    )))
}
