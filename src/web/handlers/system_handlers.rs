// src/web/handlers/system_handlers.rs
use crate::auth::OptionalAuth;
use crate::core::Database;
use crate::engine::SkillEngine;
use crate::web::types::*;

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

pub async fn health_handler(
    auth: OptionalAuth,
    engine: &State<SkillEngine>,
    db: &State<Database>,
) -> Result<Json<TextResponse>, ApiError> {
    match auth.user_id() {
        Some(user_id) => info!("Health check by authenticated user: {}", user_id),
        None => info!("Health check by anonymous user"),
    }
    info!("Skill extraction strategy: {}", engine.strategy());

    if let Err(e) = db.health_check().await {
        error!("Health check failed: {:#}", e);
        return Err(api_error(
            Status::ServiceUnavailable,
            "Database unavailable",
            "DATABASE_UNAVAILABLE",
            &["Try again in a few moments"],
            None,
        ));
    }

    Ok(Json(TextResponse::success("OK".to_string(), None)))
}
