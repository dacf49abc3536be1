// src/web/handlers/skill_handlers.rs
use crate::app_log;
use crate::auth::AuthenticatedUser;
use crate::engine::SkillEngine;
use crate::matching::match_score;
use crate::skills::SkillSet;
use crate::web::types::*;

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;

pub async fn extract_skills_handler(
    request: Json<StandardRequest<ExtractSkillsRequest>>,
    auth: AuthenticatedUser,
    engine: &State<SkillEngine>,
) -> Result<Json<DataResponse<ExtractedSkillsData>>, ApiError> {
    let conversation_id = request.conversation_id();
    let request = request.into_inner();

    let text = match request.data.text {
        Some(text) if !text.trim().is_empty() => text,
        _ => {
            return Err(api_error(
                Status::BadRequest,
                "Text is required",
                "TEXT_REQUIRED",
                &["Provide the bio, resume or job description to analyse in 'text'"],
                conversation_id,
            ));
        }
    };

    let skills = engine.extract_skills(&text).await;

    app_log!(
        info,
        "User {} extracted {} skills ({})",
        auth.user_id(),
        skills.len(),
        engine.strategy()
    );

    Ok(Json(DataResponse::success(
        format!("Extracted {} skills", skills.len()),
        ExtractedSkillsData {
            skills,
            strategy: engine.strategy(),
        },
        conversation_id,
    )))
}

pub async fn score_skills_handler(
    request: Json<StandardRequest<ScoreRequest>>,
) -> Json<DataResponse<ScoreData>> {
    let conversation_id = request.conversation_id();
    let request = request.into_inner();

    let reference = SkillSet::normalize(request.data.reference.into_terms());
    let candidate = SkillSet::normalize(request.data.candidate.into_terms());
    let score = match_score(&reference, &candidate);

    Json(DataResponse::success(
        format!("Match score: {:.0}%", score),
        ScoreData {
            intersection: reference.intersection_len(&candidate),
            union: reference.union_len(&candidate),
            match_score: score,
            reference,
            candidate,
        },
        conversation_id,
    ))
}
