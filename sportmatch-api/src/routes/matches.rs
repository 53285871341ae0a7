use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sportmatch_shared::errors::{AppError, AppResult, ErrorCode};
use sportmatch_shared::middleware::{AppJson, AppPath, AppQuery};
use sportmatch_shared::types::api::Created;
use sportmatch_shared::types::auth::AuthUser;
use sportmatch_shared::types::ApiResponse;

use crate::models::Match;
use crate::routes::acting_as;
use crate::services::like_engine;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MatchedUsers {
    pub user_id: Uuid,
    pub matches: Vec<Uuid>,
}

// --- GET /users/:id/matches ---

pub async fn list_matched_users(
    user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<MatchedUsers>>> {
    let user_id = acting_as(&user, Some(id))?;
    let matches = like_engine::list_matches(state.store.as_ref(), user_id).await?;
    Ok(Json(ApiResponse::ok(MatchedUsers { user_id, matches })))
}

#[derive(Debug, Deserialize)]
pub struct MatchQuery {
    #[serde(alias = "userId")]
    pub user_id: Option<Uuid>,
}

// --- GET /matches ---

pub async fn list_matches(
    user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<MatchQuery>,
) -> AppResult<Json<ApiResponse<Vec<Match>>>> {
    let user_id = acting_as(&user, query.user_id)?;
    let records = like_engine::list_match_records(state.store.as_ref(), user_id).await?;
    Ok(Json(ApiResponse::ok(records)))
}

#[derive(Debug, Deserialize)]
pub struct CreateMatchRequest {
    #[serde(alias = "user1Id")]
    pub user_a: Option<Uuid>,
    #[serde(alias = "user2Id")]
    pub user_b: Uuid,
}

// --- POST /matches ---

pub async fn create_match(
    user: AuthUser,
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateMatchRequest>,
) -> AppResult<Created<Match>> {
    let user_a = acting_as(&user, req.user_a)?;
    let record = like_engine::create_match(state.store.as_ref(), user_a, req.user_b).await?;
    Ok(Created(record))
}

// --- GET /matches/:id ---

pub async fn get_match(
    user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Match>>> {
    let record = like_engine::get_match(state.store.as_ref(), id).await?;
    if !record.pair().contains(user.id) {
        return Err(AppError::new(ErrorCode::NotMatchParticipant, "you are not part of this match"));
    }
    Ok(Json(ApiResponse::ok(record)))
}
