use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sportmatch_shared::errors::AppResult;
use sportmatch_shared::middleware::{AppJson, AppPath};
use sportmatch_shared::types::auth::AuthUser;
use sportmatch_shared::types::ApiResponse;

use crate::routes::acting_as;
use crate::services::like_engine::{self, LikeOutcome};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LikeRequest {
    pub from_user: Option<Uuid>,
    pub to_user: Uuid,
}

// --- POST /likes ---

pub async fn submit_like(
    user: AuthUser,
    State(state): State<AppState>,
    AppJson(req): AppJson<LikeRequest>,
) -> AppResult<Json<ApiResponse<LikeOutcome>>> {
    let from_user = acting_as(&user, req.from_user)?;
    let outcome = like_engine::submit_like(state.store.as_ref(), from_user, req.to_user).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

#[derive(Debug, Serialize)]
pub struct LikeCheckResponse {
    pub already_liked: bool,
}

/// GET /likes/check/:target_id - whether the caller already liked the target
pub async fn check_like(
    user: AuthUser,
    State(state): State<AppState>,
    AppPath(target_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<LikeCheckResponse>>> {
    let already_liked = like_engine::has_liked(state.store.as_ref(), user.id, target_id).await?;
    Ok(Json(ApiResponse::ok(LikeCheckResponse { already_liked })))
}
