use axum::extract::State;
use axum::Json;

use sportmatch_shared::errors::AppResult;
use sportmatch_shared::types::auth::AuthUser;
use sportmatch_shared::types::ApiResponse;

use crate::models::Profile;
use crate::services::account_service;
use crate::AppState;

pub async fn me(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let record = account_service::current_user(state.store.as_ref(), user.id).await?;
    Ok(Json(ApiResponse::ok(Profile::owned(record))))
}
