use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use sportmatch_shared::errors::AppResult;
use sportmatch_shared::middleware::AppJson;
use sportmatch_shared::types::auth::SessionToken;
use sportmatch_shared::types::ApiResponse;

use crate::routes::validate_request;
use crate::services::account_service;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<SessionToken>>> {
    validate_request(&req)?;
    let token = account_service::login(state.store.as_ref(), &state.jwt, &req.email, &req.password).await?;
    Ok(Json(ApiResponse::ok(token)))
}
