use axum::extract::State;

use sportmatch_shared::errors::AppResult;
use sportmatch_shared::middleware::AppJson;
use sportmatch_shared::types::api::Created;

use crate::models::{NewAccount, Profile};
use crate::routes::validate_request;
use crate::services::account_service;
use crate::AppState;

// --- POST /register ---

pub async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<NewAccount>,
) -> AppResult<Created<Profile>> {
    validate_request(&req)?;
    let user = account_service::register(state.store.as_ref(), req).await?;
    Ok(Created(Profile::owned(user)))
}
