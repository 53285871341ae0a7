use axum::extract::State;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use sportmatch_shared::errors::AppResult;
use sportmatch_shared::middleware::{AppJson, AppPath, AppQuery, OptionalAuthUser};
use sportmatch_shared::types::api::Created;
use sportmatch_shared::types::auth::AuthUser;
use sportmatch_shared::types::pagination::{Paginated, PaginationParams};
use sportmatch_shared::types::ApiResponse;

use crate::models::{NewAccount, Profile, UserChanges};
use crate::routes::validate_request;
use crate::services::{account_service, profile_service};
use crate::AppState;

// --- GET /profiles ---

pub async fn list_profiles(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<Profile>>>> {
    let page = profile_service::list(state.store.as_ref(), &params).await?;
    Ok(Json(ApiResponse::ok(page)))
}

// --- POST /profiles ---

/// Same contract as `POST /register`.
pub async fn create_profile(
    State(state): State<AppState>,
    AppJson(req): AppJson<NewAccount>,
) -> AppResult<Created<Profile>> {
    validate_request(&req)?;
    let user = account_service::register(state.store.as_ref(), req).await?;
    Ok(Created(Profile::owned(user)))
}

// --- GET /profiles/:id ---

pub async fn get_profile(
    viewer: OptionalAuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let viewer_id = viewer.0.map(|u| u.id);
    let profile = profile_service::get(state.store.as_ref(), id, viewer_id).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

// --- PUT /profiles/:id ---

pub async fn update_profile(
    user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(changes): AppJson<UserChanges>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    validate_request(&changes)?;
    let profile = profile_service::update(state.store.as_ref(), user.id, id, changes).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

// --- DELETE /profiles/:id ---

#[derive(Debug, Serialize)]
pub struct DeletedProfile {
    pub id: Uuid,
    pub deleted: bool,
}

pub async fn delete_profile(
    user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<DeletedProfile>>> {
    profile_service::delete(state.store.as_ref(), user.id, id).await?;
    Ok(Json(ApiResponse::ok_with_message(
        DeletedProfile { id, deleted: true },
        "profile deleted",
    )))
}
