use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sportmatch_shared::errors::{AppError, AppResult};
use sportmatch_shared::middleware::{AppJson, AppQuery};
use sportmatch_shared::types::api::Created;
use sportmatch_shared::types::auth::AuthUser;
use sportmatch_shared::types::ApiResponse;

use crate::models::Message;
use crate::routes::acting_as;
use crate::services::message_service;
use crate::AppState;

// --- Request DTOs ---

#[derive(Debug, Deserialize)]
pub struct ThreadQuery {
    #[serde(alias = "matchId")]
    pub match_id: Option<Uuid>,
    #[serde(alias = "userId")]
    pub user_id: Option<Uuid>,
}

impl ThreadQuery {
    fn match_id(&self) -> AppResult<Uuid> {
        self.match_id
            .ok_or_else(|| AppError::Validation("match_id is required".to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(alias = "matchId")]
    pub match_id: Uuid,
    #[serde(alias = "senderId")]
    pub sender_id: Option<Uuid>,
    #[serde(alias = "receiverId")]
    pub receiver_id: Option<Uuid>,
    #[serde(alias = "content")]
    pub body: String,
}

// --- Response DTOs ---

#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub modified_count: u64,
}

#[derive(Debug, Serialize)]
pub struct UnreadResponse {
    pub total_unread: u64,
}

// --- Handlers ---

/// GET /messages?match_id= - the whole thread, oldest first
pub async fn list_messages(
    user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ThreadQuery>,
) -> AppResult<Json<ApiResponse<Vec<Message>>>> {
    let match_id = query.match_id()?;
    let messages = message_service::list(state.store.as_ref(), match_id, user.id).await?;
    Ok(Json(ApiResponse::ok(messages)))
}

/// POST /messages
pub async fn send_message(
    user: AuthUser,
    State(state): State<AppState>,
    AppJson(req): AppJson<SendMessageRequest>,
) -> AppResult<Created<Message>> {
    let sender = acting_as(&user, req.sender_id)?;
    let message = message_service::send(
        state.store.as_ref(),
        req.match_id,
        sender,
        req.receiver_id,
        req.body,
    )
    .await?;
    Ok(Created(message))
}

/// PATCH /messages/read?match_id=&user_id= - flips the caller's unread messages in one match
pub async fn mark_read(
    user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ThreadQuery>,
) -> AppResult<Json<ApiResponse<MarkReadResponse>>> {
    let match_id = query.match_id()?;
    let reader = acting_as(&user, query.user_id)?;
    let modified_count = message_service::mark_read(state.store.as_ref(), match_id, reader).await?;
    Ok(Json(ApiResponse::ok(MarkReadResponse { modified_count })))
}

/// GET /messages/unread - unread total across all of the caller's matches
pub async fn unread_count(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<UnreadResponse>>> {
    let total_unread = message_service::unread_count(state.store.as_ref(), user.id).await?;
    Ok(Json(ApiResponse::ok(UnreadResponse { total_unread })))
}
