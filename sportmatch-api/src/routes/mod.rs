use uuid::Uuid;
use validator::Validate;

use sportmatch_shared::errors::{AppError, AppResult, ErrorCode};
use sportmatch_shared::types::auth::AuthUser;

pub mod health;
pub mod likes;
pub mod login;
pub mod matches;
pub mod me;
pub mod messages;
pub mod profiles;
pub mod register;

/// Runs the derive validations, reporting every failing field under `details`.
pub(crate) fn validate_request<T: Validate>(req: &T) -> AppResult<()> {
    req.validate().map_err(|errors| {
        let details = serde_json::to_value(&errors).unwrap_or(serde_json::Value::Null);
        AppError::with_details(ErrorCode::ValidationError, "request validation failed", details)
    })
}

/// Resolves a user id supplied by the client. Absent means the caller; anything
/// else must be the caller too.
pub(crate) fn acting_as(user: &AuthUser, claimed: Option<Uuid>) -> AppResult<Uuid> {
    match claimed {
        None => Ok(user.id),
        Some(id) if id == user.id => Ok(id),
        Some(_) => Err(AppError::forbidden("you can only act on your own behalf")),
    }
}
