use uuid::Uuid;

use sportmatch_shared::errors::{AppError, AppResult, ErrorCode};
use sportmatch_shared::types::pagination::{Paginated, PaginationParams};

use crate::models::{Profile, UserChanges};
use crate::services::auth_service;
use crate::store::Store;

/// Trimmed, lowercased, without blanks or repeats. First occurrence wins.
pub fn normalize_sports(sports: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(sports.len());
    for sport in sports {
        let sport = sport.trim().to_lowercase();
        if !sport.is_empty() && !out.contains(&sport) {
            out.push(sport);
        }
    }
    out
}

fn not_found(id: Uuid) -> AppError {
    AppError::new(ErrorCode::ProfileNotFound, format!("profile {id} not found"))
}

pub async fn list(store: &dyn Store, params: &PaginationParams) -> AppResult<Paginated<Profile>> {
    let (users, total) = store.list_users(params.offset(), params.limit()).await?;
    let items = users.into_iter().map(Profile::public).collect();
    Ok(Paginated::new(items, total, params))
}

/// The owner sees their own email; everyone else gets the public projection.
pub async fn get(store: &dyn Store, id: Uuid, viewer: Option<Uuid>) -> AppResult<Profile> {
    let user = store.find_user(id).await?.ok_or_else(|| not_found(id))?;
    if viewer == Some(user.id) {
        Ok(Profile::owned(user))
    } else {
        Ok(Profile::public(user))
    }
}

pub async fn update(store: &dyn Store, caller: Uuid, id: Uuid, mut changes: UserChanges) -> AppResult<Profile> {
    if store.find_user(id).await?.is_none() {
        return Err(not_found(id));
    }
    if caller != id {
        return Err(AppError::new(ErrorCode::NotProfileOwner, "you can only edit your own profile"));
    }

    if let Some(username) = &changes.username {
        auth_service::validate_username(username)?;
        if store.username_taken(username, Some(id)).await? {
            return Err(AppError::new(ErrorCode::UsernameTaken, "username is already taken"));
        }
    }
    changes.sports = changes.sports.map(normalize_sports);

    let user = store.update_user(id, changes).await?.ok_or_else(|| not_found(id))?;
    tracing::info!(user_id = %id, "profile updated");
    Ok(Profile::owned(user))
}

pub async fn delete(store: &dyn Store, caller: Uuid, id: Uuid) -> AppResult<()> {
    if store.find_user(id).await?.is_none() {
        return Err(not_found(id));
    }
    if caller != id {
        return Err(AppError::new(ErrorCode::NotProfileOwner, "you can only delete your own profile"));
    }

    if !store.delete_user(id).await? {
        return Err(not_found(id));
    }
    tracing::info!(user_id = %id, "profile deleted");
    Ok(())
}
