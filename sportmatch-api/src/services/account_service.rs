use uuid::Uuid;

use sportmatch_shared::errors::{AppError, AppResult, ErrorCode};
use sportmatch_shared::types::auth::{JwtKeys, SessionToken};

use crate::models::{NewAccount, NewUser, User};
use crate::services::{auth_service, profile_service};
use crate::store::Store;

/// Creates a user after validating the request and checking uniqueness.
/// The store's unique constraints still decide races between concurrent sign-ups.
pub async fn register(store: &dyn Store, account: NewAccount) -> AppResult<User> {
    auth_service::validate_username(&account.username)?;
    auth_service::validate_password(&account.password)?;
    let email = auth_service::normalize_email(&account.email);

    if store.email_taken(&email).await? {
        return Err(AppError::new(ErrorCode::EmailAlreadyExists, "email already registered"));
    }
    if store.username_taken(&account.username, None).await? {
        return Err(AppError::new(ErrorCode::UsernameTaken, "username is already taken"));
    }

    let password_hash = auth_service::hash_password(&account.password)?;
    let profile = account.profile;

    let user = store
        .insert_user(NewUser {
            id: Uuid::now_v7(),
            username: account.username,
            email,
            password_hash,
            full_name: profile.full_name,
            sports: profile_service::normalize_sports(profile.sports),
            description: profile.description,
            photo_url: profile.photo_url,
            video_url: profile.video_url,
            age: profile.age,
            location: profile.location,
        })
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(user)
}

pub async fn login(store: &dyn Store, keys: &JwtKeys, email: &str, password: &str) -> AppResult<SessionToken> {
    let invalid = || AppError::new(ErrorCode::InvalidCredentials, "invalid email or password");

    let user = store
        .find_user_by_email(&auth_service::normalize_email(email))
        .await?
        .ok_or_else(invalid)?;

    if !auth_service::verify_password(password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "password mismatch");
        return Err(invalid());
    }

    let token = keys.issue(user.id, &user.username)?;
    tracing::info!(user_id = %user.id, "user logged in");
    Ok(token)
}

pub async fn current_user(store: &dyn Store, user_id: Uuid) -> AppResult<User> {
    store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::NotFound, "user not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProfileFields;
    use crate::store::MemoryStore;

    fn account(username: &str, email: &str) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            email: email.to_string(),
            password: "goalkeeper9".to_string(),
            profile: ProfileFields {
                sports: vec!["Football".into(), " tennis ".into()],
                age: Some(27),
                ..ProfileFields::default()
            },
        }
    }

    #[tokio::test]
    async fn register_stores_lowercased_email_and_hash() {
        let store = MemoryStore::new();
        let user = register(&store, account("keeper", "Keeper@Example.com")).await.unwrap();

        assert_eq!(user.email, "keeper@example.com");
        assert_ne!(user.password_hash, "goalkeeper9");
        assert_eq!(user.sports, vec!["football".to_string(), "tennis".to_string()]);
    }

    #[tokio::test]
    async fn duplicate_email_and_username_are_conflicts() {
        let store = MemoryStore::new();
        register(&store, account("keeper", "keeper@example.com")).await.unwrap();

        let err = register(&store, account("other", "KEEPER@example.com")).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::EmailAlreadyExists);

        let err = register(&store, account("keeper", "new@example.com")).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::UsernameTaken);
    }

    #[tokio::test]
    async fn login_issues_token_for_the_right_password_only() {
        let store = MemoryStore::new();
        let keys = JwtKeys::new("secret", 600);
        let user = register(&store, account("keeper", "keeper@example.com")).await.unwrap();

        let token = login(&store, &keys, "KEEPER@example.com", "goalkeeper9").await.unwrap();
        assert_eq!(keys.verify(&token.access_token).unwrap().sub, user.id);

        let err = login(&store, &keys, "keeper@example.com", "wrong-pass1").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidCredentials);

        let err = login(&store, &keys, "nobody@example.com", "goalkeeper9").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidCredentials);
    }
}
