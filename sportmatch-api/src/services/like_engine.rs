//! Directed likes and the match relation derived from them.
//!
//! A like is an edge `liker -> likee`. When the reverse edge already exists the
//! pair is materialized as a single match row keyed by its canonical pair, so
//! the relation stays symmetric no matter which side liked first or how often.

use metrics::counter;
use serde::Serialize;
use uuid::Uuid;

use sportmatch_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{Match, MatchPair, NewLike, NewMatch};
use crate::store::Store;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LikeOutcome {
    #[serde(rename = "match")]
    pub matched: bool,
    /// `[from_user, to_user]` on a match, empty otherwise.
    pub users: Vec<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_id: Option<Uuid>,
}

impl LikeOutcome {
    fn pending() -> Self {
        Self {
            matched: false,
            users: Vec::new(),
            match_id: None,
        }
    }
}

async fn ensure_user(store: &dyn Store, id: Uuid) -> AppResult<()> {
    match store.find_user(id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::new(ErrorCode::ProfileNotFound, format!("profile {id} not found"))),
    }
}

fn pair_of(a: Uuid, b: Uuid) -> AppResult<MatchPair> {
    MatchPair::new(a, b).ok_or_else(|| AppError::new(ErrorCode::CannotLikeSelf, "cannot like yourself"))
}

pub async fn submit_like(store: &dyn Store, from_user: Uuid, to_user: Uuid) -> AppResult<LikeOutcome> {
    let pair = pair_of(from_user, to_user)?;
    ensure_user(store, from_user).await?;
    ensure_user(store, to_user).await?;

    let like = store.insert_like(NewLike::new(from_user, to_user)).await?;
    tracing::debug!(like_id = %like.id, from = %from_user, to = %to_user, "like recorded");

    // The insert above is committed before this read, so of two crossing likes
    // at least one sees the other.
    if !store.like_exists(to_user, from_user).await? {
        return Ok(LikeOutcome::pending());
    }

    let (record, created) = store.insert_match(NewMatch::for_pair(pair)).await?;
    if created {
        counter!("sportmatch_matches_created_total").increment(1);
        tracing::info!(match_id = %record.id, user_a = %record.user_a_id, user_b = %record.user_b_id, "match created");
    }

    Ok(LikeOutcome {
        matched: true,
        users: vec![from_user, to_user],
        match_id: Some(record.id),
    })
}

/// Ids of everyone `user` has matched with, oldest match first.
pub async fn list_matches(store: &dyn Store, user: Uuid) -> AppResult<Vec<Uuid>> {
    let matches = store.matches_for_user(user).await?;
    Ok(matches
        .iter()
        .filter_map(|m| m.other_participant(user))
        .collect())
}

pub async fn list_match_records(store: &dyn Store, user: Uuid) -> AppResult<Vec<Match>> {
    Ok(store.matches_for_user(user).await?)
}

pub async fn get_match(store: &dyn Store, match_id: Uuid) -> AppResult<Match> {
    store
        .find_match(match_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MatchNotFound, format!("match {match_id} not found")))
}

/// Materializes the match for a pair that already liked each other both ways.
/// A pair that is already matched gets its existing record back.
pub async fn create_match(store: &dyn Store, user_a: Uuid, user_b: Uuid) -> AppResult<Match> {
    let pair = pair_of(user_a, user_b)?;
    ensure_user(store, user_a).await?;
    ensure_user(store, user_b).await?;

    if let Some(existing) = store.find_match_by_pair(pair).await? {
        return Ok(existing);
    }

    if !(store.like_exists(user_a, user_b).await? && store.like_exists(user_b, user_a).await?) {
        return Err(AppError::new(
            ErrorCode::NoMutualLike,
            "both users must like each other before a match exists",
        ));
    }

    let (record, created) = store.insert_match(NewMatch::for_pair(pair)).await?;
    if created {
        counter!("sportmatch_matches_created_total").increment(1);
        tracing::info!(match_id = %record.id, "match created explicitly");
    }
    Ok(record)
}

pub async fn has_liked(store: &dyn Store, from_user: Uuid, to_user: Uuid) -> AppResult<bool> {
    Ok(store.like_exists(from_user, to_user).await?)
}
