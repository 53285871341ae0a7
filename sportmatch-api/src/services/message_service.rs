use chrono::Utc;
use uuid::Uuid;

use sportmatch_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{Match, Message, NewMessage};
use crate::services::like_engine;
use crate::store::Store;

pub const MAX_BODY_CHARS: usize = 2000;

fn participant_of(record: &Match, user: Uuid) -> AppResult<Uuid> {
    record.other_participant(user).ok_or_else(|| {
        AppError::new(ErrorCode::NotMatchParticipant, "you are not part of this match")
    })
}

fn check_body(body: &str) -> AppResult<()> {
    if body.trim().is_empty() {
        return Err(AppError::new(ErrorCode::MessageBodyInvalid, "message body cannot be empty"));
    }
    if body.chars().count() > MAX_BODY_CHARS {
        return Err(AppError::new(
            ErrorCode::MessageBodyInvalid,
            format!("message body must be at most {MAX_BODY_CHARS} characters"),
        ));
    }
    Ok(())
}

/// Appends a message to the match thread. The receiver is always the other
/// participant; an explicit `receiver` must agree with it.
pub async fn send(
    store: &dyn Store,
    match_id: Uuid,
    sender: Uuid,
    receiver: Option<Uuid>,
    body: String,
) -> AppResult<Message> {
    let record = like_engine::get_match(store, match_id).await?;
    let other = participant_of(&record, sender)?;
    if let Some(receiver) = receiver {
        if receiver != other {
            return Err(AppError::new(
                ErrorCode::ReceiverMismatch,
                "receiver must be the other participant of the match",
            ));
        }
    }
    check_body(&body)?;

    let message = store
        .insert_message(NewMessage {
            id: Uuid::now_v7(),
            match_id,
            sender_id: sender,
            receiver_id: other,
            body,
            sent_at: Utc::now(),
        })
        .await?;

    tracing::debug!(message_id = %message.id, match_id = %match_id, "message sent");
    Ok(message)
}

pub async fn list(store: &dyn Store, match_id: Uuid, caller: Uuid) -> AppResult<Vec<Message>> {
    let record = like_engine::get_match(store, match_id).await?;
    participant_of(&record, caller)?;
    Ok(store.messages_for_match(match_id).await?)
}

/// Marks everything addressed to `user` in the match as read. Returns how many flipped.
pub async fn mark_read(store: &dyn Store, match_id: Uuid, user: Uuid) -> AppResult<u64> {
    let record = like_engine::get_match(store, match_id).await?;
    participant_of(&record, user)?;

    let modified = store.mark_read(match_id, user).await?;
    if modified > 0 {
        tracing::debug!(match_id = %match_id, user_id = %user, modified, "messages marked read");
    }
    Ok(modified)
}

pub async fn unread_count(store: &dyn Store, user: Uuid) -> AppResult<u64> {
    Ok(store.unread_count(user).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchPair, NewMatch, NewUser};
    use crate::store::{AccountStore, LikeStore, MemoryStore};
    use rstest::rstest;

    struct Thread {
        store: MemoryStore,
        ana: Uuid,
        ben: Uuid,
        match_id: Uuid,
    }

    async fn user(store: &MemoryStore, name: &str) -> Uuid {
        store
            .insert_user(NewUser {
                id: Uuid::now_v7(),
                username: name.to_string(),
                email: format!("{name}@example.com"),
                password_hash: "hash".to_string(),
                full_name: None,
                sports: vec![],
                description: None,
                photo_url: None,
                video_url: None,
                age: None,
                location: None,
            })
            .await
            .unwrap()
            .id
    }

    async fn matched(store: &MemoryStore, a: Uuid, b: Uuid) -> Uuid {
        let pair = MatchPair::new(a, b).unwrap();
        store.insert_match(NewMatch::for_pair(pair)).await.unwrap().0.id
    }

    async fn thread() -> Thread {
        let store = MemoryStore::new();
        let ana = user(&store, "ana").await;
        let ben = user(&store, "ben").await;
        let match_id = matched(&store, ana, ben).await;
        Thread { store, ana, ben, match_id }
    }

    #[tokio::test]
    async fn receiver_is_derived_from_the_match() {
        let t = thread().await;
        let message = send(&t.store, t.match_id, t.ana, None, "rematch saturday?".into())
            .await
            .unwrap();

        assert_eq!(message.receiver_id, t.ben);
        assert!(!message.read);
    }

    #[tokio::test]
    async fn thread_is_returned_oldest_first() {
        let t = thread().await;
        for (i, from) in [t.ana, t.ben, t.ana, t.ben].into_iter().enumerate() {
            send(&t.store, t.match_id, from, None, format!("msg {i}")).await.unwrap();
        }

        let messages = list(&t.store, t.match_id, t.ben).await.unwrap();
        let bodies: Vec<&str> = messages.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, ["msg 0", "msg 1", "msg 2", "msg 3"]);
        assert!(messages.windows(2).all(|w| w[0].sent_at <= w[1].sent_at));
    }

    #[tokio::test]
    async fn mark_read_is_idempotent_and_scoped_to_receiver_and_match() {
        let t = thread().await;
        let cleo = user(&t.store, "cleo").await;
        let other_match = matched(&t.store, t.ben, cleo).await;

        send(&t.store, t.match_id, t.ana, None, "one".into()).await.unwrap();
        send(&t.store, t.match_id, t.ana, None, "two".into()).await.unwrap();
        send(&t.store, t.match_id, t.ben, None, "reply".into()).await.unwrap();
        send(&t.store, other_match, cleo, None, "hey ben".into()).await.unwrap();

        assert_eq!(unread_count(&t.store, t.ben).await.unwrap(), 3);
        assert_eq!(mark_read(&t.store, t.match_id, t.ben).await.unwrap(), 2);
        assert_eq!(mark_read(&t.store, t.match_id, t.ben).await.unwrap(), 0);

        // ben's other thread and ana's inbox are untouched
        assert_eq!(unread_count(&t.store, t.ben).await.unwrap(), 1);
        assert_eq!(unread_count(&t.store, t.ana).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn outsiders_cannot_read_or_write() {
        let t = thread().await;
        let eve = user(&t.store, "eve").await;

        let err = send(&t.store, t.match_id, eve, None, "hi".into()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotMatchParticipant);
        let err = list(&t.store, t.match_id, eve).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotMatchParticipant);
        let err = mark_read(&t.store, t.match_id, eve).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotMatchParticipant);
    }

    #[tokio::test]
    async fn wrong_receiver_is_rejected() {
        let t = thread().await;
        let err = send(&t.store, t.match_id, t.ana, Some(t.ana), "hi".into())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ReceiverMismatch);
    }

    #[tokio::test]
    async fn unknown_match_is_not_found() {
        let t = thread().await;
        let err = send(&t.store, Uuid::now_v7(), t.ana, None, "hi".into()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::MatchNotFound);
    }

    #[rstest]
    #[case(String::new())]
    #[case("   \n ".to_string())]
    #[case("x".repeat(MAX_BODY_CHARS + 1))]
    #[tokio::test]
    async fn invalid_bodies_are_rejected(#[case] body: String) {
        let t = thread().await;
        let err = send(&t.store, t.match_id, t.ana, None, body).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::MessageBodyInvalid);
    }
}
