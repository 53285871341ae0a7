use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{
    AccountStore, LikeStore, MessageStore, Store, StoreError, StoreResult, USERS_EMAIL_KEY,
    USERS_USERNAME_KEY,
};
use crate::models::{
    Like, Match, MatchPair, Message, NewLike, NewMatch, NewMessage, NewUser, User, UserChanges,
};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    likes: Vec<Like>,
    matches: Vec<Match>,
    messages: Vec<Message>,
}

/// In-process backend with the same constraints as the Postgres schema.
/// Used by the test suite and by `storage = "memory"` for local runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn unique_violation(constraint: &str) -> StoreError {
    StoreError::UniqueViolation {
        constraint: constraint.to_string(),
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.lock().await;
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(unique_violation(USERS_USERNAME_KEY));
        }
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(unique_violation(USERS_EMAIL_KEY));
        }

        let now = Utc::now();
        let record = User {
            id: user.id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            full_name: user.full_name,
            sports: user.sports,
            description: user.description,
            photo_url: user.photo_url,
            video_url: user.video_url,
            age: user.age,
            location: user.location,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(record.clone());
        Ok(record)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn email_taken(&self, email: &str) -> StoreResult<bool> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().any(|u| u.email == email))
    }

    async fn username_taken(&self, username: &str, except: Option<Uuid>) -> StoreResult<bool> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .any(|u| u.username == username && Some(u.id) != except))
    }

    async fn list_users(&self, offset: u64, limit: u64) -> StoreResult<(Vec<User>, u64)> {
        let tables = self.tables.lock().await;
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let items = tables.users.iter().skip(offset).take(limit).cloned().collect();
        Ok((items, tables.users.len() as u64))
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>> {
        let mut tables = self.tables.lock().await;
        if let Some(username) = &changes.username {
            if tables.users.iter().any(|u| &u.username == username && u.id != id) {
                return Err(unique_violation(USERS_USERNAME_KEY));
            }
        }

        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        changes.apply_to(user);
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Ok(false);
        }

        tables.likes.retain(|l| l.liker_id != id && l.likee_id != id);
        let gone: Vec<Uuid> = tables
            .matches
            .iter()
            .filter(|m| m.pair().contains(id))
            .map(|m| m.id)
            .collect();
        tables.matches.retain(|m| !gone.contains(&m.id));
        tables
            .messages
            .retain(|m| !gone.contains(&m.match_id) && m.sender_id != id && m.receiver_id != id);
        Ok(true)
    }
}

#[async_trait]
impl LikeStore for MemoryStore {
    async fn insert_like(&self, like: NewLike) -> StoreResult<Like> {
        let mut tables = self.tables.lock().await;
        if let Some(existing) = tables
            .likes
            .iter()
            .find(|l| l.liker_id == like.liker_id && l.likee_id == like.likee_id)
        {
            return Ok(existing.clone());
        }

        let record = Like {
            id: like.id,
            liker_id: like.liker_id,
            likee_id: like.likee_id,
            created_at: Utc::now(),
        };
        tables.likes.push(record.clone());
        Ok(record)
    }

    async fn like_exists(&self, liker_id: Uuid, likee_id: Uuid) -> StoreResult<bool> {
        let tables = self.tables.lock().await;
        Ok(tables
            .likes
            .iter()
            .any(|l| l.liker_id == liker_id && l.likee_id == likee_id))
    }

    async fn insert_match(&self, new_match: NewMatch) -> StoreResult<(Match, bool)> {
        let mut tables = self.tables.lock().await;
        if let Some(existing) = tables
            .matches
            .iter()
            .find(|m| m.user_a_id == new_match.user_a_id && m.user_b_id == new_match.user_b_id)
        {
            return Ok((existing.clone(), false));
        }

        let now = Utc::now();
        let record = Match {
            id: new_match.id,
            user_a_id: new_match.user_a_id,
            user_b_id: new_match.user_b_id,
            created_at: now,
            updated_at: now,
        };
        tables.matches.push(record.clone());
        Ok((record, true))
    }

    async fn find_match(&self, id: Uuid) -> StoreResult<Option<Match>> {
        let tables = self.tables.lock().await;
        Ok(tables.matches.iter().find(|m| m.id == id).cloned())
    }

    async fn find_match_by_pair(&self, pair: MatchPair) -> StoreResult<Option<Match>> {
        let tables = self.tables.lock().await;
        Ok(tables.matches.iter().find(|m| m.pair() == pair).cloned())
    }

    async fn matches_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Match>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .matches
            .iter()
            .filter(|m| m.pair().contains(user_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn insert_message(&self, message: NewMessage) -> StoreResult<Message> {
        let mut tables = self.tables.lock().await;
        let record = Message {
            id: message.id,
            match_id: message.match_id,
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            body: message.body,
            sent_at: message.sent_at,
            read: false,
            created_at: message.sent_at,
            updated_at: message.sent_at,
        };
        tables.messages.push(record.clone());
        Ok(record)
    }

    async fn messages_for_match(&self, match_id: Uuid) -> StoreResult<Vec<Message>> {
        let tables = self.tables.lock().await;
        let mut thread: Vec<Message> = tables
            .messages
            .iter()
            .filter(|m| m.match_id == match_id)
            .cloned()
            .collect();
        // stable: equal timestamps keep insertion order
        thread.sort_by_key(|m| m.sent_at);
        Ok(thread)
    }

    async fn mark_read(&self, match_id: Uuid, receiver_id: Uuid) -> StoreResult<u64> {
        let mut tables = self.tables.lock().await;
        let now = Utc::now();
        let mut flipped = 0;
        for message in tables
            .messages
            .iter_mut()
            .filter(|m| m.match_id == match_id && m.receiver_id == receiver_id && !m.read)
        {
            message.read = true;
            message.updated_at = now;
            flipped += 1;
        }
        Ok(flipped)
    }

    async fn unread_count(&self, receiver_id: Uuid) -> StoreResult<u64> {
        let tables = self.tables.lock().await;
        Ok(tables
            .messages
            .iter()
            .filter(|m| m.receiver_id == receiver_id && !m.read)
            .count() as u64)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
