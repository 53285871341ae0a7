//! Persistence ports. Services talk to these traits; `postgres` and `memory`
//! provide the two backends.

use async_trait::async_trait;
use uuid::Uuid;

use sportmatch_shared::errors::{AppError, ErrorCode};

use crate::models::{
    Like, Match, MatchPair, Message, NewLike, NewMatch, NewMessage, NewUser, User, UserChanges,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub const USERS_USERNAME_KEY: &str = "users_username_key";
pub const USERS_EMAIL_KEY: &str = "users_email_key";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("query failed: {0}")]
    Query(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { constraint } => match constraint.as_str() {
                USERS_EMAIL_KEY => AppError::new(ErrorCode::EmailAlreadyExists, "email already registered"),
                USERS_USERNAME_KEY => AppError::new(ErrorCode::UsernameTaken, "username is already taken"),
                _ => AppError::new(ErrorCode::ValidationError, "resource already exists"),
            },
            StoreError::Unavailable(msg) => AppError::new(ErrorCode::ServiceUnavailable, msg),
            StoreError::Query(msg) => AppError::internal(msg),
        }
    }
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// `email` must already be lowercased.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn email_taken(&self, email: &str) -> StoreResult<bool>;

    /// Whether another user (not `except`) holds `username`.
    async fn username_taken(&self, username: &str, except: Option<Uuid>) -> StoreResult<bool>;

    /// One page of users, oldest first, plus the total count.
    async fn list_users(&self, offset: u64, limit: u64) -> StoreResult<(Vec<User>, u64)>;

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>>;

    /// Removes the user with their likes, matches and messages.
    async fn delete_user(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait LikeStore: Send + Sync {
    /// Records the directed edge. An existing edge for the same pair is returned as is.
    async fn insert_like(&self, like: NewLike) -> StoreResult<Like>;

    async fn like_exists(&self, liker_id: Uuid, likee_id: Uuid) -> StoreResult<bool>;

    /// Inserts the match unless one exists for the pair. The flag is true when a row was created.
    async fn insert_match(&self, new_match: NewMatch) -> StoreResult<(Match, bool)>;

    async fn find_match(&self, id: Uuid) -> StoreResult<Option<Match>>;

    async fn find_match_by_pair(&self, pair: MatchPair) -> StoreResult<Option<Match>>;

    /// Every match the user takes part in, oldest first.
    async fn matches_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Match>>;
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn insert_message(&self, message: NewMessage) -> StoreResult<Message>;

    /// Oldest first; equal timestamps keep insertion order.
    async fn messages_for_match(&self, match_id: Uuid) -> StoreResult<Vec<Message>>;

    /// Flips unread messages in `match_id` addressed to `receiver_id`. Returns the number flipped.
    async fn mark_read(&self, match_id: Uuid, receiver_id: Uuid) -> StoreResult<u64>;

    async fn unread_count(&self, receiver_id: Uuid) -> StoreResult<u64>;
}

#[async_trait]
pub trait Store: AccountStore + LikeStore + MessageStore {
    /// Cheap round trip used by `/health`.
    async fn ping(&self) -> StoreResult<()>;

    fn backend(&self) -> &'static str;
}
