use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use uuid::Uuid;

use sportmatch_shared::clients::db::{DbConn, DbPool};

use super::{AccountStore, LikeStore, MessageStore, Store, StoreError, StoreResult};
use crate::models::{
    Like, Match, MatchPair, Message, NewLike, NewMatch, NewMessage, NewUser, User, UserChanges,
};
use crate::schema::{likes, matches, messages, users};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

impl From<DieselError> for StoreError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                StoreError::UniqueViolation {
                    constraint: info.constraint_name().unwrap_or("unknown").to_string(),
                }
            }
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
                StoreError::Unavailable(info.message().to_string())
            }
            other => StoreError::Query(other.to_string()),
        }
    }
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn to_u64(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}

/// Diesel/Postgres backend. Blocking calls run on the blocking thread pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        let applied = self
            .run(|conn| {
                conn.run_pending_migrations(MIGRATIONS)
                    .map(|versions| versions.len())
                    .map_err(DieselError::QueryBuilderError)
            })
            .await?;

        tracing::info!(applied, "database migrations up to date");
        Ok(())
    }

    async fn run<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, DieselError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn: DbConn = pool
                .get()
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            f(&mut conn).map_err(StoreError::from)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("blocking task failed: {e}")))?
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        self.run(move |conn| {
            diesel::insert_into(users::table)
                .values(&user)
                .returning(User::as_returning())
                .get_result(conn)
        })
        .await
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        self.run(move |conn| {
            users::table
                .find(id)
                .select(User::as_select())
                .first(conn)
                .optional()
        })
        .await
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let email = email.to_owned();
        self.run(move |conn| {
            users::table
                .filter(users::email.eq(email))
                .select(User::as_select())
                .first(conn)
                .optional()
        })
        .await
    }

    async fn email_taken(&self, email: &str) -> StoreResult<bool> {
        let email = email.to_owned();
        self.run(move |conn| {
            diesel::select(diesel::dsl::exists(users::table.filter(users::email.eq(email))))
                .get_result(conn)
        })
        .await
    }

    async fn username_taken(&self, username: &str, except: Option<Uuid>) -> StoreResult<bool> {
        let username = username.to_owned();
        self.run(move |conn| {
            let holders = users::table.filter(users::username.eq(username));
            match except {
                Some(id) => diesel::select(diesel::dsl::exists(holders.filter(users::id.ne(id))))
                    .get_result(conn),
                None => diesel::select(diesel::dsl::exists(holders)).get_result(conn),
            }
        })
        .await
    }

    async fn list_users(&self, offset: u64, limit: u64) -> StoreResult<(Vec<User>, u64)> {
        self.run(move |conn| {
            let total: i64 = users::table.count().get_result(conn)?;
            let items = users::table
                .order((users::created_at.asc(), users::id.asc()))
                .offset(to_i64(offset))
                .limit(to_i64(limit))
                .select(User::as_select())
                .load(conn)?;
            Ok((items, to_u64(total)))
        })
        .await
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>> {
        self.run(move |conn| {
            diesel::update(users::table.find(id))
                .set((&changes, users::updated_at.eq(Utc::now())))
                .returning(User::as_returning())
                .get_result(conn)
                .optional()
        })
        .await
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        self.run(move |conn| {
            diesel::delete(users::table.find(id))
                .execute(conn)
                .map(|n| n > 0)
        })
        .await
    }
}

#[async_trait]
impl LikeStore for PgStore {
    async fn insert_like(&self, like: NewLike) -> StoreResult<Like> {
        self.run(move |conn| {
            diesel::insert_into(likes::table)
                .values(&like)
                .on_conflict((likes::liker_id, likes::likee_id))
                .do_nothing()
                .execute(conn)?;

            likes::table
                .filter(likes::liker_id.eq(like.liker_id))
                .filter(likes::likee_id.eq(like.likee_id))
                .select(Like::as_select())
                .first(conn)
        })
        .await
    }

    async fn like_exists(&self, liker_id: Uuid, likee_id: Uuid) -> StoreResult<bool> {
        self.run(move |conn| {
            diesel::select(diesel::dsl::exists(
                likes::table
                    .filter(likes::liker_id.eq(liker_id))
                    .filter(likes::likee_id.eq(likee_id)),
            ))
            .get_result(conn)
        })
        .await
    }

    async fn insert_match(&self, new_match: NewMatch) -> StoreResult<(Match, bool)> {
        self.run(move |conn| {
            let inserted = diesel::insert_into(matches::table)
                .values(&new_match)
                .on_conflict((matches::user_a_id, matches::user_b_id))
                .do_nothing()
                .execute(conn)?;

            let record = matches::table
                .filter(matches::user_a_id.eq(new_match.user_a_id))
                .filter(matches::user_b_id.eq(new_match.user_b_id))
                .select(Match::as_select())
                .first(conn)?;

            Ok((record, inserted == 1))
        })
        .await
    }

    async fn find_match(&self, id: Uuid) -> StoreResult<Option<Match>> {
        self.run(move |conn| {
            matches::table
                .find(id)
                .select(Match::as_select())
                .first(conn)
                .optional()
        })
        .await
    }

    async fn find_match_by_pair(&self, pair: MatchPair) -> StoreResult<Option<Match>> {
        self.run(move |conn| {
            matches::table
                .filter(matches::user_a_id.eq(pair.low()))
                .filter(matches::user_b_id.eq(pair.high()))
                .select(Match::as_select())
                .first(conn)
                .optional()
        })
        .await
    }

    async fn matches_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Match>> {
        self.run(move |conn| {
            matches::table
                .filter(matches::user_a_id.eq(user_id).or(matches::user_b_id.eq(user_id)))
                .order((matches::created_at.asc(), matches::id.asc()))
                .select(Match::as_select())
                .load(conn)
        })
        .await
    }
}

#[async_trait]
impl MessageStore for PgStore {
    async fn insert_message(&self, message: NewMessage) -> StoreResult<Message> {
        self.run(move |conn| {
            diesel::insert_into(messages::table)
                .values(&message)
                .returning(Message::as_returning())
                .get_result(conn)
        })
        .await
    }

    async fn messages_for_match(&self, match_id: Uuid) -> StoreResult<Vec<Message>> {
        self.run(move |conn| {
            // ids are v7, so they follow insertion order within equal timestamps
            messages::table
                .filter(messages::match_id.eq(match_id))
                .order((messages::sent_at.asc(), messages::id.asc()))
                .select(Message::as_select())
                .load(conn)
        })
        .await
    }

    async fn mark_read(&self, match_id: Uuid, receiver_id: Uuid) -> StoreResult<u64> {
        self.run(move |conn| {
            diesel::update(
                messages::table
                    .filter(messages::match_id.eq(match_id))
                    .filter(messages::receiver_id.eq(receiver_id))
                    .filter(messages::read.eq(false)),
            )
            .set((messages::read.eq(true), messages::updated_at.eq(Utc::now())))
            .execute(conn)
            .map(|n| n as u64)
        })
        .await
    }

    async fn unread_count(&self, receiver_id: Uuid) -> StoreResult<u64> {
        self.run(move |conn| {
            messages::table
                .filter(messages::receiver_id.eq(receiver_id))
                .filter(messages::read.eq(false))
                .count()
                .get_result::<i64>(conn)
                .map(to_u64)
        })
        .await
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        self.run(|conn| diesel::sql_query("SELECT 1").execute(conn).map(|_| ()))
            .await
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
