use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::schema::{likes, matches, messages, users};

// --- User ---

/// Canonical account + profile record. The password hash never leaves the process.
#[derive(Debug, Queryable, Selectable, Identifiable, Serialize, Clone)]
#[diesel(table_name = users)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: Option<String>,
    pub sports: Vec<String>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub video_url: Option<String>,
    pub age: Option<i32>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub sports: Vec<String>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub video_url: Option<String>,
    pub age: Option<i32>,
    pub location: Option<String>,
}

/// Swipeable fields shared by registration and profile creation.
#[derive(Debug, Deserialize, Validate, Default, Clone)]
pub struct ProfileFields {
    #[validate(length(max = 100, message = "full name must be at most 100 characters"))]
    pub full_name: Option<String>,
    #[serde(default)]
    pub sports: Vec<String>,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[validate(url(message = "photo_url must be a valid URL"))]
    pub photo_url: Option<String>,
    #[validate(url(message = "video_url must be a valid URL"))]
    pub video_url: Option<String>,
    #[validate(range(min = 18, max = 120, message = "age must be between 18 and 120"))]
    pub age: Option<i32>,
    #[validate(length(max = 100, message = "location must be at most 100 characters"))]
    pub location: Option<String>,
}

/// Body of `POST /register` and `POST /profiles`.
#[derive(Debug, Deserialize, Validate, Clone)]
pub struct NewAccount {
    pub username: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    pub password: String,
    #[serde(flatten)]
    #[validate]
    pub profile: ProfileFields,
}

/// Partial profile update. Absent fields are left untouched.
#[derive(Debug, AsChangeset, Deserialize, Validate, Default, Clone)]
#[diesel(table_name = users)]
pub struct UserChanges {
    pub username: Option<String>,
    #[validate(length(max = 100, message = "full name must be at most 100 characters"))]
    pub full_name: Option<String>,
    pub sports: Option<Vec<String>>,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[validate(url(message = "photo_url must be a valid URL"))]
    pub photo_url: Option<String>,
    #[validate(url(message = "video_url must be a valid URL"))]
    pub video_url: Option<String>,
    #[validate(range(min = 18, max = 120, message = "age must be between 18 and 120"))]
    pub age: Option<i32>,
    #[validate(length(max = 100, message = "location must be at most 100 characters"))]
    pub location: Option<String>,
}

impl UserChanges {
    pub fn apply_to(&self, user: &mut User) {
        if let Some(v) = &self.username {
            user.username = v.clone();
        }
        if let Some(v) = &self.full_name {
            user.full_name = Some(v.clone());
        }
        if let Some(v) = &self.sports {
            user.sports = v.clone();
        }
        if let Some(v) = &self.description {
            user.description = Some(v.clone());
        }
        if let Some(v) = &self.photo_url {
            user.photo_url = Some(v.clone());
        }
        if let Some(v) = &self.video_url {
            user.video_url = Some(v.clone());
        }
        if let Some(v) = self.age {
            user.age = Some(v);
        }
        if let Some(v) = &self.location {
            user.location = Some(v.clone());
        }
    }
}

/// Public projection of a [`User`]. `email` is only filled in for the owner.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub sports: Vec<String>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub video_url: Option<String>,
    pub age: Option<i32>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn public(user: User) -> Self {
        Self::project(user, false)
    }

    pub fn owned(user: User) -> Self {
        Self::project(user, true)
    }

    fn project(user: User, with_email: bool) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: with_email.then_some(user.email),
            full_name: user.full_name,
            sports: user.sports,
            description: user.description,
            photo_url: user.photo_url,
            video_url: user.video_url,
            age: user.age,
            location: user.location,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// --- Like ---

#[derive(Debug, Queryable, Selectable, Identifiable, Serialize, Clone)]
#[diesel(table_name = likes)]
pub struct Like {
    pub id: Uuid,
    pub liker_id: Uuid,
    pub likee_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = likes)]
pub struct NewLike {
    pub id: Uuid,
    pub liker_id: Uuid,
    pub likee_id: Uuid,
}

impl NewLike {
    pub fn new(liker_id: Uuid, likee_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            liker_id,
            likee_id,
        }
    }
}

// --- Match ---

/// Unordered pair of distinct users, stored smaller id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchPair {
    low: Uuid,
    high: Uuid,
}

impl MatchPair {
    /// `None` when both ids are the same user.
    pub fn new(a: Uuid, b: Uuid) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn low(&self) -> Uuid {
        self.low
    }

    pub fn high(&self) -> Uuid {
        self.high
    }

    pub fn contains(&self, user: Uuid) -> bool {
        self.low == user || self.high == user
    }

    pub fn other(&self, user: Uuid) -> Option<Uuid> {
        if user == self.low {
            Some(self.high)
        } else if user == self.high {
            Some(self.low)
        } else {
            None
        }
    }
}

#[derive(Debug, Queryable, Selectable, Identifiable, Serialize, Deserialize, Clone, PartialEq)]
#[diesel(table_name = matches)]
pub struct Match {
    pub id: Uuid,
    pub user_a_id: Uuid,
    pub user_b_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    pub fn pair(&self) -> MatchPair {
        MatchPair {
            low: self.user_a_id,
            high: self.user_b_id,
        }
    }

    pub fn other_participant(&self, user: Uuid) -> Option<Uuid> {
        self.pair().other(user)
    }
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = matches)]
pub struct NewMatch {
    pub id: Uuid,
    pub user_a_id: Uuid,
    pub user_b_id: Uuid,
}

impl NewMatch {
    pub fn for_pair(pair: MatchPair) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_a_id: pair.low(),
            user_b_id: pair.high(),
        }
    }
}

// --- Message ---

#[derive(Debug, Queryable, Selectable, Identifiable, Serialize, Deserialize, Clone, PartialEq)]
#[diesel(table_name = messages)]
pub struct Message {
    pub id: Uuid,
    pub match_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = messages)]
pub struct NewMessage {
    pub id: Uuid,
    pub match_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}
