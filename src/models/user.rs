use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered account as stored in the `users` table.
///
/// `password_hash` never leaves the server: it is skipped on serialization.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A user about to be inserted. The password has already been hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub image: Option<String>,
}

/// Public profile returned alongside a login token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            image: user.image.clone(),
        }
    }
}

/// The owner of a post or comment, embedded in read views.
///
/// `email` is only filled in for single-post reads; listings leave it out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub email: Option<String>,
    pub image: Option<String>,
}

impl Author {
    pub fn from_user(user: &User, with_email: bool) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: with_email.then(|| user.email.clone()),
            image: user.image.clone(),
        }
    }
}
