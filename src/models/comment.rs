use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::user::Author;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    /// Identifier of the user who wrote the comment.
    pub user_id: Uuid,
    pub blog_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A comment as listed under a post, with its author's public profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: Uuid,
    pub blog_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author: Author,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CommentInput {
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
}

impl Comment {
    pub fn new(input: CommentInput, blog_id: Uuid, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            blog_id,
            content: input.content,
            created_at: Utc::now(),
        }
    }
}
