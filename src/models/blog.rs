use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::user::Author;

/// A blog post row as stored in the `blogs` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Blog {
    pub id: Uuid,
    /// Identifier of the user who wrote the post.
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    /// Inline image as a `data:<mime>;base64,<payload>` string.
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Read view of a post: the row, its author and the engagement counts.
///
/// The counts are computed from the `likes` and `shares` tables on every read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub likes_count: i64,
    pub shares_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: Author,
}

/// A new post assembled from a multipart form.
#[derive(Debug, Validate)]
pub struct BlogDraft {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 20000))]
    pub content: String,
    pub image: Option<String>,
}

/// Changes to an existing post. Only the fields that are present are written.
#[derive(Debug, Default, Validate)]
pub struct BlogChanges {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 20000))]
    pub content: Option<String>,
    pub image: Option<String>,
}

impl Blog {
    pub fn new(draft: BlogDraft, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: draft.title,
            content: draft.content,
            image: draft.image,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, changes: &BlogChanges) {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(content) = &changes.content {
            self.content = content.clone();
        }
        if let Some(image) = &changes.image {
            self.image = Some(image.clone());
        }
        self.updated_at = Utc::now();
    }
}
