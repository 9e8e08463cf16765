use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user's like of one post. At most one exists per `(user_id, blog_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub user_id: Uuid,
    pub blog_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// One share of a post. A user may share the same post any number of times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Share {
    pub id: Uuid,
    pub user_id: Uuid,
    pub blog_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(user_id: Uuid, blog_id: Uuid) -> Self {
        Self {
            user_id,
            blog_id,
            created_at: Utc::now(),
        }
    }
}

impl Share {
    pub fn new(user_id: Uuid, blog_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            blog_id,
            created_at: Utc::now(),
        }
    }
}
