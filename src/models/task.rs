use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Input structure for creating a task.
/// Contains validation rules for its fields.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task.
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// An optional description for the task.
    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Input structure for updating a task. Omitted fields keep their stored value.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub completed: Option<bool>,
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    /// Identifier of the user who owns the task.
    pub user_id: Uuid,
    /// The title of the task.
    pub title: String,
    /// An optional description for the task.
    pub description: Option<String>,
    /// Whether the task is done.
    pub completed: bool,
    /// Timestamp of when the task was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update to the task.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new, not yet completed `Task` owned by `user_id`.
    pub fn new(input: TaskInput, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: input.title,
            description: input.description,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the provided fields of `update` and bumps `updated_at`.
    pub fn apply(&mut self, update: &TaskUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(description) = &update.description {
            self.description = Some(description.clone());
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
        self.updated_at = Utc::now();
    }
}
