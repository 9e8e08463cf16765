//! Persistence ports.
//!
//! Handlers never talk to the database directly; they go through these traits, which
//! are implemented by [`PgStore`] for PostgreSQL and by [`MemoryStore`] for tests and
//! database-less local runs. Every method is a single read or write, and ownership is
//! part of the predicate for owner-scoped mutations (`*_owned`): a row owned by someone
//! else behaves exactly like a missing row.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::fmt;
use uuid::Uuid;

use crate::models::{
    Blog, BlogChanges, BlogPost, Comment, CommentView, NewUser, Task, TaskUpdate, User,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    Conflict(String),
    /// The backend failed; the message is for logs only.
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            StoreError::Backend(msg) => write!(f, "Backend failure: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> StoreError {
        match &error {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict(db.message().to_string())
            }
            _ => StoreError::Backend(error.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user. Fails with `StoreError::Conflict` if the email is taken.
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn insert_task(&self, task: &Task) -> StoreResult<Task>;
    /// Tasks owned by `user_id`, newest first.
    async fn list_tasks_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Task>>;
    async fn update_task_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        update: &TaskUpdate,
    ) -> StoreResult<Option<Task>>;
    /// Returns `false` when no task matched both `id` and `owner`.
    async fn delete_task_owned(&self, id: Uuid, owner: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait BlogRepository: Send + Sync {
    async fn insert_blog(&self, blog: &Blog) -> StoreResult<Blog>;
    /// Every post with its author and counts, newest first.
    async fn list_blog_posts(&self) -> StoreResult<Vec<BlogPost>>;
    /// One post with its author (including email) and counts.
    async fn find_blog_post(&self, id: Uuid) -> StoreResult<Option<BlogPost>>;
    async fn blog_exists(&self, id: Uuid) -> StoreResult<bool>;
    async fn update_blog_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: &BlogChanges,
    ) -> StoreResult<Option<Blog>>;
    /// Deleting a post also removes its comments, likes and shares.
    async fn delete_blog_owned(&self, id: Uuid, owner: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert_comment(&self, comment: &Comment) -> StoreResult<Comment>;
    /// Comments on `blog_id`, oldest first.
    async fn list_comments_for_blog(&self, blog_id: Uuid) -> StoreResult<Vec<CommentView>>;
    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>>;
    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait EngagementRepository: Send + Sync {
    /// Records a like. Returns `false` if `user_id` already liked `blog_id`.
    async fn insert_like(&self, user_id: Uuid, blog_id: Uuid) -> StoreResult<bool>;
    /// Removes a like. Returns `false` if there was none.
    async fn delete_like(&self, user_id: Uuid, blog_id: Uuid) -> StoreResult<bool>;
    async fn insert_share(&self, user_id: Uuid, blog_id: Uuid) -> StoreResult<()>;
}

/// Everything the HTTP layer needs from persistence.
pub trait Store:
    UserRepository + TaskRepository + BlogRepository + CommentRepository + EngagementRepository
{
}

impl<T> Store for T where
    T: UserRepository + TaskRepository + BlogRepository + CommentRepository + EngagementRepository
{
}
