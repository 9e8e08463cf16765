use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use std::time::Duration;
use uuid::Uuid;

use super::{
    BlogRepository, CommentRepository, EngagementRepository, StoreError, StoreResult,
    TaskRepository, UserRepository,
};
use crate::models::{
    Author, Blog, BlogChanges, BlogPost, Comment, CommentView, NewUser, Task, TaskUpdate, User,
};

const TASK_COLUMNS: &str = "id, user_id, title, description, completed, created_at, updated_at";
const BLOG_COLUMNS: &str = "id, user_id, title, content, image, created_at, updated_at";

// Counts are derived from the engagement tables so they cannot drift from them.
const BLOG_POST_SELECT: &str = "SELECT b.id, b.title, b.content, b.image, b.created_at, b.updated_at, \
     u.id AS author_id, u.name AS author_name, u.email AS author_email, u.image AS author_image, \
     (SELECT COUNT(*) FROM likes l WHERE l.blog_id = b.id) AS likes_count, \
     (SELECT COUNT(*) FROM shares s WHERE s.blog_id = b.id) AS shares_count \
     FROM blogs b JOIN users u ON u.id = b.user_id";

/// PostgreSQL-backed implementation of every repository port.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool and applies the migrations under `migrations/`.
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Backend(format!("Migration failed: {}", e)))?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(FromRow)]
struct BlogPostRow {
    id: Uuid,
    title: String,
    content: String,
    image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_id: Uuid,
    author_name: String,
    author_email: String,
    author_image: Option<String>,
    likes_count: i64,
    shares_count: i64,
}

impl BlogPostRow {
    fn into_post(self, with_email: bool) -> BlogPost {
        BlogPost {
            id: self.id,
            title: self.title,
            content: self.content,
            image: self.image,
            likes_count: self.likes_count,
            shares_count: self.shares_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
            author: Author {
                id: self.author_id,
                name: self.author_name,
                email: with_email.then_some(self.author_email),
                image: self.author_image,
            },
        }
    }
}

#[derive(FromRow)]
struct CommentViewRow {
    id: Uuid,
    blog_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
    author_id: Uuid,
    author_name: String,
    author_image: Option<String>,
}

impl From<CommentViewRow> for CommentView {
    fn from(row: CommentViewRow) -> Self {
        CommentView {
            id: row.id,
            blog_id: row.blog_id,
            content: row.content,
            created_at: row.created_at,
            author: Author {
                id: row.author_id,
                name: row.author_name,
                email: None,
                image: row.author_image,
            },
        }
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let inserted = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password_hash, image)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (email) DO NOTHING
             RETURNING id, name, email, password_hash, image, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.image)
        .fetch_optional(&self.pool)
        .await?;

        inserted.ok_or_else(|| StoreError::Conflict("Email already registered".into()))
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, image, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl TaskRepository for PgStore {
    async fn insert_task(&self, task: &Task) -> StoreResult<Task> {
        let sql = format!(
            "INSERT INTO tasks (id, user_id, title, description, completed, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            TASK_COLUMNS
        );
        let inserted = sqlx::query_as::<_, Task>(&sql)
            .bind(task.id)
            .bind(task.user_id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.completed)
            .bind(task.created_at)
            .bind(task.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(inserted)
    }

    async fn list_tasks_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Task>> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE user_id = $1 ORDER BY created_at DESC",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn update_task_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        update: &TaskUpdate,
    ) -> StoreResult<Option<Task>> {
        let sql = format!(
            "UPDATE tasks
             SET title = COALESCE($1, title),
                 description = COALESCE($2, description),
                 completed = COALESCE($3, completed),
                 updated_at = NOW()
             WHERE id = $4 AND user_id = $5
             RETURNING {}",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(&update.title)
            .bind(&update.description)
            .bind(update.completed)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn delete_task_owned(&self, id: Uuid, owner: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl BlogRepository for PgStore {
    async fn insert_blog(&self, blog: &Blog) -> StoreResult<Blog> {
        let sql = format!(
            "INSERT INTO blogs (id, user_id, title, content, image, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            BLOG_COLUMNS
        );
        let inserted = sqlx::query_as::<_, Blog>(&sql)
            .bind(blog.id)
            .bind(blog.user_id)
            .bind(&blog.title)
            .bind(&blog.content)
            .bind(&blog.image)
            .bind(blog.created_at)
            .bind(blog.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(inserted)
    }

    async fn list_blog_posts(&self) -> StoreResult<Vec<BlogPost>> {
        let sql = format!("{} ORDER BY b.created_at DESC", BLOG_POST_SELECT);
        let rows = sqlx::query_as::<_, BlogPostRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|row| row.into_post(false)).collect())
    }

    async fn find_blog_post(&self, id: Uuid) -> StoreResult<Option<BlogPost>> {
        let sql = format!("{} WHERE b.id = $1", BLOG_POST_SELECT);
        let row = sqlx::query_as::<_, BlogPostRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|row| row.into_post(true)))
    }

    async fn blog_exists(&self, id: Uuid) -> StoreResult<bool> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM blogs WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists.0)
    }

    async fn update_blog_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: &BlogChanges,
    ) -> StoreResult<Option<Blog>> {
        let sql = format!(
            "UPDATE blogs
             SET title = COALESCE($1, title),
                 content = COALESCE($2, content),
                 image = COALESCE($3, image),
                 updated_at = NOW()
             WHERE id = $4 AND user_id = $5
             RETURNING {}",
            BLOG_COLUMNS
        );
        let blog = sqlx::query_as::<_, Blog>(&sql)
            .bind(&changes.title)
            .bind(&changes.content)
            .bind(&changes.image)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(blog)
    }

    async fn delete_blog_owned(&self, id: Uuid, owner: Uuid) -> StoreResult<bool> {
        // comments, likes and shares go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CommentRepository for PgStore {
    async fn insert_comment(&self, comment: &Comment) -> StoreResult<Comment> {
        let inserted = sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (id, user_id, blog_id, content, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, user_id, blog_id, content, created_at",
        )
        .bind(comment.id)
        .bind(comment.user_id)
        .bind(comment.blog_id)
        .bind(&comment.content)
        .bind(comment.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(inserted)
    }

    async fn list_comments_for_blog(&self, blog_id: Uuid) -> StoreResult<Vec<CommentView>> {
        let rows = sqlx::query_as::<_, CommentViewRow>(
            "SELECT c.id, c.blog_id, c.content, c.created_at,
                    u.id AS author_id, u.name AS author_name, u.image AS author_image
             FROM comments c JOIN users u ON u.id = c.user_id
             WHERE c.blog_id = $1
             ORDER BY c.created_at ASC",
        )
        .bind(blog_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(CommentView::from).collect())
    }

    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            "SELECT id, user_id, blog_id, content, created_at FROM comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(comment)
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl EngagementRepository for PgStore {
    async fn insert_like(&self, user_id: Uuid, blog_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            "INSERT INTO likes (user_id, blog_id) VALUES ($1, $2)
             ON CONFLICT (user_id, blog_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(blog_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete_like(&self, user_id: Uuid, blog_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND blog_id = $2")
            .bind(user_id)
            .bind(blog_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_share(&self, user_id: Uuid, blog_id: Uuid) -> StoreResult<()> {
        sqlx::query("INSERT INTO shares (id, user_id, blog_id) VALUES ($1, $2, $3)")
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(blog_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
