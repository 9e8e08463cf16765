use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Reverse;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{
    BlogRepository, CommentRepository, EngagementRepository, StoreError, StoreResult,
    TaskRepository, UserRepository,
};
use crate::models::{
    Author, Blog, BlogChanges, BlogPost, Comment, CommentView, Like, NewUser, Share, Task,
    TaskUpdate, User,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    tasks: Vec<Task>,
    blogs: Vec<Blog>,
    comments: Vec<Comment>,
    likes: Vec<Like>,
    shares: Vec<Share>,
}

impl Tables {
    fn user(&self, id: Uuid) -> StoreResult<&User> {
        self.users
            .iter()
            .find(|user| user.id == id)
            .ok_or_else(|| StoreError::Backend(format!("dangling user reference {}", id)))
    }

    fn blog_post(&self, blog: &Blog, with_email: bool) -> StoreResult<BlogPost> {
        let author = self.user(blog.user_id)?;
        Ok(BlogPost {
            id: blog.id,
            title: blog.title.clone(),
            content: blog.content.clone(),
            image: blog.image.clone(),
            likes_count: self.likes.iter().filter(|l| l.blog_id == blog.id).count() as i64,
            shares_count: self.shares.iter().filter(|s| s.blog_id == blog.id).count() as i64,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
            author: Author::from_user(author, with_email),
        })
    }
}

/// In-process store with the same semantics as [`super::PgStore`].
///
/// All tables sit behind one lock, so every operation is atomic. Used by the test
/// suite and when `DATABASE_URL=memory`.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.tables.lock().await.users.len()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.lock().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("Email already registered".into()));
        }
        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            image: user.image,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn insert_task(&self, task: &Task) -> StoreResult<Task> {
        let mut tables = self.tables.lock().await;
        tables.user(task.user_id)?;
        tables.tasks.push(task.clone());
        Ok(task.clone())
    }

    async fn list_tasks_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Task>> {
        let tables = self.tables.lock().await;
        // reversed before the stable sort so ties keep newest-inserted first
        let mut tasks: Vec<Task> = tables
            .tasks
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| Reverse(t.created_at));
        Ok(tasks)
    }

    async fn update_task_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        update: &TaskUpdate,
    ) -> StoreResult<Option<Task>> {
        let mut tables = self.tables.lock().await;
        let task = tables
            .tasks
            .iter_mut()
            .find(|t| t.id == id && t.user_id == owner);
        Ok(task.map(|task| {
            task.apply(update);
            task.clone()
        }))
    }

    async fn delete_task_owned(&self, id: Uuid, owner: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.tasks.len();
        tables.tasks.retain(|t| !(t.id == id && t.user_id == owner));
        Ok(tables.tasks.len() < before)
    }
}

#[async_trait]
impl BlogRepository for MemoryStore {
    async fn insert_blog(&self, blog: &Blog) -> StoreResult<Blog> {
        let mut tables = self.tables.lock().await;
        tables.user(blog.user_id)?;
        tables.blogs.push(blog.clone());
        Ok(blog.clone())
    }

    async fn list_blog_posts(&self) -> StoreResult<Vec<BlogPost>> {
        let tables = self.tables.lock().await;
        let mut blogs: Vec<&Blog> = tables.blogs.iter().rev().collect();
        blogs.sort_by_key(|b| Reverse(b.created_at));
        blogs
            .into_iter()
            .map(|blog| tables.blog_post(blog, false))
            .collect()
    }

    async fn find_blog_post(&self, id: Uuid) -> StoreResult<Option<BlogPost>> {
        let tables = self.tables.lock().await;
        tables
            .blogs
            .iter()
            .find(|b| b.id == id)
            .map(|blog| tables.blog_post(blog, true))
            .transpose()
    }

    async fn blog_exists(&self, id: Uuid) -> StoreResult<bool> {
        let tables = self.tables.lock().await;
        Ok(tables.blogs.iter().any(|b| b.id == id))
    }

    async fn update_blog_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: &BlogChanges,
    ) -> StoreResult<Option<Blog>> {
        let mut tables = self.tables.lock().await;
        let blog = tables
            .blogs
            .iter_mut()
            .find(|b| b.id == id && b.user_id == owner);
        Ok(blog.map(|blog| {
            blog.apply(changes);
            blog.clone()
        }))
    }

    async fn delete_blog_owned(&self, id: Uuid, owner: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.blogs.len();
        tables.blogs.retain(|b| !(b.id == id && b.user_id == owner));
        if tables.blogs.len() == before {
            return Ok(false);
        }
        tables.comments.retain(|c| c.blog_id != id);
        tables.likes.retain(|l| l.blog_id != id);
        tables.shares.retain(|s| s.blog_id != id);
        Ok(true)
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn insert_comment(&self, comment: &Comment) -> StoreResult<Comment> {
        let mut tables = self.tables.lock().await;
        tables.user(comment.user_id)?;
        if !tables.blogs.iter().any(|b| b.id == comment.blog_id) {
            return Err(StoreError::Backend(format!(
                "dangling blog reference {}",
                comment.blog_id
            )));
        }
        tables.comments.push(comment.clone());
        Ok(comment.clone())
    }

    async fn list_comments_for_blog(&self, blog_id: Uuid) -> StoreResult<Vec<CommentView>> {
        let tables = self.tables.lock().await;
        let mut comments: Vec<&Comment> = tables
            .comments
            .iter()
            .filter(|c| c.blog_id == blog_id)
            .collect();
        comments.sort_by_key(|c| c.created_at);
        comments
            .into_iter()
            .map(|comment| {
                let author = tables.user(comment.user_id)?;
                Ok(CommentView {
                    id: comment.id,
                    blog_id: comment.blog_id,
                    content: comment.content.clone(),
                    created_at: comment.created_at,
                    author: Author::from_user(author, false),
                })
            })
            .collect()
    }

    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        let tables = self.tables.lock().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != id);
        Ok(tables.comments.len() < before)
    }
}

#[async_trait]
impl EngagementRepository for MemoryStore {
    async fn insert_like(&self, user_id: Uuid, blog_id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        if tables
            .likes
            .iter()
            .any(|l| l.user_id == user_id && l.blog_id == blog_id)
        {
            return Ok(false);
        }
        tables.likes.push(Like::new(user_id, blog_id));
        Ok(true)
    }

    async fn delete_like(&self, user_id: Uuid, blog_id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.likes.len();
        tables
            .likes
            .retain(|l| !(l.user_id == user_id && l.blog_id == blog_id));
        Ok(tables.likes.len() < before)
    }

    async fn insert_share(&self, user_id: Uuid, blog_id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.lock().await;
        tables.shares.push(Share::new(user_id, blog_id));
        Ok(())
    }
}
