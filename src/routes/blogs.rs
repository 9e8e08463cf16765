use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    media::BlogForm,
    models::{Blog, BlogChanges, BlogDraft, BlogPost},
    state::AppState,
};
use actix_multipart::Multipart;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

/// Re-reads a post as the public view, so writes answer with the same shape as reads.
async fn post_view(state: &AppState, blog_id: Uuid) -> Result<BlogPost, AppError> {
    state
        .store
        .find_blog_post(blog_id)
        .await?
        // deleted between the write and the read
        .ok_or_else(|| AppError::NotFound("Blog post not found".into()))
}

/// Lists every post with its author and engagement counts, newest first. Public.
#[get("")]
pub async fn list_blogs(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let blogs = state.store.list_blog_posts().await?;
    Ok(HttpResponse::Ok().json(json!({ "blogs": blogs })))
}

/// Creates a post from a multipart form with `title`, `content` and an optional
/// `image` file.
///
/// ## Responses:
/// - `201 Created`: `{"message": "Blog created successfully", "blog": {...}}`.
/// - `413 Payload Too Large`: the image exceeds the configured bound.
/// - `422 Unprocessable Entity`: missing title/content or a non-image upload.
#[post("")]
pub async fn create_blog(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    payload: Multipart,
) -> Result<impl Responder, AppError> {
    let form = BlogForm::read(payload, state.max_image_bytes).await?;

    let draft = BlogDraft {
        title: form
            .title
            .ok_or_else(|| AppError::ValidationError("title is required".into()))?,
        content: form
            .content
            .ok_or_else(|| AppError::ValidationError("content is required".into()))?,
        image: form.image.map(|image| image.to_data_url()),
    };
    draft.validate()?;

    let blog = state.store.insert_blog(&Blog::new(draft, user.id)).await?;
    let blog = post_view(&state, blog.id).await?;

    Ok(HttpResponse::Created().json(json!({ "message": "Blog created successfully", "blog": blog })))
}

/// Fetches one post with its author (including email) and counts. Public.
#[get("/{id}")]
pub async fn get_blog_post(
    state: web::Data<AppState>,
    blog_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let blog_post = state
        .store
        .find_blog_post(blog_id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Blog post not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({ "blog_post": blog_post })))
}

/// Updates a post the authenticated user owns.
///
/// Multipart form; `title`, `content` and `image` are each optional. A `video` part is
/// accepted and discarded.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Blog post updated", "blog_post": {...}}`.
/// - `404 Not Found`: the post does not exist or belongs to someone else.
#[put("/{id}")]
pub async fn update_blog_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    blog_id: web::Path<Uuid>,
    payload: Multipart,
) -> Result<impl Responder, AppError> {
    let form = BlogForm::read(payload, state.max_image_bytes).await?;

    let changes = BlogChanges {
        title: form.title,
        content: form.content,
        image: form.image.map(|image| image.to_data_url()),
    };
    changes.validate()?;

    let blog = state
        .store
        .update_blog_owned(blog_id.into_inner(), user.id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound("Blog post not found or not authorized".into()))?;
    let blog_post = post_view(&state, blog.id).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Blog post updated", "blog_post": blog_post })))
}

/// Deletes a post the authenticated user owns, along with its comments, likes and
/// shares.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Blog post deleted"}`.
/// - `404 Not Found`: the post does not exist or belongs to someone else.
#[delete("/{id}")]
pub async fn delete_blog_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    blog_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let deleted = state
        .store
        .delete_blog_owned(blog_id.into_inner(), user.id)
        .await?;

    if !deleted {
        return Err(AppError::NotFound(
            "Blog post not found or not authorized".into(),
        ));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Blog post deleted" })))
}
