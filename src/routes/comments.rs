use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{Comment, CommentInput},
    state::AppState,
};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

/// Adds a comment to a post.
///
/// ## Responses:
/// - `201 Created`: `{"message": "Comment added", "comment": {...}}`.
/// - `404 Not Found`: the post does not exist.
#[post("/{id}/comments")]
pub async fn add_comment(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    blog_id: web::Path<Uuid>,
    comment_data: web::Json<CommentInput>,
) -> Result<impl Responder, AppError> {
    comment_data.validate()?;
    let blog_id = blog_id.into_inner();

    if !state.store.blog_exists(blog_id).await? {
        return Err(AppError::NotFound("Blog post not found".into()));
    }

    let comment = Comment::new(comment_data.into_inner(), blog_id, user.id);
    let comment = state.store.insert_comment(&comment).await?;

    Ok(HttpResponse::Created().json(json!({ "message": "Comment added", "comment": comment })))
}

/// Lists the comments on a post, oldest first. Public.
#[get("/{id}/comments")]
pub async fn list_comments(
    state: web::Data<AppState>,
    blog_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let comments = state
        .store
        .list_comments_for_blog(blog_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "comments": comments })))
}

/// Deletes a comment written by the authenticated user.
///
/// Unlike tasks and posts, a comment owned by someone else is reported as 403 rather
/// than 404; comments are listed publicly, so their existence is no secret.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Comment deleted successfully"}`.
/// - `403 Forbidden`: the comment belongs to someone else; it is left in place.
/// - `404 Not Found`: the comment does not exist.
#[delete("/{id}")]
pub async fn delete_comment(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    comment_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let comment_id = comment_id.into_inner();

    let comment = state
        .store
        .find_comment(comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".into()))?;

    if comment.user_id != user.id {
        log::debug!("User {} tried to delete comment {} of user {}", user.id, comment.id, comment.user_id);
        return Err(AppError::Forbidden(
            "You are not authorized to delete this comment".into(),
        ));
    }

    state.store.delete_comment(comment_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Comment deleted successfully" })))
}
