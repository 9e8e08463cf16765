use crate::{auth::AuthenticatedUser, error::AppError, state::AppState};
use actix_web::{delete, post, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;

async fn ensure_blog_exists(state: &AppState, blog_id: Uuid) -> Result<(), AppError> {
    if state.store.blog_exists(blog_id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound("Blog post not found".into()))
    }
}

/// Likes a post. Each user can like a post once.
///
/// ## Responses:
/// - `201 Created`: `{"message": "Liked"}`.
/// - `400 Bad Request`: already liked.
/// - `404 Not Found`: the post does not exist.
#[post("/{id}/like")]
pub async fn like(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    blog_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let blog_id = blog_id.into_inner();
    ensure_blog_exists(&state, blog_id).await?;

    if !state.store.insert_like(user.id, blog_id).await? {
        return Err(AppError::BadRequest("Already liked".into()));
    }

    Ok(HttpResponse::Created().json(json!({ "message": "Liked" })))
}

/// Removes the caller's like from a post.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Unliked"}`.
/// - `400 Bad Request`: the caller had not liked the post.
#[delete("/{id}/like")]
pub async fn unlike(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    blog_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    if !state.store.delete_like(user.id, blog_id.into_inner()).await? {
        return Err(AppError::BadRequest("Not liked yet".into()));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Unliked" })))
}

/// Records a share. Repeated shares by the same user all count.
///
/// ## Responses:
/// - `201 Created`: `{"message": "Shared"}`.
/// - `404 Not Found`: the post does not exist.
#[post("/{id}/share")]
pub async fn share(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    blog_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let blog_id = blog_id.into_inner();
    ensure_blog_exists(&state, blog_id).await?;

    state.store.insert_share(user.id, blog_id).await?;

    Ok(HttpResponse::Created().json(json!({ "message": "Shared" })))
}
