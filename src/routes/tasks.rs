use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{Task, TaskInput, TaskUpdate},
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

/// Retrieves the tasks of the authenticated user, newest first.
///
/// ## Responses:
/// - `200 OK`: `{"tasks": [...]}`.
/// - `401 Unauthorized` / `403 Forbidden`: missing or invalid token.
/// - `500 Internal Server Error`: for database errors.
#[get("")]
pub async fn list_tasks(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = state.store.list_tasks_for_user(user.id).await?;
    Ok(HttpResponse::Ok().json(json!({ "tasks": tasks })))
}

/// Creates a new task owned by the authenticated user.
///
/// ## Request Body:
/// - `title`: 1 to 200 characters (required).
/// - `description` (optional): up to 1000 characters.
///
/// ## Responses:
/// - `201 Created`: `{"message": "Task created", "task": {...}}`.
/// - `422 Unprocessable Entity`: if input validation fails.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = Task::new(task_data.into_inner(), user.id);
    let task = state.store.insert_task(&task).await?;

    Ok(HttpResponse::Created().json(json!({ "message": "Task created", "task": task })))
}

/// Updates a task the authenticated user owns.
///
/// `title`, `description` and `completed` are each optional; omitted fields keep
/// their current value.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Task updated", "task": {...}}`.
/// - `404 Not Found`: the task does not exist or belongs to someone else.
/// - `422 Unprocessable Entity`: if input validation fails.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = state
        .store
        .update_task_owned(task_id.into_inner(), user.id, &task_data)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Task updated", "task": task })))
}

/// Deletes a task the authenticated user owns.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Task deleted"}`.
/// - `404 Not Found`: the task does not exist or belongs to someone else.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let deleted = state
        .store
        .delete_task_owned(task_id.into_inner(), user.id)
        .await?;

    if !deleted {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted" })))
}
