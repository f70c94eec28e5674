use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use super::dto::{CreateTodo, PatchTodo, TodoResponse, UpdateTodo};
use super::{is_foreign_key_violation, queries, validate_tags, validate_title};
use crate::routes::middleware_auth::AuthUser;
use crate::routes::tasks::queries::task_owned_by;
use crate::state::AppState;

/// Reject a task link unless the task exists and the caller owns it.
/// A 404 keeps foreign task ids indistinguishable from absent ones.
async fn check_task_link(
    state: &AppState,
    user_id: Uuid,
    task_id: Uuid,
) -> Result<(), (StatusCode, String)> {
    let owned = task_owned_by(&state.db, user_id, task_id)
        .await
        .map_err(|e| {
            eprintln!("Failed to check task: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
        })?;

    if !owned {
        return Err((StatusCode::NOT_FOUND, "Task not found".to_string()));
    }

    Ok(())
}

/// The task can still vanish between `check_task_link` and the write; the
/// foreign key then rejects the row and it reads the same as an unknown task.
fn task_link_race(e: &sqlx::Error) -> Option<(StatusCode, String)> {
    let code = e.as_database_error().and_then(|db| db.code());
    if is_foreign_key_violation(code.as_deref()) {
        return Some((StatusCode::NOT_FOUND, "Task not found".to_string()));
    }
    None
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateTodo>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    validate_title(&payload.title).map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    validate_tags(&payload.tags).map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    // nothing is persisted until the task link is known to be the caller's
    if let Some(task_id) = payload.task {
        check_task_link(&state, user_id, task_id).await?;
    }

    let todo = queries::create_todo(&state.db, user_id, payload)
        .await
        .map_err(|e| {
            if let Some(not_found) = task_link_race(&e) {
                return not_found;
            }
            eprintln!("Failed to create todo: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create todo".to_string(),
            )
        })?;

    Ok((StatusCode::CREATED, Json(TodoResponse::from(todo))))
}

pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let todos = queries::list_todos(&state.db, user_id).await.map_err(|e| {
        eprintln!("Failed to fetch todos: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to fetch todos".to_string(),
        )
    })?;

    let response: Vec<TodoResponse> = todos.into_iter().map(TodoResponse::from).collect();

    Ok(Json(response))
}

pub async fn get(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let todo = queries::get_todo(&state.db, user_id, id).await.map_err(|e| {
        eprintln!("Failed to fetch todo: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to fetch todo".to_string(),
        )
    })?;

    match todo {
        Some(t) => Ok(Json(TodoResponse::from(t))),
        None => Err((StatusCode::NOT_FOUND, "Todo not found".to_string())),
    }
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTodo>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    validate_title(&payload.title).map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    validate_tags(&payload.tags).map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    if let Some(task_id) = payload.task {
        check_task_link(&state, user_id, task_id).await?;
    }

    let todo = queries::update_todo(&state.db, user_id, id, payload)
        .await
        .map_err(|e| {
            if let Some(not_found) = task_link_race(&e) {
                return not_found;
            }
            eprintln!("Failed to update todo: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update todo".to_string(),
            )
        })?;

    match todo {
        Some(t) => Ok(Json(TodoResponse::from(t))),
        None => Err((StatusCode::NOT_FOUND, "Todo not found".to_string())),
    }
}

pub async fn partial_update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PatchTodo>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if let Some(ref title) = payload.title {
        validate_title(title).map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    }
    if let Some(ref tags) = payload.tags {
        validate_tags(tags).map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    }

    // Some(None) is an unlink, which needs no ownership check
    if let Some(Some(task_id)) = payload.task {
        check_task_link(&state, user_id, task_id).await?;
    }

    let todo = queries::patch_todo(&state.db, user_id, id, payload)
        .await
        .map_err(|e| {
            if let Some(not_found) = task_link_race(&e) {
                return not_found;
            }
            eprintln!("Failed to update todo: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update todo".to_string(),
            )
        })?;

    match todo {
        Some(t) => Ok(Json(TodoResponse::from(t))),
        None => Err((StatusCode::NOT_FOUND, "Todo not found".to_string())),
    }
}

pub async fn toggle_complete(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let todo = queries::toggle_complete(&state.db, user_id, id)
        .await
        .map_err(|e| {
            eprintln!("Failed to toggle todo: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to toggle todo".to_string(),
            )
        })?;

    match todo {
        Some(t) => Ok(Json(TodoResponse::from(t))),
        None => Err((StatusCode::NOT_FOUND, "Todo not found".to_string())),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let deleted = queries::delete_todo(&state.db, user_id, id)
        .await
        .map_err(|e| {
            eprintln!("Failed to delete todo: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to delete todo".to_string(),
            )
        })?;

    if !deleted {
        return Err((StatusCode::NOT_FOUND, "Todo not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
