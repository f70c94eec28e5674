use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::collections::HashMap;
use uuid::Uuid;

use super::dto::{CreateTask, ListParams, PatchTask, TaskResponse, UpdateTask};
use super::{queries, validate_title};
use crate::routes::middleware_auth::AuthUser;
use crate::routes::todos::dto::TodoResponse;
use crate::routes::todos::queries as todo_queries;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateTask>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    validate_title(&payload.title).map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let task = queries::create_task(
        &state.db,
        user_id,
        &payload.title,
        payload.description.as_deref(),
    )
    .await
    .map_err(|e| {
        eprintln!("Failed to create task: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to create task".to_string(),
        )
    })?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from_task(task, 0))))
}

pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let tasks = queries::list_tasks(&state.db, user_id).await.map_err(|e| {
        eprintln!("Failed to fetch tasks: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to fetch tasks".to_string(),
        )
    })?;

    // one query for all linked todos instead of one per task
    let mut todos_by_task: HashMap<Uuid, Vec<TodoResponse>> = HashMap::new();
    if params.include_todos() {
        let linked = todo_queries::list_linked(&state.db, user_id)
            .await
            .map_err(|e| {
                eprintln!("Failed to fetch todos: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch todos".to_string(),
                )
            })?;

        for todo in linked {
            if let Some(task_id) = todo.task_id {
                todos_by_task
                    .entry(task_id)
                    .or_default()
                    .push(TodoResponse::from(todo));
            }
        }
    }

    let response: Vec<TaskResponse> = tasks
        .into_iter()
        .map(|t| {
            let todos = todos_by_task.remove(&t.id).unwrap_or_default();
            TaskResponse::from_with_count(t, todos)
        })
        .collect();

    Ok(Json(response))
}

pub async fn get(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let task = queries::get_task(&state.db, user_id, id).await.map_err(|e| {
        eprintln!("Failed to fetch task: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to fetch task".to_string(),
        )
    })?;

    let task = match task {
        Some(t) => t,
        None => return Err((StatusCode::NOT_FOUND, "Task not found".to_string())),
    };

    let todos = if params.include_todos() {
        todo_queries::list_for_task(&state.db, user_id, id)
            .await
            .map_err(|e| {
                eprintln!("Failed to fetch todos: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch todos".to_string(),
                )
            })?
            .into_iter()
            .map(TodoResponse::from)
            .collect()
    } else {
        Vec::new()
    };

    Ok(Json(TaskResponse::from_with_count(task, todos)))
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTask>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    validate_title(&payload.title).map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let task = queries::update_task(
        &state.db,
        user_id,
        id,
        &payload.title,
        payload.description.as_deref(),
    )
    .await
    .map_err(|e| {
        eprintln!("Failed to update task: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to update task".to_string(),
        )
    })?;

    let task = match task {
        Some(t) => t,
        None => return Err((StatusCode::NOT_FOUND, "Task not found".to_string())),
    };

    let count = queries::todo_count(&state.db, user_id, id).await.map_err(|e| {
        eprintln!("Failed to count todos: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
    })?;

    Ok(Json(TaskResponse::from_task(task, count)))
}

pub async fn partial_update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PatchTask>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if let Some(ref title) = payload.title {
        validate_title(title).map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    }

    let task = queries::patch_task(&state.db, user_id, id, payload.title, payload.description)
        .await
        .map_err(|e| {
            eprintln!("Failed to update task: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update task".to_string(),
            )
        })?;

    let task = match task {
        Some(t) => t,
        None => return Err((StatusCode::NOT_FOUND, "Task not found".to_string())),
    };

    let count = queries::todo_count(&state.db, user_id, id).await.map_err(|e| {
        eprintln!("Failed to count todos: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
    })?;

    Ok(Json(TaskResponse::from_task(task, count)))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let deleted = queries::delete_task(&state.db, user_id, id).await.map_err(|e| {
        eprintln!("Failed to delete task: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to delete task".to_string(),
        )
    })?;

    if !deleted {
        return Err((StatusCode::NOT_FOUND, "Task not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/tasks/{id}/todos
pub async fn todos(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let owned = queries::task_owned_by(&state.db, user_id, id).await.map_err(|e| {
        eprintln!("Failed to check task: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
    })?;

    if !owned {
        return Err((StatusCode::NOT_FOUND, "Task not found".to_string()));
    }

    let todos = todo_queries::list_for_task(&state.db, user_id, id)
        .await
        .map_err(|e| {
            eprintln!("Failed to fetch todos: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch todos".to_string(),
            )
        })?;

    let response: Vec<TodoResponse> = todos.into_iter().map(TodoResponse::from).collect();

    Ok(Json(response))
}
