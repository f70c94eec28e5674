use sqlx::{PgPool, Result};
use uuid::Uuid;

use super::dto::{CreateTodo, PatchTodo, UpdateTodo};
use super::model::Todo;

// Every query binds the caller's user_id, so rows owned by other
// users are invisible to all of these.

pub async fn create_todo(pool: &PgPool, user_id: Uuid, fields: CreateTodo) -> Result<Todo> {
    let rec = sqlx::query_as::<_, Todo>(
        r#"
        INSERT INTO todos (user_id, task_id, title, description, completed, due_date, tags)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, user_id, task_id, title, description, completed, due_date, tags, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(fields.task)
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(fields.completed)
    .bind(fields.due_date)
    .bind(&fields.tags)
    .fetch_one(pool)
    .await?;

    Ok(rec)
}

pub async fn list_todos(pool: &PgPool, user_id: Uuid) -> Result<Vec<Todo>> {
    let rec = sqlx::query_as::<_, Todo>(
        r#"
        SELECT id, user_id, task_id, title, description, completed, due_date, tags, created_at, updated_at
        FROM todos
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rec)
}

/// Todos attached to any task, for embedding into task list responses.
pub async fn list_linked(pool: &PgPool, user_id: Uuid) -> Result<Vec<Todo>> {
    let rec = sqlx::query_as::<_, Todo>(
        r#"
        SELECT id, user_id, task_id, title, description, completed, due_date, tags, created_at, updated_at
        FROM todos
        WHERE user_id = $1 AND task_id IS NOT NULL
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rec)
}

pub async fn list_for_task(pool: &PgPool, user_id: Uuid, task_id: Uuid) -> Result<Vec<Todo>> {
    let rec = sqlx::query_as::<_, Todo>(
        r#"
        SELECT id, user_id, task_id, title, description, completed, due_date, tags, created_at, updated_at
        FROM todos
        WHERE user_id = $1 AND task_id = $2
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .bind(task_id)
    .fetch_all(pool)
    .await?;

    Ok(rec)
}

pub async fn get_todo(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Option<Todo>> {
    let rec = sqlx::query_as::<_, Todo>(
        r#"
        SELECT id, user_id, task_id, title, description, completed, due_date, tags, created_at, updated_at
        FROM todos
        WHERE id = $2 AND user_id = $1
        "#,
    )
    .bind(user_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(rec)
}

pub async fn update_todo(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
    fields: UpdateTodo,
) -> Result<Option<Todo>> {
    let rec = sqlx::query_as::<_, Todo>(
        r#"
        UPDATE todos
        SET
            task_id = $3,
            title = $4,
            description = $5,
            completed = $6,
            due_date = $7,
            tags = $8,
            updated_at = NOW()
        WHERE id = $2 AND user_id = $1
        RETURNING id, user_id, task_id, title, description, completed, due_date, tags, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(id)
    .bind(fields.task)
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(fields.completed)
    .bind(fields.due_date)
    .bind(&fields.tags)
    .fetch_optional(pool)
    .await?;

    Ok(rec)
}

pub async fn patch_todo(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
    fields: PatchTodo,
) -> Result<Option<Todo>> {
    // nullable fields carry a "was it in the payload" flag so an explicit
    // null clears the column while an absent field keeps it
    let rec = sqlx::query_as::<_, Todo>(
        r#"
        UPDATE todos
        SET
            task_id = CASE WHEN $3 THEN $4 ELSE task_id END,
            title = COALESCE($5, title),
            description = CASE WHEN $6 THEN $7 ELSE description END,
            completed = COALESCE($8, completed),
            due_date = CASE WHEN $9 THEN $10 ELSE due_date END,
            tags = COALESCE($11, tags),
            updated_at = NOW()
        WHERE id = $2 AND user_id = $1
        RETURNING id, user_id, task_id, title, description, completed, due_date, tags, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(id)
    .bind(fields.task.is_some())
    .bind(fields.task.flatten())
    .bind(&fields.title)
    .bind(fields.description.is_some())
    .bind(fields.description.flatten())
    .bind(fields.completed)
    .bind(fields.due_date.is_some())
    .bind(fields.due_date.flatten())
    .bind(&fields.tags)
    .fetch_optional(pool)
    .await?;

    Ok(rec)
}

pub async fn toggle_complete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Option<Todo>> {
    let rec = sqlx::query_as::<_, Todo>(
        r#"
        UPDATE todos
        SET completed = NOT completed, updated_at = NOW()
        WHERE id = $2 AND user_id = $1
        RETURNING id, user_id, task_id, title, description, completed, due_date, tags, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(rec)
}

pub async fn delete_todo(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM todos
        WHERE id = $2 AND user_id = $1
        "#,
    )
    .bind(user_id)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
