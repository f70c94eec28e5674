use sqlx::{PgPool, Result};
use uuid::Uuid;

use super::model::{Task, TaskWithCount};

// The todos_count subquery is scoped to the task owner, so shared ids
// can never leak another user's todos into the count.
const TASK_WITH_COUNT: &str = r#"
    SELECT t.id, t.user_id, t.title, t.description, t.created_at, t.updated_at,
           (SELECT COUNT(*) FROM todos d
             WHERE d.task_id = t.id AND d.user_id = t.user_id) AS todos_count
    FROM tasks t
"#;

pub async fn create_task(
    pool: &PgPool,
    user_id: Uuid,
    title: &str,
    description: Option<&str>,
) -> Result<Task> {
    let rec = sqlx::query_as::<_, Task>(
        r#"
        INSERT INTO tasks (user_id, title, description)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, title, description, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(title)
    .bind(description)
    .fetch_one(pool)
    .await?;

    Ok(rec)
}

pub async fn list_tasks(pool: &PgPool, user_id: Uuid) -> Result<Vec<TaskWithCount>> {
    let query = format!("{} WHERE t.user_id = $1 ORDER BY t.created_at DESC", TASK_WITH_COUNT);

    let rec = sqlx::query_as::<_, TaskWithCount>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(rec)
}

pub async fn get_task(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Option<TaskWithCount>> {
    let query = format!("{} WHERE t.id = $2 AND t.user_id = $1", TASK_WITH_COUNT);

    let rec = sqlx::query_as::<_, TaskWithCount>(&query)
        .bind(user_id)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(rec)
}

pub async fn update_task(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
    title: &str,
    description: Option<&str>,
) -> Result<Option<Task>> {
    let rec = sqlx::query_as::<_, Task>(
        r#"
        UPDATE tasks
        SET title = $3, description = $4, updated_at = NOW()
        WHERE id = $2 AND user_id = $1
        RETURNING id, user_id, title, description, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(id)
    .bind(title)
    .bind(description)
    .fetch_optional(pool)
    .await?;

    Ok(rec)
}

pub async fn patch_task(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
    title: Option<String>,
    description: Option<Option<String>>,
) -> Result<Option<Task>> {
    // description rides a set-flag so PATCH {"description": null} clears it
    let rec = sqlx::query_as::<_, Task>(
        r#"
        UPDATE tasks
        SET
            title = COALESCE($3, title),
            description = CASE WHEN $4 THEN $5 ELSE description END,
            updated_at = NOW()
        WHERE id = $2 AND user_id = $1
        RETURNING id, user_id, title, description, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(id)
    .bind(title)
    .bind(description.is_some())
    .bind(description.flatten())
    .fetch_optional(pool)
    .await?;

    Ok(rec)
}

/// Todos go with the task through the ON DELETE CASCADE foreign key.
pub async fn delete_task(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM tasks
        WHERE id = $2 AND user_id = $1
        "#,
    )
    .bind(user_id)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Ownership guard used before any operation that references a task id.
pub async fn task_owned_by(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = $2 AND user_id = $1)",
    )
    .bind(user_id)
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

pub async fn todo_count(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM todos WHERE task_id = $2 AND user_id = $1",
    )
    .bind(user_id)
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
