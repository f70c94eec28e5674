use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::{Task, TaskWithCount};
use crate::routes::todos::dto::{double_option, TodoResponse};

#[derive(Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
}

/// Full replacement (PUT): an omitted description clears it.
#[derive(Deserialize)]
pub struct UpdateTask {
    pub title: String,
    pub description: Option<String>,
}

/// Partial update (PATCH): absent fields keep their stored value, an
/// explicit `null` description clears it.
#[derive(Deserialize)]
pub struct PatchTask {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub include_todos: Option<String>,
}

impl ListParams {
    /// The frontend opts into embedded todos with ?include_todos=1
    pub fn include_todos(&self) -> bool {
        self.include_todos.as_deref() == Some("1")
    }
}

#[derive(Serialize)]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub todos: Vec<TodoResponse>,
    pub todos_count: i64,
}

impl TaskResponse {
    pub fn from_task(task: Task, todos_count: i64) -> Self {
        TaskResponse {
            id: task.id,
            title: task.title,
            description: task.description,
            created_at: task.created_at,
            updated_at: task.updated_at,
            todos: Vec::new(),
            todos_count,
        }
    }

    pub fn from_with_count(task: TaskWithCount, todos: Vec<TodoResponse>) -> Self {
        TaskResponse {
            id: task.id,
            title: task.title,
            description: task.description,
            created_at: task.created_at,
            updated_at: task.updated_at,
            todos,
            todos_count: task.todos_count,
        }
    }
}
