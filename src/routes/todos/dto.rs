use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::Todo;

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub task: Option<Uuid>,
}

/// Full replacement (PUT): omitted optional fields reset to their defaults.
#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub task: Option<Uuid>,
}

/// Partial update (PATCH): absent fields keep their stored value, while an
/// explicit `null` clears the nullable ones (unlinking a todo from its task
/// is `{"task": null}`).
#[derive(Deserialize)]
pub struct PatchTodo {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub task: Option<Option<Uuid>>,
}

/// Distinguishes a field set to `null` (`Some(None)`) from one left out
/// of the payload entirely (`None`).
pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// Wire shape for a todo. The owner is never echoed back and the
/// task link is exposed as `task`, matching the frontend contract.
#[derive(Serialize)]
pub struct TodoResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub task: Option<Uuid>,
}

impl From<Todo> for TodoResponse {
    fn from(t: Todo) -> Self {
        TodoResponse {
            id: t.id,
            title: t.title,
            description: t.description,
            completed: t.completed,
            due_date: t.due_date,
            tags: t.tags,
            created_at: t.created_at,
            updated_at: t.updated_at,
            task: t.task_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_response_hides_owner_and_renames_task_link() {
        let now = Utc::now();
        let task_id = Uuid::new_v4();
        let todo = Todo {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            task_id: Some(task_id),
            title: "Write report".to_string(),
            description: None,
            completed: false,
            due_date: None,
            tags: vec!["work".to_string()],
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(TodoResponse::from(todo)).unwrap();
        assert_eq!(json["task"], serde_json::json!(task_id));
        assert!(json.get("user_id").is_none());
        assert!(json.get("task_id").is_none());
    }

    #[test]
    fn test_create_defaults() {
        let body: CreateTodo = serde_json::from_str(r#"{"title": "Buy milk"}"#).unwrap();
        assert!(!body.completed);
        assert!(body.tags.is_empty());
        assert!(body.task.is_none());
        assert!(body.due_date.is_none());
    }

    #[test]
    fn test_update_resets_omitted_fields() {
        // full replacement: anything left out of a PUT body goes back to its default
        let body: UpdateTodo = serde_json::from_str(r#"{"title": "Buy milk"}"#).unwrap();
        assert!(!body.completed);
        assert!(body.tags.is_empty());
        assert!(body.task.is_none());
        assert!(body.description.is_none());
        assert!(body.due_date.is_none());
    }

    #[test]
    fn test_patch_null_clears_absent_keeps() {
        let body: PatchTodo =
            serde_json::from_str(r#"{"task": null, "description": null}"#).unwrap();
        assert_eq!(body.task, Some(None));
        assert_eq!(body.description, Some(None));
        assert!(body.due_date.is_none());
        assert!(body.title.is_none());

        let body: PatchTodo = serde_json::from_str("{}").unwrap();
        assert!(body.task.is_none());
        assert!(body.description.is_none());
        assert!(body.due_date.is_none());

        let id = Uuid::new_v4();
        let body: PatchTodo =
            serde_json::from_str(&format!(r#"{{"task": "{}"}}"#, id)).unwrap();
        assert_eq!(body.task, Some(Some(id)));
    }
}
