pub mod dto;
pub mod model;
pub mod queries;
pub mod routes;

// HELPER FUNCTIONS

/// Validate a task title
pub fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("title cannot be empty".to_string());
    }

    if title.chars().count() > 200 {
        return Err("title is too long (Max: 200 characters)".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_title() {
        assert!(validate_title("Write report").is_ok());
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"a".repeat(201)).is_err());
    }

    #[test]
    fn test_include_todos_param() {
        let params = dto::ListParams {
            include_todos: Some("1".to_string()),
        };
        assert!(params.include_todos());

        let params = dto::ListParams {
            include_todos: Some("0".to_string()),
        };
        assert!(!params.include_todos());

        let params = dto::ListParams {
            include_todos: None,
        };
        assert!(!params.include_todos());
    }

    #[test]
    fn test_patch_description_null_vs_absent() {
        let body: dto::PatchTask = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(body.description, Some(None));
        assert!(body.title.is_none());

        let body: dto::PatchTask = serde_json::from_str(r#"{"title": "X"}"#).unwrap();
        assert!(body.description.is_none());
        assert_eq!(body.title.as_deref(), Some("X"));
    }
}
