pub mod dto;
pub mod model;
pub mod queries;
pub mod routes;

// HELPER FUNCTIONS

/// Validate a todo title
pub fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("title cannot be empty".to_string());
    }

    if title.chars().count() > 200 {
        return Err("title is too long (Max: 200 characters)".to_string());
    }

    Ok(())
}

/// Validate the tag list: tags are free-form but blank entries are rejected
pub fn validate_tags(tags: &[String]) -> Result<(), String> {
    for tag in tags {
        if tag.trim().is_empty() {
            return Err("tags cannot contain blank entries".to_string());
        }
    }

    Ok(())
}

/// Postgres foreign key violation. A todo write hits this when its task is
/// deleted between the ownership check and the insert/update.
pub fn is_foreign_key_violation(code: Option<&str>) -> bool {
    code == Some("23503")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_title() {
        assert!(validate_title("Buy milk").is_ok());
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"x".repeat(200)).is_ok());
        assert!(validate_title(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_tags() {
        assert!(validate_tags(&[]).is_ok());
        assert!(validate_tags(&["home".to_string(), "urgent".to_string()]).is_ok());
        assert!(validate_tags(&["home".to_string(), "".to_string()]).is_err());
        assert!(validate_tags(&["  ".to_string()]).is_err());
    }

    #[test]
    fn test_is_foreign_key_violation() {
        assert!(is_foreign_key_violation(Some("23503")));
        assert!(!is_foreign_key_violation(Some("23505")));
        assert!(!is_foreign_key_violation(None));
    }
}
