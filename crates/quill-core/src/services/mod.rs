//! Application services - the stores the HTTP layer talks to.
//!
//! Each service owns the rules for one aggregate and reaches storage only
//! through the repository ports.

mod auth;
mod comments;
mod posts;

pub use auth::{AuthService, Credentials, NewUser};
pub use comments::{CommentService, NewComment};
pub use posts::{NewPost, PostPatch, PostService};

use uuid::Uuid;

use crate::DomainError;

/// Take a required string field, trimmed. Missing or blank fails with `message`.
pub(crate) fn required_trimmed(
    value: Option<String>,
    message: &str,
) -> Result<String, DomainError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(DomainError::Validation(message.to_string())),
    }
}

/// Take a required string field as-is. Only missing or empty fails.
pub(crate) fn required(value: Option<String>, message: &str) -> Result<String, DomainError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(DomainError::Validation(message.to_string())),
    }
}

/// Treat an empty string the same as an absent field.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Parse a path identifier. Malformed ids read as "not found".
pub(crate) fn parse_id(raw: &str, entity: &'static str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw).map_err(|_| DomainError::NotFound { entity })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trimmed() {
        assert_eq!(
            required_trimmed(Some("  hi ".into()), "msg").unwrap(),
            "hi".to_string()
        );
        assert!(matches!(
            required_trimmed(Some("   ".into()), "Title is required"),
            Err(DomainError::Validation(m)) if m == "Title is required"
        ));
        assert!(required_trimmed(None, "msg").is_err());
    }

    #[test]
    fn test_required_keeps_whitespace() {
        assert_eq!(required(Some("  ".into()), "msg").unwrap(), "  ");
        assert!(required(Some(String::new()), "msg").is_err());
    }

    #[test]
    fn test_parse_id_malformed_is_not_found() {
        assert!(matches!(
            parse_id("not-a-uuid", "Post"),
            Err(DomainError::NotFound { entity: "Post" })
        ));
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "Post").unwrap(), id);
    }
}
