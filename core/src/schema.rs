//! Input validation for the todo procedures.
//!
//! Each request type has a `validate` step that either rejects it or turns
//! it into the command the service executes. Validation never trims: a
//! title of `"  "` is accepted here, callers are expected to trim before
//! sending.

use crate::patch::Patch;
use crate::types::{CreateTodoInput, UpdateTodoInput};

/// A request that failed its schema check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid `{field}`: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// A validated `createTodo` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
}

/// The set of fields a validated `updateTodo` request touches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Patch<String>,
    pub completed: Option<bool>,
}

impl TodoChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_absent() && self.completed.is_none()
    }
}

/// A validated `updateTodo` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoUpdate {
    pub id: i64,
    pub changes: TodoChanges,
}

fn required_title(title: String) -> Result<String, ValidationError> {
    if title.is_empty() {
        return Err(ValidationError::new("title", "Title is required"));
    }
    Ok(title)
}

impl CreateTodoInput {
    pub fn validate(self) -> Result<NewTodo, ValidationError> {
        Ok(NewTodo {
            title: required_title(self.title)?,
            description: self.description,
        })
    }
}

impl UpdateTodoInput {
    pub fn validate(self) -> Result<TodoUpdate, ValidationError> {
        let title = match self.title {
            Patch::Absent => None,
            Patch::Null => {
                return Err(ValidationError::new("title", "expected string, received null"))
            }
            Patch::Value(title) => Some(required_title(title)?),
        };
        let completed = match self.completed {
            Patch::Absent => None,
            Patch::Null => {
                return Err(ValidationError::new(
                    "completed",
                    "expected boolean, received null",
                ))
            }
            Patch::Value(completed) => Some(completed),
        };
        Ok(TodoUpdate {
            id: self.id,
            changes: TodoChanges {
                title,
                description: self.description,
                completed,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_non_empty_title() {
        let err = CreateTodoInput::new("").validate().unwrap_err();
        assert_eq!(err.field, "title");
    }

    #[test]
    fn create_does_not_trim() {
        let todo = CreateTodoInput::new("  ").validate().unwrap();
        assert_eq!(todo.title, "  ");
    }

    #[test]
    fn create_null_and_missing_description_match() {
        let missing: CreateTodoInput = serde_json::from_str(r#"{"title":"a"}"#).unwrap();
        let null: CreateTodoInput =
            serde_json::from_str(r#"{"title":"a","description":null}"#).unwrap();
        assert_eq!(missing.validate().unwrap(), null.validate().unwrap());
    }

    #[test]
    fn create_rejects_missing_title() {
        let result: Result<CreateTodoInput, _> = serde_json::from_str(r#"{"description":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_with_no_fields_is_empty() {
        let input: UpdateTodoInput = serde_json::from_str(r#"{"id":3}"#).unwrap();
        let update = input.validate().unwrap();
        assert_eq!(update.id, 3);
        assert!(update.changes.is_empty());
    }

    #[test]
    fn update_completed_only() {
        let input: UpdateTodoInput =
            serde_json::from_str(r#"{"id":1,"completed":true}"#).unwrap();
        let update = input.validate().unwrap();
        assert_eq!(update.changes.completed, Some(true));
        assert!(update.changes.title.is_none());
        assert!(update.changes.description.is_absent());
    }

    #[test]
    fn update_description_null_means_clear() {
        let input: UpdateTodoInput =
            serde_json::from_str(r#"{"id":1,"description":null}"#).unwrap();
        let update = input.validate().unwrap();
        assert_eq!(update.changes.description, Patch::Null);
        assert!(!update.changes.is_empty());
    }

    #[test]
    fn update_rejects_empty_title() {
        let err = UpdateTodoInput::new(1).title("").validate().unwrap_err();
        assert_eq!(err.field, "title");
    }

    #[test]
    fn update_rejects_null_title() {
        let input: UpdateTodoInput = serde_json::from_str(r#"{"id":1,"title":null}"#).unwrap();
        assert_eq!(input.validate().unwrap_err().field, "title");
    }

    #[test]
    fn update_rejects_null_completed() {
        let input: UpdateTodoInput =
            serde_json::from_str(r#"{"id":1,"completed":null}"#).unwrap();
        assert_eq!(input.validate().unwrap_err().field, "completed");
    }

    #[test]
    fn update_rejects_non_integer_id() {
        let result: Result<UpdateTodoInput, _> = serde_json::from_str(r#"{"id":1.5}"#);
        assert!(result.is_err());
        let result: Result<UpdateTodoInput, _> = serde_json::from_str(r#"{"id":"1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_ignores_unknown_fields() {
        let input: UpdateTodoInput =
            serde_json::from_str(r#"{"id":1,"completed":false,"extra":1}"#).unwrap();
        assert_eq!(input.validate().unwrap().changes.completed, Some(false));
    }
}
