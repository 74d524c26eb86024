//! Domain DTOs for the todo procedures.
//!
//! # Design
//! These are the wire shapes shared by the server and the client. Request
//! types are deliberately loose (anything that parses as JSON of the right
//! shape is accepted); the rules that make a request acceptable live in
//! [`crate::schema`], which turns a request into a validated command.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::patch::Patch;

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for `createTodo`.
///
/// An omitted `description` and `"description": null` are equivalent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTodoInput {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateTodoInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Input for `updateTodo`. Only the fields present in the JSON are applied;
/// omitted fields remain unchanged on the server. `"description": null`
/// clears the description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTodoInput {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub title: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub description: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub completed: Patch<bool>,
}

impl UpdateTodoInput {
    /// An update for `id` that touches nothing yet.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            title: Patch::Absent,
            description: Patch::Absent,
            completed: Patch::Absent,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Patch::Value(title.into());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Patch::Value(completed);
        self
    }
}

/// Input for `getTodo` and `deleteTodo`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoIdInput {
    pub id: i64,
}
