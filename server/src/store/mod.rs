//! Persistence layer: the `todos` table behind an async trait.

pub mod libsql_backend;
pub mod migrations;

use async_trait::async_trait;
use todo_core::{NewTodo, Todo, TodoChanges};

use crate::error::DatabaseError;

pub use libsql_backend::LibSqlStore;

/// Backend-agnostic access to the `todos` table.
///
/// Every method is a single SQL statement. A missing row is reported as
/// `None` / `false`, never as an error.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Insert a row; the store assigns `id`, `completed` and `created_at`.
    async fn insert(&self, todo: &NewTodo) -> Result<Todo, DatabaseError>;

    /// Get a todo by id.
    async fn fetch(&self, id: i64) -> Result<Option<Todo>, DatabaseError>;

    /// All todos, newest `created_at` first.
    async fn list(&self) -> Result<Vec<Todo>, DatabaseError>;

    /// Apply the supplied fields and return the updated row.
    async fn update(&self, id: i64, changes: &TodoChanges)
        -> Result<Option<Todo>, DatabaseError>;

    /// Hard-delete a row. Returns whether one was removed.
    async fn delete(&self, id: i64) -> Result<bool, DatabaseError>;
}
