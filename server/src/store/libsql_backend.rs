//! libSQL implementation of `TodoStore`.
//!
//! Supports local file and in-memory databases. A single connection is
//! opened at startup and reused for every statement.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{params, Connection, Value};
use todo_core::{NewTodo, Todo, TodoChanges};
use tracing::{debug, info};

use crate::error::DatabaseError;
use crate::store::{migrations, TodoStore};

/// Column order used by every `SELECT` / `RETURNING` below.
const TODO_COLUMNS: &str = "id, title, description, completed, created_at";

/// Path value that selects an in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

pub struct LibSqlStore {
    conn: Connection,
}

impl LibSqlStore {
    /// Open `path`, or an in-memory database when `path` is `:memory:`.
    pub async fn open(path: &str) -> Result<Self, DatabaseError> {
        if path == MEMORY_PATH {
            Self::new_memory().await
        } else {
            Self::new_local(Path::new(path)).await
        }
    }

    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;
        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let store = Self { conn };
        migrations::run_migrations(&store.conn).await?;
        info!(path = %path.display(), "Database opened");
        Ok(store)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(MEMORY_PATH)
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;
        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let store = Self { conn };
        migrations::run_migrations(&store.conn).await?;
        Ok(store)
    }

    /// Run a statement that yields at most one todo row.
    async fn query_one(
        &self,
        op: &str,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<Option<Todo>, DatabaseError> {
        let mut rows = self
            .conn
            .query(sql, params)
            .await
            .map_err(|e| DatabaseError::Query(format!("{op}: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_todo(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("{op} row: {e}"))),
        }
    }
}

// ── Helper functions ────────────────────────────────────────────────

/// Parse the stored `created_at` text into `DateTime<Utc>`.
///
/// The column default writes RFC 3339 with milliseconds; plain SQLite
/// `datetime()` output is accepted too.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| DatabaseError::Query(format!("todo.created_at parse {s:?}: {e}")))
}

/// Convert `Option<&str>` to a libsql value, `None` as SQL NULL.
fn opt_text(s: Option<&str>) -> Value {
    match s {
        Some(s) => Value::Text(s.to_string()),
        None => Value::Null,
    }
}

fn opt_bool(b: Option<bool>) -> Value {
    match b {
        Some(b) => Value::Integer(i64::from(b)),
        None => Value::Null,
    }
}

/// Map a libsql Row to a Todo. Column order matches `TODO_COLUMNS`.
fn row_to_todo(row: &libsql::Row) -> Result<Todo, DatabaseError> {
    let id: i64 = row
        .get(0)
        .map_err(|e| DatabaseError::Query(format!("todo.id: {e}")))?;
    let title: String = row
        .get(1)
        .map_err(|e| DatabaseError::Query(format!("todo.title: {e}")))?;
    let description = match row
        .get_value(2)
        .map_err(|e| DatabaseError::Query(format!("todo.description: {e}")))?
    {
        Value::Text(text) => Some(text),
        Value::Null => None,
        other => {
            return Err(DatabaseError::Query(format!(
                "todo.description: unexpected value {other:?}"
            )))
        }
    };
    let completed: i64 = row
        .get(3)
        .map_err(|e| DatabaseError::Query(format!("todo.completed: {e}")))?;
    let created_str: String = row
        .get(4)
        .map_err(|e| DatabaseError::Query(format!("todo.created_at: {e}")))?;

    Ok(Todo {
        id,
        title,
        description,
        completed: completed != 0,
        created_at: parse_datetime(&created_str)?,
    })
}

#[async_trait]
impl TodoStore for LibSqlStore {
    async fn insert(&self, todo: &NewTodo) -> Result<Todo, DatabaseError> {
        let created = self
            .query_one(
                "insert_todo",
                &format!(
                    "INSERT INTO todos (title, description) VALUES (?1, ?2) RETURNING {TODO_COLUMNS}"
                ),
                params![todo.title.as_str(), opt_text(todo.description.as_deref())],
            )
            .await?
            .ok_or_else(|| DatabaseError::Query("insert_todo: no row returned".to_string()))?;
        debug!(id = created.id, "Todo created");
        Ok(created)
    }

    async fn fetch(&self, id: i64) -> Result<Option<Todo>, DatabaseError> {
        self.query_one(
            "get_todo",
            &format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = ?1"),
            params![id],
        )
        .await
    }

    async fn list(&self) -> Result<Vec<Todo>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {TODO_COLUMNS} FROM todos ORDER BY created_at DESC, id DESC"),
                (),
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("list_todos: {e}")))?;

        let mut todos = Vec::new();
        loop {
            match rows.next().await {
                Ok(Some(row)) => todos.push(row_to_todo(&row)?),
                Ok(None) => break,
                Err(e) => return Err(DatabaseError::Query(format!("list_todos row: {e}"))),
            }
        }
        Ok(todos)
    }

    async fn update(
        &self,
        id: i64,
        changes: &TodoChanges,
    ) -> Result<Option<Todo>, DatabaseError> {
        // ?2 selects whether ?3 replaces the description, so NULL in ?3 can
        // mean "clear" rather than "leave alone".
        let (set_description, description) = match changes.description.as_ref().into_option() {
            Some(value) => (1i64, value.map(String::as_str)),
            None => (0i64, None),
        };
        let updated = self
            .query_one(
                "update_todo",
                &format!(
                    "UPDATE todos SET
                        title = COALESCE(?1, title),
                        description = CASE WHEN ?2 THEN ?3 ELSE description END,
                        completed = COALESCE(?4, completed)
                     WHERE id = ?5
                     RETURNING {TODO_COLUMNS}"
                ),
                params![
                    opt_text(changes.title.as_deref()),
                    set_description,
                    opt_text(description),
                    opt_bool(changes.completed),
                    id,
                ],
            )
            .await?;
        if updated.is_some() {
            debug!(id, "Todo updated");
        }
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let count = self
            .conn
            .execute("DELETE FROM todos WHERE id = ?1", params![id])
            .await
            .map_err(|e| DatabaseError::Query(format!("delete_todo: {e}")))?;
        if count > 0 {
            debug!(id, "Todo deleted");
        }
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_core::Patch;

    async fn test_db() -> LibSqlStore {
        LibSqlStore::new_memory().await.unwrap()
    }

    fn new_todo(title: &str, description: Option<&str>) -> NewTodo {
        NewTodo {
            title: title.to_string(),
            description: description.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn insert_assigns_defaults() {
        let db = test_db().await;
        let todo = db.insert(&new_todo("Buy milk", None)).await.unwrap();
        assert_eq!(todo.id, 1);
        assert_eq!(todo.title, "Buy milk");
        assert!(todo.description.is_none());
        assert!(!todo.completed);
    }

    #[tokio::test]
    async fn insert_and_fetch_by_id() {
        let db = test_db().await;
        let created = db.insert(&new_todo("Walk", Some("the dog"))).await.unwrap();
        let fetched = db.fetch(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.description.as_deref(), Some("the dog"));
    }

    #[tokio::test]
    async fn fetch_not_found() {
        let db = test_db().await;
        assert!(db.fetch(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let db = test_db().await;
        for title in ["one", "two", "three"] {
            db.insert(&new_todo(title, None)).await.unwrap();
        }
        let titles: Vec<String> = db.list().await.unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, ["three", "two", "one"]);
    }

    #[tokio::test]
    async fn list_empty() {
        let db = test_db().await;
        assert!(db.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_applies_only_supplied_fields() {
        let db = test_db().await;
        let created = db.insert(&new_todo("Buy milk", Some("2 litres"))).await.unwrap();

        let changes = TodoChanges {
            completed: Some(true),
            ..Default::default()
        };
        let updated = db.update(created.id, &changes).await.unwrap().unwrap();
        assert!(updated.completed);
        assert_eq!(updated.title, "Buy milk");
        assert_eq!(updated.description.as_deref(), Some("2 litres"));
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn update_null_description_clears_it() {
        let db = test_db().await;
        let created = db.insert(&new_todo("Buy milk", Some("2 litres"))).await.unwrap();

        let changes = TodoChanges {
            description: Patch::Null,
            ..Default::default()
        };
        let updated = db.update(created.id, &changes).await.unwrap().unwrap();
        assert!(updated.description.is_none());
    }

    #[tokio::test]
    async fn update_replaces_title_and_description() {
        let db = test_db().await;
        let created = db.insert(&new_todo("Buy milk", None)).await.unwrap();

        let changes = TodoChanges {
            title: Some("Buy bread".to_string()),
            description: Patch::Value("wholegrain".to_string()),
            completed: None,
        };
        let updated = db.update(created.id, &changes).await.unwrap().unwrap();
        assert_eq!(updated.title, "Buy bread");
        assert_eq!(updated.description.as_deref(), Some("wholegrain"));
        assert!(!updated.completed);
    }

    #[tokio::test]
    async fn update_missing_row_is_none() {
        let db = test_db().await;
        let changes = TodoChanges {
            completed: Some(true),
            ..Default::default()
        };
        assert!(db.update(5, &changes).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_reports_whether_row_existed() {
        let db = test_db().await;
        let keep = db.insert(&new_todo("keep", None)).await.unwrap();
        let gone = db.insert(&new_todo("gone", None)).await.unwrap();

        assert!(db.delete(gone.id).await.unwrap());
        assert!(!db.delete(gone.id).await.unwrap());
        assert!(db.fetch(gone.id).await.unwrap().is_none());
        assert_eq!(db.list().await.unwrap(), vec![keep]);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let db = test_db().await;
        db.insert(&new_todo("one", None)).await.unwrap();
        let second = db.insert(&new_todo("two", None)).await.unwrap();
        db.delete(second.id).await.unwrap();
        let third = db.insert(&new_todo("three", None)).await.unwrap();
        assert!(third.id > second.id);
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = test_db().await;
        migrations::run_migrations(&db.conn).await.unwrap();
        assert_eq!(migrations::current_version(&db.conn).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn file_database_survives_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("todos.db");
        let path_str = path.to_str().unwrap();

        let deleted_id = {
            let db = LibSqlStore::open(path_str).await.unwrap();
            db.insert(&new_todo("keep", Some("notes"))).await.unwrap();
            let newest = db.insert(&new_todo("gone", None)).await.unwrap();
            assert!(db.delete(newest.id).await.unwrap());
            newest.id
        };

        let db = LibSqlStore::open(path_str).await.unwrap();
        assert_eq!(migrations::current_version(&db.conn).await.unwrap(), 1);
        let kept = db.list().await.unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "keep");
        assert_eq!(kept[0].description.as_deref(), Some("notes"));

        let fresh = db.insert(&new_todo("fresh", None)).await.unwrap();
        assert!(fresh.id > deleted_id);
    }

    #[test]
    fn parse_datetime_accepts_both_formats() {
        assert!(parse_datetime("2026-10-18T09:00:00.123Z").is_ok());
        assert!(parse_datetime("2026-10-18 09:00:00").is_ok());
        assert!(parse_datetime("yesterday").is_err());
    }
}
