//! The five todo operations, mediating between the RPC layer and the store.
//!
//! The service takes validated commands, so it never re-checks or trims
//! input. Store failures are logged and returned unchanged.

use std::sync::Arc;

use todo_core::{NewTodo, Todo, TodoChanges};
use tracing::{debug, error};

use crate::error::DatabaseError;
use crate::store::TodoStore;

#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, todo: NewTodo) -> Result<Todo, DatabaseError> {
        self.store
            .insert(&todo)
            .await
            .inspect_err(|e| error!(error = %e, "Todo creation failed"))
    }

    /// `None` when no row has that id.
    pub async fn get_one(&self, id: i64) -> Result<Option<Todo>, DatabaseError> {
        self.store
            .fetch(id)
            .await
            .inspect_err(|e| error!(error = %e, id, "Todo retrieval failed"))
    }

    /// All todos, newest first.
    pub async fn get_all(&self) -> Result<Vec<Todo>, DatabaseError> {
        self.store
            .list()
            .await
            .inspect_err(|e| error!(error = %e, "Todo listing failed"))
    }

    /// Apply `changes` to `id`.
    ///
    /// Returns `None` when the row does not exist, and also when `changes`
    /// is empty: an update with nothing to change is answered as not-found
    /// without querying the store, so callers cannot tell the two apart.
    pub async fn update(
        &self,
        id: i64,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, DatabaseError> {
        if changes.is_empty() {
            debug!(id, "Update with no fields, answering not-found");
            return Ok(None);
        }
        self.store
            .update(id, &changes)
            .await
            .inspect_err(|e| error!(error = %e, id, "Todo update failed"))
    }

    /// `true` if a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        self.store
            .delete(id)
            .await
            .inspect_err(|e| error!(error = %e, id, "Todo deletion failed"))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use todo_core::Patch;

    use crate::store::LibSqlStore;

    /// Store whose every call fails, standing in for a lost connection.
    pub(crate) struct FailingStore;

    fn lost() -> DatabaseError {
        DatabaseError::Query("connection lost".to_string())
    }

    #[async_trait]
    impl TodoStore for FailingStore {
        async fn insert(&self, _todo: &NewTodo) -> Result<Todo, DatabaseError> {
            Err(lost())
        }
        async fn fetch(&self, _id: i64) -> Result<Option<Todo>, DatabaseError> {
            Err(lost())
        }
        async fn list(&self) -> Result<Vec<Todo>, DatabaseError> {
            Err(lost())
        }
        async fn update(
            &self,
            _id: i64,
            _changes: &TodoChanges,
        ) -> Result<Option<Todo>, DatabaseError> {
            Err(lost())
        }
        async fn delete(&self, _id: i64) -> Result<bool, DatabaseError> {
            Err(lost())
        }
    }

    async fn service() -> TodoService {
        TodoService::new(Arc::new(LibSqlStore::new_memory().await.unwrap()))
    }

    fn new_todo(title: &str) -> NewTodo {
        NewTodo {
            title: title.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn create_yields_increasing_ids_and_timestamps() {
        let svc = service().await;
        let first = svc.create(new_todo("Buy milk")).await.unwrap();
        let second = svc.create(new_todo("Clean")).await.unwrap();
        assert!(!first.completed);
        assert!(first.id > 0);
        assert!(second.id > first.id);
        assert!(second.created_at >= first.created_at);
    }

    #[tokio::test]
    async fn example_scenario() {
        let svc = service().await;
        let milk = svc.create(new_todo("Buy milk")).await.unwrap();
        assert_eq!(milk.id, 1);
        let clean = svc.create(new_todo("Clean")).await.unwrap();
        assert_eq!(clean.id, 2);

        let ids: Vec<i64> = svc.get_all().await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, [2, 1]);

        let changes = TodoChanges {
            completed: Some(true),
            ..Default::default()
        };
        let updated = svc.update(1, changes).await.unwrap().unwrap();
        assert_eq!(updated.title, "Buy milk");
        assert!(updated.completed);

        assert!(svc.delete(2).await.unwrap());
        let ids: Vec<i64> = svc.get_all().await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, [1]);
    }

    #[tokio::test]
    async fn update_with_no_fields_is_not_found() {
        let svc = service().await;
        let todo = svc.create(new_todo("Buy milk")).await.unwrap();
        assert!(svc.update(todo.id, TodoChanges::default()).await.unwrap().is_none());
        // The row is still there and untouched.
        assert_eq!(svc.get_one(todo.id).await.unwrap(), Some(todo));
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let svc = service().await;
        let changes = TodoChanges {
            description: Patch::Null,
            ..Default::default()
        };
        assert!(svc.update(404, changes).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_unknown_id_leaves_others() {
        let svc = service().await;
        let todo = svc.create(new_todo("stay")).await.unwrap();
        assert!(!svc.delete(todo.id + 1).await.unwrap());
        assert_eq!(svc.get_all().await.unwrap(), vec![todo]);
    }

    #[tokio::test]
    async fn store_failures_propagate_unchanged() {
        let svc = TodoService::new(Arc::new(FailingStore));
        let err = svc.create(new_todo("x")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Query(ref m) if m == "connection lost"));
        assert!(svc.get_one(1).await.is_err());
        assert!(svc.get_all().await.is_err());
        assert!(svc.delete(1).await.is_err());
        let changes = TodoChanges {
            completed: Some(true),
            ..Default::default()
        };
        assert!(svc.update(1, changes).await.is_err());
    }

    #[tokio::test]
    async fn empty_update_does_not_touch_failing_store() {
        let svc = TodoService::new(Arc::new(FailingStore));
        assert!(svc.update(1, TodoChanges::default()).await.unwrap().is_none());
    }
}
