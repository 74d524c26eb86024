//! View model for the todo list screen.
//!
//! # Design
//! `TodoListView` owns everything the screen shows: the list, the add form,
//! the inline editor and the delete confirmation. It follows the same
//! host-does-IO split as `TodoClient`: every user intent returns the
//! `HttpRequest` to execute (or `None` when there is nothing to send), and a
//! matching `apply_*` method folds the response back into the state.
//!
//! Local state only changes after the server confirms. A failed call is
//! logged and the previous state is kept; nothing is retried.

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{CreateTodoInput, Todo, UpdateTodoInput};

/// Draft of the "add todo" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoForm {
    pub title: String,
    pub description: String,
}

/// Draft of a row being edited inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub id: i64,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct TodoListView {
    client: TodoClient,
    todos: Vec<Todo>,
    form: TodoForm,
    editing: Option<EditDraft>,
    pending_delete: Option<i64>,
    busy: bool,
}

/// Trim `s`, mapping blank input to `None`.
fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl TodoListView {
    pub fn new(client: TodoClient) -> Self {
        Self {
            client,
            todos: Vec::new(),
            form: TodoForm::default(),
            editing: None,
            pending_delete: None,
            busy: false,
        }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn form(&self) -> &TodoForm {
        &self.form
    }

    pub fn editing(&self) -> Option<&EditDraft> {
        self.editing.as_ref()
    }

    pub fn pending_delete(&self) -> Option<i64> {
        self.pending_delete
    }

    /// True while a create call is in flight; the add button is disabled.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn total_count(&self) -> usize {
        self.todos.len()
    }

    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    // --- load -------------------------------------------------------------

    /// Request that fills the list when the screen is mounted.
    pub fn load(&self) -> HttpRequest {
        self.client.build_get_todos()
    }

    pub fn apply_loaded(&mut self, response: HttpResponse) -> Result<(), ApiError> {
        match self.client.parse_get_todos(response) {
            Ok(todos) => {
                self.todos = todos;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load todos");
                Err(e)
            }
        }
    }

    // --- add form ---------------------------------------------------------

    pub fn set_title(&mut self, title: &str) {
        self.form.title = title.to_string();
    }

    pub fn set_description(&mut self, description: &str) {
        self.form.description = description.to_string();
    }

    /// Submit the add form. Returns `None` when the title is blank or a
    /// create is already in flight.
    pub fn submit(&mut self) -> Option<HttpRequest> {
        if self.busy {
            return None;
        }
        let title = non_blank(&self.form.title)?;
        let input = CreateTodoInput {
            title,
            description: non_blank(&self.form.description),
        };
        match self.client.build_create_todo(&input) {
            Ok(req) => {
                self.busy = true;
                Some(req)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create todo");
                None
            }
        }
    }

    /// The host could not complete the create round-trip (no response at
    /// all). Re-enables the form and keeps the draft.
    pub fn abort_create(&mut self, reason: &str) {
        if self.busy {
            tracing::error!(reason, "Failed to create todo");
        }
        self.busy = false;
    }

    pub fn apply_created(&mut self, response: HttpResponse) -> Result<Todo, ApiError> {
        self.busy = false;
        match self.client.parse_create_todo(response) {
            Ok(todo) => {
                self.todos.insert(0, todo.clone());
                self.form = TodoForm::default();
                Ok(todo)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create todo");
                Err(e)
            }
        }
    }

    // --- toggle -----------------------------------------------------------

    /// Flip the completion flag of `id`. `None` if the row is not in the list.
    pub fn toggle(&self, id: i64) -> Option<HttpRequest> {
        let todo = self.todos.iter().find(|t| t.id == id)?;
        let input = UpdateTodoInput::new(id).completed(!todo.completed);
        match self.client.build_update_todo(&input) {
            Ok(req) => Some(req),
            Err(e) => {
                tracing::error!(error = %e, id, "Failed to toggle todo completion");
                None
            }
        }
    }

    pub fn apply_toggled(&mut self, response: HttpResponse) -> Result<Option<Todo>, ApiError> {
        match self.client.parse_update_todo(response) {
            Ok(updated) => {
                if let Some(todo) = &updated {
                    self.replace(todo.clone());
                }
                Ok(updated)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to toggle todo completion");
                Err(e)
            }
        }
    }

    fn replace(&mut self, todo: Todo) {
        if let Some(slot) = self.todos.iter_mut().find(|t| t.id == todo.id) {
            *slot = todo;
        }
    }

    // --- inline edit ------------------------------------------------------

    /// Open the inline editor on `id`, seeded with its current values.
    pub fn begin_edit(&mut self, id: i64) -> bool {
        let Some(todo) = self.todos.iter().find(|t| t.id == id) else {
            return false;
        };
        self.editing = Some(EditDraft {
            id,
            title: todo.title.clone(),
            description: todo.description.clone().unwrap_or_default(),
        });
        true
    }

    pub fn edit_title(&mut self, title: &str) {
        if let Some(draft) = self.editing.as_mut() {
            draft.title = title.to_string();
        }
    }

    pub fn edit_description(&mut self, description: &str) {
        if let Some(draft) = self.editing.as_mut() {
            draft.description = description.to_string();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Send the edit. A blank description is sent as an explicit `null` so
    /// the stored description is cleared. `None` when no editor is open or
    /// the title is blank.
    pub fn save_edit(&self) -> Option<HttpRequest> {
        let draft = self.editing.as_ref()?;
        let title = non_blank(&draft.title)?;
        let input = UpdateTodoInput::new(draft.id)
            .title(title)
            .description(non_blank(&draft.description));
        match self.client.build_update_todo(&input) {
            Ok(req) => Some(req),
            Err(e) => {
                tracing::error!(error = %e, id = draft.id, "Failed to update todo");
                None
            }
        }
    }

    /// Fold the edit response back in and close the editor.
    pub fn apply_saved(&mut self, response: HttpResponse) -> Result<Option<Todo>, ApiError> {
        match self.client.parse_update_todo(response) {
            Ok(updated) => {
                if let Some(todo) = &updated {
                    self.replace(todo.clone());
                }
                self.editing = None;
                Ok(updated)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to update todo");
                Err(e)
            }
        }
    }

    // --- delete -----------------------------------------------------------

    /// Ask for confirmation before deleting `id`.
    pub fn request_delete(&mut self, id: i64) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Confirm the pending delete. Returns the id being deleted together
    /// with the request, or `None` when nothing was pending.
    pub fn confirm_delete(&mut self) -> Option<(i64, HttpRequest)> {
        let id = self.pending_delete.take()?;
        match self.client.build_delete_todo(id) {
            Ok(req) => Some((id, req)),
            Err(e) => {
                tracing::error!(error = %e, id, "Failed to delete todo");
                None
            }
        }
    }

    pub fn apply_deleted(&mut self, id: i64, response: HttpResponse) -> Result<bool, ApiError> {
        match self.client.parse_delete_todo(response) {
            Ok(deleted) => {
                if deleted {
                    self.todos.retain(|t| t.id != id);
                    if self.editing.as_ref().is_some_and(|d| d.id == id) {
                        self.editing = None;
                    }
                }
                Ok(deleted)
            }
            Err(e) => {
                tracing::error!(error = %e, id, "Failed to delete todo");
                Err(e)
            }
        }
    }
}
