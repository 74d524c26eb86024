//! Shared types and synchronous client core for the todo procedures.
//!
//! # Overview
//! - `types` / `schema` / `patch`: the wire shapes of the five procedures
//!   and the validation step that turns a request into a command. The server
//!   uses these to check input before dispatch.
//! - `client`: builds `HttpRequest` values and parses `HttpResponse` values
//!   without touching the network (host-does-IO).
//! - `view`: the todo list screen as a view model driven through the client.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - Each procedure is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit.
//! - Types use owned `String` / `Vec` fields to simplify FFI mapping.

pub mod client;
pub mod error;
pub mod http;
pub mod patch;
pub mod procedure;
pub mod schema;
pub mod types;
pub mod view;

pub use client::TodoClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use patch::Patch;
pub use schema::{NewTodo, TodoChanges, TodoUpdate, ValidationError};
pub use types::{CreateTodoInput, Todo, TodoIdInput, UpdateTodoInput};
pub use view::TodoListView;
