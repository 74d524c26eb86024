//! Procedure names and the URL layout shared by server and client.
//!
//! Every procedure lives at `/rpc/<name>`. Queries are `GET`, mutations are
//! `POST` with a JSON body.

pub const CREATE_TODO: &str = "createTodo";
pub const GET_TODOS: &str = "getTodos";
pub const GET_TODO: &str = "getTodo";
pub const UPDATE_TODO: &str = "updateTodo";
pub const DELETE_TODO: &str = "deleteTodo";

/// Route prefix for all procedures.
pub const PREFIX: &str = "/rpc";

/// Path of a procedure relative to the server root, e.g. `/rpc/getTodos`.
pub fn path(name: &str) -> String {
    format!("{PREFIX}/{name}")
}
