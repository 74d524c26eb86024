//! Procedure endpoints.
//!
//! # Design
//! Each procedure is one route under `/rpc`. Input is parsed into the
//! request type from `todo-core`, validated, and only then handed to the
//! service. Parse and schema failures answer 400 with the error envelope
//! before the service runs; store failures answer 500. A not-found outcome
//! is a normal 200 whose body is `null`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request, State};
use axum::http::request::Parts;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use todo_core::procedure;
use todo_core::{CreateTodoInput, Todo, TodoIdInput, UpdateTodoInput};

use crate::error::RpcError;
use crate::service::TodoService;

/// JSON body extractor that reports parse failures as `RpcError::BadInput`.
pub struct RpcInput<T>(pub T);

impl<S, T> FromRequest<S> for RpcInput<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RpcError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| RpcError::BadInput(e.body_text()))?;
        Ok(Self(value))
    }
}

/// Query-string extractor that reports parse failures as `RpcError::BadInput`.
pub struct RpcQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for RpcQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RpcError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| RpcError::BadInput(e.body_text()))?;
        Ok(Self(value))
    }
}

pub fn routes() -> Router<TodoService> {
    Router::new()
        .route(&procedure::path(procedure::CREATE_TODO), post(create_todo))
        .route(&procedure::path(procedure::GET_TODOS), get(get_todos))
        .route(&procedure::path(procedure::GET_TODO), get(get_todo))
        .route(&procedure::path(procedure::UPDATE_TODO), post(update_todo))
        .route(&procedure::path(procedure::DELETE_TODO), post(delete_todo))
}

async fn create_todo(
    State(service): State<TodoService>,
    RpcInput(input): RpcInput<CreateTodoInput>,
) -> Result<Json<Todo>, RpcError> {
    let todo = service.create(input.validate()?).await?;
    Ok(Json(todo))
}

async fn get_todos(State(service): State<TodoService>) -> Result<Json<Vec<Todo>>, RpcError> {
    Ok(Json(service.get_all().await?))
}

async fn get_todo(
    State(service): State<TodoService>,
    RpcQuery(input): RpcQuery<TodoIdInput>,
) -> Result<Json<Option<Todo>>, RpcError> {
    Ok(Json(service.get_one(input.id).await?))
}

async fn update_todo(
    State(service): State<TodoService>,
    RpcInput(input): RpcInput<UpdateTodoInput>,
) -> Result<Json<Option<Todo>>, RpcError> {
    let update = input.validate()?;
    Ok(Json(service.update(update.id, update.changes).await?))
}

async fn delete_todo(
    State(service): State<TodoService>,
    RpcInput(input): RpcInput<TodoIdInput>,
) -> Result<Json<bool>, RpcError> {
    Ok(Json(service.delete(input.id).await?))
}
