//! Stateless request builder and response parser for the todo procedures.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each procedure is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, ErrorEnvelope};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::procedure;
use crate::types::{CreateTodoInput, Todo, TodoIdInput, UpdateTodoInput};

/// Synchronous, stateless client for the todo procedures.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, name: &str) -> String {
        format!("{}{}", self.base_url, procedure::path(name))
    }

    fn query(&self, path: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: Vec::new(),
            body: None,
        }
    }

    fn mutation<T: Serialize>(&self, name: &str, input: &T) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.url(name),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_create_todo(&self, input: &CreateTodoInput) -> Result<HttpRequest, ApiError> {
        self.mutation(procedure::CREATE_TODO, input)
    }

    pub fn build_get_todos(&self) -> HttpRequest {
        self.query(self.url(procedure::GET_TODOS))
    }

    pub fn build_get_todo(&self, id: i64) -> HttpRequest {
        self.query(format!("{}?id={id}", self.url(procedure::GET_TODO)))
    }

    pub fn build_update_todo(&self, input: &UpdateTodoInput) -> Result<HttpRequest, ApiError> {
        self.mutation(procedure::UPDATE_TODO, input)
    }

    pub fn build_delete_todo(&self, id: i64) -> Result<HttpRequest, ApiError> {
        self.mutation(procedure::DELETE_TODO, &TodoIdInput { id })
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        parse_json(response)
    }

    /// `Ok(None)` when no todo has that id.
    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Option<Todo>, ApiError> {
        parse_json(response)
    }

    /// `Ok(None)` when the id is unknown or the update carried no fields.
    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Option<Todo>, ApiError> {
        parse_json(response)
    }

    /// `Ok(false)` when no todo had that id.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<bool, ApiError> {
        parse_json(response)
    }
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-200 status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    match response.status {
        200 => Ok(()),
        400 => {
            let message = serde_json::from_str::<ErrorEnvelope>(&response.body)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| response.body.clone());
            Err(ApiError::Validation { message })
        }
        status => Err(ApiError::Server {
            status,
            body: response.body.clone(),
        }),
    }
}
