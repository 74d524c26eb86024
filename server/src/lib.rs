//! Todo server: typed procedures over a libSQL `todos` table.
//!
//! Request path: `rpc` (parse + validate) → `service` → `store`.

pub mod config;
pub mod error;
pub mod rpc;
pub mod service;
pub mod store;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::{ConfigError, DatabaseError, RpcError};
pub use service::TodoService;
pub use store::{LibSqlStore, TodoStore};

/// Router exposing every procedure, backed by `service`.
pub fn app(service: TodoService) -> Router {
    rpc::routes()
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

pub async fn run(listener: TcpListener, service: TodoService) -> Result<(), std::io::Error> {
    axum::serve(listener, app(service)).await
}
