use std::sync::Arc;

use tokio::net::TcpListener;
use todo_server::{LibSqlStore, ServerConfig, TodoService};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServerConfig::from_env()?;
    let store = LibSqlStore::open(&config.db_path).await?;
    let service = TodoService::new(Arc::new(store));
    let app = todo_server::app(service).layer(config.cors_layer()?);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, db = %config.db_path, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
