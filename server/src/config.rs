//! Server configuration, read from the environment.

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;

use crate::error::ConfigError;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_PATH: &str = "./data/todos.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// libSQL database file, or `:memory:`.
    pub db_path: String,
    /// Browser origin allowed by CORS. Any origin when unset.
    pub cors_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db_path: DEFAULT_DB_PATH.to_string(),
            cors_origin: None,
        }
    }
}

impl ServerConfig {
    /// Read `TODO_HOST`, `PORT`, `TODO_DB_PATH` and `TODO_CORS_ORIGIN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset keys take their
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                message: format!("{raw:?}: {e}"),
            })?,
            None => defaults.port,
        };
        Ok(Self {
            host: lookup("TODO_HOST").unwrap_or(defaults.host),
            port,
            db_path: lookup("TODO_DB_PATH").unwrap_or(defaults.db_path),
            cors_origin: lookup("TODO_CORS_ORIGIN").filter(|origin| !origin.is_empty()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn cors_layer(&self) -> Result<CorsLayer, ConfigError> {
        let Some(origin) = &self.cors_origin else {
            return Ok(CorsLayer::permissive());
        };
        let origin = origin
            .parse::<HeaderValue>()
            .map_err(|e| ConfigError::InvalidValue {
                key: "TODO_CORS_ORIGIN".to_string(),
                message: e.to_string(),
            })?;
        Ok(CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]))
    }
}
