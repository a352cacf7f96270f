// src/config.rs
use crate::errors::ServerError;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Base URL of the remote incident API, e.g. "https://api.example.com".
    pub api_base: String,
    /// Path of the local sqlite file (sessions + form drafts).
    pub db_path: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ServerError> {
        let api_base = std::env::var("INCIDENT_API_BASE").map_err(|_| {
            ServerError::Config("INCIDENT_API_BASE environment variable not set".into())
        })?;

        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

        let db_path =
            std::env::var("INCIDENT_DESK_DB").unwrap_or_else(|_| "incident_desk.sqlite3".into());

        Ok(Self {
            bind_addr,
            api_base,
            db_path,
        })
    }
}
