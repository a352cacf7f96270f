// errors.rs
use crate::api::ApiError;
use std::fmt;

/// One inline error for a single form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors originating from the server logic (routing, missing resources),
/// the local store, or the remote incident API.
#[derive(Debug)]
pub enum ServerError {
    NotFound,
    BadRequest(String),
    Unauthorized(String),
    /// Required-field failures collected before any remote call is made.
    Validation(Vec<FieldError>),
    Api(ApiError),
    Config(String),
    DbError(String),
    XlsxError(String),
    InternalError,
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::NotFound => write!(f, "Not Found"),
            ServerError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            ServerError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            ServerError::Validation(errors) => {
                write!(f, "Validation failed ({} field(s))", errors.len())
            }
            ServerError::Api(err) => write!(f, "Remote API error: {err}"),
            ServerError::Config(msg) => write!(f, "Configuration error: {msg}"),
            ServerError::DbError(msg) => write!(f, "Database Error: {msg}"),
            ServerError::XlsxError(msg) => write!(f, "Spreadsheet Error: {msg}"),
            ServerError::InternalError => write!(f, "Internal Server Error"),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<ApiError> for ServerError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => {
                ServerError::Unauthorized("remote API rejected the stored token".into())
            }
            ApiError::NotFound => ServerError::NotFound,
            other => ServerError::Api(other),
        }
    }
}
