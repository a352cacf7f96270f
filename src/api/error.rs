use std::error::Error;
use std::fmt;

/// Errors from the remote incident API, normalized at the client so
/// reqwest types never leak into page or workflow code.
#[derive(Debug)]
pub enum ApiError {
    Network(String),
    /// Non-2xx response that is not a 401/404.
    Status { code: u16, body: String },
    Unauthorized,
    NotFound,
    Decode(String),
    Upload(String),
    Cancelled,
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "Network error: {msg}"),
            ApiError::Status { code, body } => write!(f, "API returned HTTP {code}: {body}"),
            ApiError::Unauthorized => write!(f, "API token rejected (401)"),
            ApiError::NotFound => write!(f, "Resource not found (404)"),
            ApiError::Decode(msg) => write!(f, "Response decode error: {msg}"),
            ApiError::Upload(msg) => write!(f, "Upload error: {msg}"),
            ApiError::Cancelled => write!(f, "Request cancelled"),
        }
    }
}

impl Error for ApiError {}
