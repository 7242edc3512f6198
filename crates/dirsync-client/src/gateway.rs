//! Gateway contract: `call(method, path, body?) -> result`.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Status codes treated as success.
pub const SUCCESS_STATUSES: &[u16] = &[200, 201, 204];

/// HTTP methods the directory API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Whether a request with this method changes remote state.
    pub fn is_mutating(self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// Successful response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Json(Value),
    /// Body that is not valid JSON.
    Text(String),
    /// No body at all (typically 204).
    Empty,
}

impl ApiResponse {
    /// Classify a raw response body.
    pub fn from_body(body: &str) -> Self {
        if body.trim().is_empty() {
            return Self::Empty;
        }
        match serde_json::from_str(body) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(body.to_string()),
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// Why a call yielded no usable result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("status {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not the expected record shape.
    #[error("unexpected {context} response: {message}")]
    Decode { context: String, message: String },
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    pub(crate) fn decode(context: &str, message: impl Into<String>) -> Self {
        Self::Decode {
            context: context.to_string(),
            message: message.into(),
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// One authenticated request against the remote directory.
///
/// Implementations block until the request completes. Failures come back as
/// [`ApiError`]; callers decide whether a failure matters.
pub trait DirectoryApi {
    fn call(&self, method: Method, path: &str, body: Option<&Value>) -> ApiResult<ApiResponse>;
}

impl<T: DirectoryApi + ?Sized> DirectoryApi for &T {
    fn call(&self, method: Method, path: &str, body: Option<&Value>) -> ApiResult<ApiResponse> {
        (**self).call(method, path, body)
    }
}
