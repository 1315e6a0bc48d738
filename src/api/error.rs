//! Errors produced while talking to the backend.

use thiserror::Error;

/// Failure of a single backend request.
///
/// The variants follow how the client reacts to them: authentication and authorization
/// failures drive navigation (see [`recovery`](crate::api::recovery)); everything else is
/// only logged.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// 401: the credential is missing, expired or rejected.
    #[error("Not authenticated")]
    Unauthorized,

    /// 403: authenticated, but the role may not touch this resource.
    #[error("Not authorized")]
    Forbidden,

    /// Any other non-success status.
    #[error("Backend answered {status}: {body}")]
    Status { status: u16, body: String },

    /// The request was sent but no response came back.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body did not have the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// The request could not be built (bad URL, unserializable body).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            _ => ApiError::Status { status, body },
        }
    }

    /// Status code, when the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Forbidden => Some(403),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            ApiError::InvalidRequest(e.to_string())
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}
