use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Stage name is required!")]
    EmptyStageName,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server rejected request with {status}: {reason}")]
    Status { status: StatusCode, reason: String },

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] FormError),
}

impl ClientError {
    pub fn from_status(status: StatusCode) -> Self {
        ClientError::Status {
            status,
            reason: status.canonical_reason().unwrap_or("unknown").to_string(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Network(e) => e.status(),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
