// src/error.rs
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The request was superseded or its owner went away
    #[error("Request canceled")]
    Canceled,

    #[error("Backend returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid job draft: {0}")]
    InvalidDraft(String),
}

impl ApiError {
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ApiError::Canceled)
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status(),
            _ => None,
        }
    }

    /// 401 and 403 both mean "log in as admin first"
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
        )
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
