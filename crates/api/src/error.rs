use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API request rejected: HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            ApiError::Transport(err) if err.is_timeout() => {
                Some("Check your network connection or try again later")
            }
            ApiError::Transport(err) if err.is_connect() || err.is_builder() => {
                Some("Verify the base URL points at a reachable Plane instance")
            }
            ApiError::Status {
                status: 401 | 403, ..
            } => Some("Verify your API key and that it has access to this workspace"),
            ApiError::Status { status: 404, .. } => {
                Some("Check the workspace slug and project ID")
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
