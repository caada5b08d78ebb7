use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Rejected { status: StatusCode, message: String },
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    /// Build a rejection from a non-success response body, preferring the
    /// server's `{"error": ...}` message over the raw text.
    pub(crate) fn rejected(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error)
            .unwrap_or_else(|_| body.to_string());
        ApiError::Rejected { status, message }
    }
}
