//! Resource routes under `/r`.
//!
//! Handlers only translate HTTP into policy calls: they extract the
//! requester, the path and the visibility header, run the matching
//! procedure against the database, and map the [`Outcome`] or
//! [`PolicyError`] back onto a response.

use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use common::prelude::{Outcome, PolicyError};

pub mod get;
pub mod list;
pub mod put;

/// Body returned by a successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub status: String,
}

/// Listing body: one single-key `{filename: content}` object per resource.
pub type ListResponse = Vec<serde_json::Map<String, Value>>;

pub(crate) fn outcome_response(outcome: Outcome) -> Response {
    match outcome {
        Outcome::Created { .. } => (
            StatusCode::CREATED,
            Json(CreatedResponse {
                status: "created".to_string(),
            }),
        )
            .into_response(),
        Outcome::Content(content) => (StatusCode::OK, Json(content)).into_response(),
        Outcome::FilteredContent(entries) => {
            let body: ListResponse = entries
                .into_iter()
                .map(|(filename, content)| {
                    let mut entry = serde_json::Map::new();
                    entry.insert(filename, content);
                    entry
                })
                .collect();
            (StatusCode::OK, Json(body)).into_response()
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ResourceError(#[from] pub PolicyError<sqlx::Error>);

impl IntoResponse for ResourceError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            PolicyError::InvalidInput(reason) => {
                tracing::warn!("RESOURCE: rejected path parameters: {}", reason);
                (StatusCode::BAD_REQUEST, "Invalid path parameters".to_string())
            }
            PolicyError::AuthenticationRequired => (StatusCode::UNAUTHORIZED, self.0.to_string()),
            PolicyError::WriteDenied
            | PolicyError::ReadDenied
            | PolicyError::NoReadableResources => (StatusCode::FORBIDDEN, self.0.to_string()),
            PolicyError::NotFound => (StatusCode::NOT_FOUND, self.0.to_string()),
            PolicyError::Store(e) => {
                tracing::error!("RESOURCE: database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        if status.is_client_error() {
            tracing::info!(status = status.as_u16(), "RESOURCE: {}", message);
        }

        let msg = serde_json::json!({ "error": message });
        (status, Json(msg)).into_response()
    }
}

/// `<base>/r/<segments...>` with every segment percent-encoded.
pub(crate) fn resource_url(base_url: &Url, segments: &[&str]) -> Url {
    let mut url = base_url.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().push("r").extend(segments);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::to_bytes;
    use serde_json::json;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_resource_url_encodes_segments() {
        let base = Url::parse("http://localhost:5050").unwrap();
        let url = resource_url(&base, &["my notes", "a/b.json"]);
        assert_eq!(url.as_str(), "http://localhost:5050/r/my%20notes/a%2Fb.json");

        let base = Url::parse("http://localhost:5050/prefix/").unwrap();
        let url = resource_url(&base, &["notes"]);
        assert_eq!(url.as_str(), "http://localhost:5050/prefix/r/notes");
    }

    #[tokio::test]
    async fn test_listing_body_shape() {
        let response = outcome_response(Outcome::FilteredContent(vec![
            ("b.json".to_string(), json!({"n": 1})),
            ("a.json".to_string(), json!([1])),
        ]));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!([{"b.json": {"n": 1}}, {"a.json": [1]}])
        );
    }

    #[tokio::test]
    async fn test_error_status_mapping() {
        let cases = [
            (
                PolicyError::InvalidInput("bundle cannot be empty".into()),
                StatusCode::BAD_REQUEST,
                "Invalid path parameters",
            ),
            (
                PolicyError::AuthenticationRequired,
                StatusCode::UNAUTHORIZED,
                "Authentication required to create bundle",
            ),
            (
                PolicyError::WriteDenied,
                StatusCode::FORBIDDEN,
                "Write access denied",
            ),
            (
                PolicyError::ReadDenied,
                StatusCode::FORBIDDEN,
                "Read access denied",
            ),
            (
                PolicyError::NoReadableResources,
                StatusCode::FORBIDDEN,
                "No readable resources",
            ),
            (
                PolicyError::NotFound,
                StatusCode::NOT_FOUND,
                "Resource not found",
            ),
            (
                PolicyError::Store(sqlx::Error::PoolClosed),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            ),
        ];

        for (err, status, message) in cases {
            let response = ResourceError(err).into_response();
            assert_eq!(response.status(), status);
            assert_eq!(body_json(response).await, json!({ "error": message }));
        }
    }
}
