use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Fallback for unrouted paths, answering in JSON when the client asks for it.
pub async fn not_found_handler(uri: Uri, headers: HeaderMap) -> Response {
    tracing::debug!(path = %uri.path(), "no route matched");

    let wants_json = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"));

    if wants_json {
        let msg = serde_json::json!({"error": "Not found", "path": uri.path()});
        (StatusCode::NOT_FOUND, Json(msg)).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain")],
            format!("not found: {}", uri.path()),
        )
            .into_response()
    }
}
