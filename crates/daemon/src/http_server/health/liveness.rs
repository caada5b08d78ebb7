use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[tracing::instrument]
pub async fn handler() -> impl IntoResponse {
    let msg = serde_json::json!({"status": "ok"});
    (StatusCode::OK, Json(msg))
}
