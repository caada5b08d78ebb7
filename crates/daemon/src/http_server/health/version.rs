use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use common::prelude::build_info;

#[tracing::instrument]
pub async fn handler() -> impl IntoResponse {
    (StatusCode::OK, Json(build_info()))
}
