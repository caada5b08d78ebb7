use axum::extract::{Json, Path, State};
use axum::response::Response;
use http::HeaderMap;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use common::prelude::{handle_write, Visibility, WriteRequest};
use common::visibility::PUBLIC_ACCESS_HEADER;

use super::{outcome_response, resource_url, CreatedResponse, ResourceError};
use crate::auth::Requester;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct PutRequest {
    /// Bundle to write into
    pub bundle: String,
    /// Resource name within the bundle
    pub filename: String,
    /// JSON content to store
    #[arg(value_parser = parse_json_content)]
    pub content: Value,
    /// Visibility for the resource (public-write, public-read or public-none)
    #[arg(long)]
    pub access: Option<Visibility>,
}

fn parse_json_content(raw: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(raw)
}

pub async fn handler(
    State(state): State<ServiceState>,
    requester: Requester,
    Path((bundle, filename)): Path<(String, String)>,
    headers: HeaderMap,
    Json(content): Json<Value>,
) -> Result<Response, ResourceError> {
    let header = headers
        .get(PUBLIC_ACCESS_HEADER)
        .and_then(|v| v.to_str().ok());
    let visibility = Visibility::from_header(header);

    tracing::info!(
        bundle = %bundle,
        filename = %filename,
        visibility = %visibility,
        requester = ?requester.email(),
        "PUT RESOURCE"
    );

    let outcome = handle_write(
        state.database(),
        requester.email(),
        WriteRequest {
            bundle: &bundle,
            filename: &filename,
            visibility,
            content,
        },
    )
    .await?;

    Ok(outcome_response(outcome))
}

impl ApiRequest for PutRequest {
    type Response = CreatedResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = resource_url(base_url, &[&self.bundle, &self.filename]);
        let builder = client.put(full_url).json(&self.content);
        match self.access {
            Some(access) => builder.header(PUBLIC_ACCESS_HEADER, access.as_str()),
            None => builder,
        }
    }
}
