use axum::extract::{Path, State};
use axum::response::Response;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use common::prelude::handle_read;

use super::{outcome_response, resource_url, ResourceError};
use crate::auth::Requester;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct GetRequest {
    /// Bundle to read from
    pub bundle: String,
    /// Resource name within the bundle
    pub filename: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    requester: Requester,
    Path((bundle, filename)): Path<(String, String)>,
) -> Result<Response, ResourceError> {
    tracing::debug!(bundle = %bundle, filename = %filename, "GET RESOURCE");

    let outcome = handle_read(state.database(), requester.email(), &bundle, &filename).await?;
    Ok(outcome_response(outcome))
}

impl ApiRequest for GetRequest {
    type Response = Value;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        client.get(resource_url(base_url, &[&self.bundle, &self.filename]))
    }
}
