use axum::extract::{Path, State};
use axum::response::Response;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use common::prelude::handle_list_read;

use super::{outcome_response, resource_url, ListResponse, ResourceError};
use crate::auth::Requester;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct ListRequest {
    /// Bundle to list
    pub bundle: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    requester: Requester,
    Path(bundle): Path<String>,
) -> Result<Response, ResourceError> {
    tracing::debug!(bundle = %bundle, "LIST BUNDLE");

    let outcome = handle_list_read(state.database(), requester.email(), &bundle).await?;
    Ok(outcome_response(outcome))
}

impl ApiRequest for ListRequest {
    type Response = ListResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        client.get(resource_url(base_url, &[&self.bundle]))
    }
}
