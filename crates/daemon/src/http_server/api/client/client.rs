use reqwest::{header::HeaderMap, header::HeaderValue, Client};
use url::Url;

use super::error::ApiError;
use super::ApiRequest;

#[derive(Debug, Clone)]
pub struct ApiClient {
    pub remote: Url,
    client: Client,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(remote: &Url, token: Option<String>) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(default_headers).build()?;

        Ok(Self {
            remote: remote.clone(),
            client,
            token,
        })
    }

    pub async fn call<T: ApiRequest>(&self, request: T) -> Result<T::Response, ApiError> {
        let mut request_builder = request.build_request(&self.remote, &self.client);
        if let Some(token) = &self.token {
            request_builder = request_builder.bearer_auth(token);
        }
        let response = request_builder.send().await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.json::<T::Response>().await?)
        } else {
            Err(ApiError::rejected(status, &response.text().await?))
        }
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.remote
    }

    /// Get the underlying HTTP client for custom requests
    pub fn http_client(&self) -> &Client {
        &self.client
    }
}
