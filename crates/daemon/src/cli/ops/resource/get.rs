use cubby_daemon::http_server::api::client::ApiError;
use cubby_daemon::http_server::api::resource::get::GetRequest;

#[async_trait::async_trait]
impl crate::cli::op::Op for GetRequest {
    type Error = ApiError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let content = ctx.client.call(self.clone()).await?;
        Ok(serde_json::to_string_pretty(&content).unwrap_or_else(|_| content.to_string()))
    }
}
