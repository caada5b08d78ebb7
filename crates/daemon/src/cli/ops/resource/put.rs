use cubby_daemon::http_server::api::client::ApiError;
use cubby_daemon::http_server::api::resource::put::PutRequest;

#[async_trait::async_trait]
impl crate::cli::op::Op for PutRequest {
    type Error = ApiError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let response = ctx.client.call(self.clone()).await?;
        Ok(format!("{}: {}/{}", response.status, self.bundle, self.filename))
    }
}
