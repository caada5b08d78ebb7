use cubby_daemon::http_server::api::client::ApiError;
use cubby_daemon::http_server::api::resource::list::ListRequest;

#[async_trait::async_trait]
impl crate::cli::op::Op for ListRequest {
    type Error = ApiError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let entries = ctx.client.call(self.clone()).await?;

        let output = entries
            .iter()
            .flat_map(|entry| entry.iter())
            .map(|(filename, content)| format!("{}\t{}", filename, content))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(output)
    }
}
