use clap::{Args, Subcommand};

pub mod get;
pub mod ls;
pub mod put;

use crate::cli::op::Op;
use cubby_daemon::http_server::api::resource::get::GetRequest;
use cubby_daemon::http_server::api::resource::list::ListRequest;
use cubby_daemon::http_server::api::resource::put::PutRequest;

crate::command_enum! {
    (Put, PutRequest),
    (Get, GetRequest),
    (Ls, ListRequest),
}

pub type ResourceCommand = Command;

/// Read and write resources on a running daemon
#[derive(Args, Debug, Clone)]
pub struct Resource {
    #[command(subcommand)]
    pub command: ResourceCommand,
}

#[async_trait::async_trait]
impl Op for Resource {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
