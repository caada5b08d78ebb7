use clap::Args;

use cubby_daemon::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Port for the API server
    #[arg(long)]
    pub api_port: Option<u16>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("state error: {0}")]
    StateError(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut config = AppConfig::default();
        if let Some(port) = self.api_port {
            config.api_port = port;
        }

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        Ok(format!(
            "Initialized cubby directory at {}\n  api_port: {}\n\nAdd bearer tokens under [tokens] in {}",
            state.cubby_dir.display(),
            state.config.api_port,
            state.config_path.display()
        ))
    }
}
