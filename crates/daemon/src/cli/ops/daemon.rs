use clap::Args;

use cubby_daemon::state::AppState;
use cubby_daemon::{spawn_service, ServiceConfig};

#[derive(Args, Debug, Clone)]
pub struct Daemon {
    /// Override API server port (default from config)
    #[arg(long)]
    pub api_port: Option<u16>,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<std::path::PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("state error: {0}")]
    StateError(#[from] cubby_daemon::state::StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Daemon {
    type Error = DaemonError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        // Load state from config path (or default ~/.cubby)
        let state = AppState::load(ctx.config_path.clone())?;

        let config = ServiceConfig {
            api_port: self.api_port.unwrap_or(state.config.api_port),
            sqlite_path: Some(state.db_path),
            tokens: state.config.tokens,
            log_level: tracing::Level::INFO,
            log_dir: self.log_dir.clone(),
        };

        spawn_service(&config).await;
        Ok("daemon ended".to_string())
    }
}
