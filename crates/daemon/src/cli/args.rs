pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "cubby")]
#[command(about = "Bundle resource store with owner and public visibility controls")]
pub struct Args {
    /// Daemon API URL (defaults to the api_port in config, then 5050)
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    /// Path to the cubby config directory (defaults to ~/.cubby)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Bearer token sent with API requests
    #[arg(long, global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: crate::Command,
}
