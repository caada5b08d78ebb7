use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // http server configuration
    /// Port for the API HTTP server
    pub api_port: u16,

    // data store configuration
    /// a path to a sqlite database, if not set then an
    ///  in-memory database will be used
    pub sqlite_path: Option<PathBuf>,

    // authentication
    /// bearer token -> email
    pub tokens: BTreeMap<String, String>,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_port: 5050,
            sqlite_path: None,
            tokens: BTreeMap::new(),
            log_level: tracing::Level::INFO,
            log_dir: None,
        }
    }
}
