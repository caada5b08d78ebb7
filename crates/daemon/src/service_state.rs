use axum::extract::FromRef;
use url::Url;

use crate::auth::TokenTable;
use crate::database::{Database, DatabaseSetupError};
use crate::service_config::Config;

/// Shared state handed to every request handler
#[derive(Clone, Debug)]
pub struct State {
    database: Database,
    tokens: TokenTable,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        // 1. Setup database
        let sqlite_database_url = match config.sqlite_path {
            Some(ref path) => {
                // check that the path exists
                if !path.exists() {
                    return Err(StateSetupError::DatabasePathDoesNotExist);
                }
                // parse the path into a URL
                Url::parse(&format!("sqlite://{}", path.display()))
                    .map_err(|_| StateSetupError::InvalidDatabaseUrl)
            }
            // otherwise just set up an in-memory database
            None => Url::parse("sqlite::memory:").map_err(|_| StateSetupError::InvalidDatabaseUrl),
        }?;
        tracing::info!("Database URL: {:?}", sqlite_database_url);
        let database = Database::connect(&sqlite_database_url).await?;

        // 2. Setup token table
        let tokens = TokenTable::new(&config.tokens);
        if tokens.is_empty() {
            tracing::warn!("no API tokens configured, every request will be anonymous");
        } else {
            tracing::info!(count = tokens.len(), "loaded API tokens");
        }

        Ok(Self::new(database, tokens))
    }

    pub fn new(database: Database, tokens: TokenTable) -> Self {
        Self { database, tokens }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn tokens(&self) -> &TokenTable {
        &self.tokens
    }
}

impl FromRef<State> for TokenTable {
    fn from_ref(state: &State) -> Self {
        state.tokens.clone()
    }
}

impl FromRef<State> for Database {
    fn from_ref(state: &State) -> Self {
        state.database.clone()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("Database path does not exist")]
    DatabasePathDoesNotExist,
    #[error("Database setup error: {0}")]
    DatabaseSetupError(#[from] DatabaseSetupError),
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,
}
