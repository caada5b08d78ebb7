use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use url::Url;

use super::DatabaseSetupError;

const MAX_CONNECTIONS: u32 = 5;

pub async fn connect_sqlite(url: &Url) -> Result<SqlitePool, DatabaseSetupError> {
    let options = SqliteConnectOptions::from_str(url.as_str())
        .map_err(DatabaseSetupError::Unavailable)?
        .create_if_missing(true);

    // Every connection to `:memory:` is its own database, so pin the pool
    //  to a single connection that is never recycled
    let pool = if url.as_str().contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
    } else {
        SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options.journal_mode(SqliteJournalMode::Wal))
            .await
    }
    .map_err(DatabaseSetupError::Unavailable)?;

    tracing::debug!(url = %url, "connected to sqlite");
    Ok(pool)
}

pub async fn migrate_sqlite(pool: &SqlitePool) -> Result<(), DatabaseSetupError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(DatabaseSetupError::MigrationFailed)
}
