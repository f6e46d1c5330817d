//! Database connection pool management

use std::time::Duration;

use bookshelf_kernel::settings::DatabaseSettings;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::DbError;

/// Connection options built field by field, so credentials need no URL escaping.
pub fn connect_options(settings: &DatabaseSettings) -> PgConnectOptions {
    let options = PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.user)
        .database(&settings.name);

    if settings.password.is_empty() {
        options
    } else {
        options.password(&settings.password)
    }
}

/// Create a PostgreSQL connection pool from the database settings.
///
/// Connections are handed out per request and returned to the pool when the
/// borrowing transaction or connection guard is dropped.
pub async fn create_pool(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    tracing::info!(
        target: "bookshelf-db",
        url = %settings.connection_url(),
        max_connections = settings.max_connections,
        "connecting to postgres"
    );

    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .connect_with(connect_options(settings))
        .await
        .map_err(DbError::Connection)
}
