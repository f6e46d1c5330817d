use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("failed to connect to the database: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("migration '{module}/{id}' failed: {source}")]
    Migration {
        module: String,
        id: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}
