//! Postgres connection pool factory and migration runner.

pub mod error;
pub mod migrate;
pub mod pool;

pub use error::DbError;
pub use migrate::run_migrations;
pub use pool::{connect_options, create_pool};
