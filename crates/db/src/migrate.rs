//! Forward-only migration runner backed by a `schema_migrations` ledger.
//!
//! No rollbacks and no schema diffing. Migrations are idempotent DDL applied
//! at startup; the ledger only records which ones ran.

use bookshelf_kernel::Migration;
use sqlx::PgPool;

use crate::DbError;

const LEDGER_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS schema_migrations (
        module     TEXT        NOT NULL,
        id         TEXT        NOT NULL,
        applied_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (module, id)
    )
"#;

/// Apply every migration not yet recorded in the ledger.
///
/// Each migration runs in its own transaction together with its ledger row,
/// so a failed migration leaves neither schema changes nor a record behind.
/// Returns the number of migrations applied.
pub async fn run_migrations(
    pool: &PgPool,
    migrations: &[(String, Migration)],
) -> Result<usize, DbError> {
    sqlx::query(LEDGER_DDL).execute(pool).await?;

    let mut applied = 0;
    for (module, migration) in migrations {
        let mut tx = pool.begin().await?;

        let already_applied: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM schema_migrations WHERE module = $1 AND id = $2)",
        )
        .bind(module)
        .bind(migration.id)
        .fetch_one(&mut *tx)
        .await?;

        if already_applied {
            tracing::debug!(target: "bookshelf-db", %module, id = migration.id, "migration already applied");
            continue;
        }

        let failed = |source: sqlx::Error| DbError::Migration {
            module: module.clone(),
            id: migration.id,
            source,
        };

        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .map_err(failed)?;

        sqlx::query("INSERT INTO schema_migrations (module, id) VALUES ($1, $2)")
            .bind(module)
            .bind(migration.id)
            .execute(&mut *tx)
            .await
            .map_err(failed)?;

        tx.commit().await?;

        tracing::info!(target: "bookshelf-db", %module, id = migration.id, "migration applied");
        applied += 1;
    }

    Ok(applied)
}
