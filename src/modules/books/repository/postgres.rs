use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::{BookError, BookRepository, BookResult};
use crate::modules::books::models::{Book, BookCreate, BookUpdate};

const BOOK_COLUMNS: &str = "id, title, author, year, genre, description";

/// Postgres-backed book store.
///
/// Reads borrow a pooled connection for the duration of one call; writes run
/// inside a transaction that commits on success. An early return drops the
/// guard, which rolls back and hands the connection back to the pool.
#[derive(Debug, Clone)]
pub struct PgBookRepository {
    pool: PgPool,
}

impl PgBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn book_from_row(row: &PgRow) -> Result<Book, sqlx::Error> {
    Ok(Book {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        year: row.try_get("year")?,
        genre: row.try_get("genre")?,
        description: row.try_get("description")?,
    })
}

#[async_trait::async_trait]
impl BookRepository for PgBookRepository {
    async fn list(&self) -> BookResult<Vec<Book>> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query(&format!(
            "SELECT {BOOK_COLUMNS} FROM books ORDER BY author ASC, id ASC"
        ))
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows
            .iter()
            .map(book_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn get(&self, id: i64) -> BookResult<Book> {
        let mut conn = self.pool.acquire().await?;

        let row = sqlx::query(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(BookError::NotFound(id))?;

        Ok(book_from_row(&row)?)
    }

    async fn create(&self, input: BookCreate) -> BookResult<Book> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!(
            "INSERT INTO books (title, author, year, genre, description) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(&input.title)
        .bind(&input.author)
        .bind(input.year)
        .bind(&input.genre)
        .bind(&input.description)
        .fetch_one(&mut *tx)
        .await?;
        let book = book_from_row(&row)?;

        tx.commit().await?;

        tracing::debug!(book_id = book.id, "book created");
        Ok(book)
    }

    async fn partial_update(&self, id: i64, patch: BookUpdate) -> BookResult<Book> {
        let mut tx = self.pool.begin().await?;

        // NULL parameters keep the stored value
        let row = sqlx::query(&format!(
            "UPDATE books SET \
                title = COALESCE($2, title), \
                author = COALESCE($3, author), \
                year = COALESCE($4, year), \
                genre = COALESCE($5, genre), \
                description = COALESCE($6, description) \
             WHERE id = $1 \
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.author)
        .bind(patch.year)
        .bind(patch.genre)
        .bind(patch.description)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(BookError::NotFound(id))?;
        let book = book_from_row(&row)?;

        tx.commit().await?;

        tracing::debug!(book_id = id, "book updated");
        Ok(book)
    }

    async fn delete(&self, id: i64) -> BookResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(BookError::NotFound(id));
        }

        tx.commit().await?;

        tracing::debug!(book_id = id, "book deleted");
        Ok(())
    }
}
