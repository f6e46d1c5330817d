//! Data access for books: the [`BookRepository`] contract and its backends.

mod memory;
mod postgres;

pub use memory::InMemoryBookRepository;
pub use postgres::PgBookRepository;

use super::models::{Book, BookCreate, BookUpdate};

#[derive(thiserror::Error, Debug)]
pub enum BookError {
    #[error("book {0} not found")]
    NotFound(i64),

    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type BookResult<T> = Result<T, BookError>;

/// Entity operations over the book store.
///
/// Every mutating call commits before it returns and hands back the row as
/// persisted, not an echo of the input.
#[async_trait::async_trait]
pub trait BookRepository: Send + Sync {
    /// All books ordered by author ascending
    async fn list(&self) -> BookResult<Vec<Book>>;

    async fn get(&self, id: i64) -> BookResult<Book>;

    /// Insert a new book; the store assigns its id
    async fn create(&self, input: BookCreate) -> BookResult<Book>;

    /// Merge the present fields of `patch` into an existing book
    async fn partial_update(&self, id: i64, patch: BookUpdate) -> BookResult<Book>;

    /// Remove a book permanently
    async fn delete(&self, id: i64) -> BookResult<()>;

    /// Overwrite every field of an existing book
    async fn update(&self, id: i64, input: BookCreate) -> BookResult<Book> {
        self.partial_update(id, BookUpdate::from(input)).await
    }
}
