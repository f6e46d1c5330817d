use std::collections::BTreeMap;

use tokio::sync::RwLock;

use super::{BookError, BookRepository, BookResult};
use crate::modules::books::models::{Book, BookCreate, BookUpdate};

#[derive(Default)]
struct Shelf {
    books: BTreeMap<i64, Book>,
    last_id: i64,
}

/// Process-local book store.
///
/// Ids come from a counter that only moves forward, so a deleted id is never
/// handed out again.
#[derive(Default)]
pub struct InMemoryBookRepository {
    shelf: RwLock<Shelf>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn list(&self) -> BookResult<Vec<Book>> {
        let shelf = self.shelf.read().await;
        let mut books: Vec<Book> = shelf.books.values().cloned().collect();
        // Stable sort keeps id order among books by the same author
        books.sort_by(|a, b| a.author.cmp(&b.author));
        Ok(books)
    }

    async fn get(&self, id: i64) -> BookResult<Book> {
        let shelf = self.shelf.read().await;
        shelf.books.get(&id).cloned().ok_or(BookError::NotFound(id))
    }

    async fn create(&self, input: BookCreate) -> BookResult<Book> {
        let mut shelf = self.shelf.write().await;
        shelf.last_id += 1;
        let book = input.into_book(shelf.last_id);
        shelf.books.insert(book.id, book.clone());
        tracing::debug!(book_id = book.id, "book created in memory");
        Ok(book)
    }

    async fn partial_update(&self, id: i64, patch: BookUpdate) -> BookResult<Book> {
        let mut shelf = self.shelf.write().await;
        let book = shelf.books.get_mut(&id).ok_or(BookError::NotFound(id))?;
        patch.apply(book);
        Ok(book.clone())
    }

    async fn delete(&self, id: i64) -> BookResult<()> {
        let mut shelf = self.shelf.write().await;
        shelf
            .books
            .remove(&id)
            .map(|_| ())
            .ok_or(BookError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str, author: &str) -> BookCreate {
        BookCreate {
            title: title.to_string(),
            author: author.to_string(),
            year: 2000,
            genre: "G".to_string(),
            description: "D".to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let repo = InMemoryBookRepository::new();
        let created = repo.create(book("A", "B")).await.unwrap();
        let fetched = repo.get(created.id).await.unwrap();
        assert_eq!(created, fetched);
        assert_eq!(fetched, book("A", "B").into_book(created.id));
    }

    #[tokio::test]
    async fn list_orders_by_author() {
        let repo = InMemoryBookRepository::new();
        for author in ["Zed", "Amy", "Mona"] {
            repo.create(book("T", author)).await.unwrap();
        }

        let authors: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.author)
            .collect();
        assert_eq!(authors, vec!["Amy", "Mona", "Zed"]);
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let repo = InMemoryBookRepository::new();
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_id_is_not_found_for_every_operation() {
        let repo = InMemoryBookRepository::new();
        assert!(matches!(repo.get(9).await, Err(BookError::NotFound(9))));
        assert!(matches!(
            repo.update(9, book("A", "B")).await,
            Err(BookError::NotFound(9))
        ));
        assert!(matches!(
            repo.partial_update(9, BookUpdate::default()).await,
            Err(BookError::NotFound(9))
        ));
        assert!(matches!(repo.delete(9).await, Err(BookError::NotFound(9))));
    }

    #[tokio::test]
    async fn full_update_overwrites_every_field() {
        let repo = InMemoryBookRepository::new();
        let created = repo.create(book("A", "B")).await.unwrap();
        let replacement = BookCreate {
            title: "A".to_string(),
            author: "C".to_string(),
            year: 1999,
            genre: "H".to_string(),
            description: "E".to_string(),
        };

        let updated = repo.update(created.id, replacement.clone()).await.unwrap();
        assert_eq!(updated, replacement.into_book(created.id));
        assert_eq!(repo.get(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let repo = InMemoryBookRepository::new();
        let first = repo.create(book("A", "B")).await.unwrap();
        repo.delete(first.id).await.unwrap();

        assert!(matches!(
            repo.get(first.id).await,
            Err(BookError::NotFound(_))
        ));
        let second = repo.create(book("A", "B")).await.unwrap();
        assert_ne!(first.id, second.id);
    }
}
