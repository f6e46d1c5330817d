//! HTTP routes for the Books module.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use bookshelf_http::{AppError, AppResult, JsonBody, PathId};

use super::models::{Book, BookCreate, BookUpdate, DeleteStatus};
use super::repository::{BookError, BookRepository};

/// Message carried by every 404 this module produces
pub const NOT_FOUND_MESSAGE: &str = "Book not found";

pub type SharedRepository = Arc<dyn BookRepository>;

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::NotFound(_) => AppError::not_found(NOT_FOUND_MESSAGE),
            BookError::Storage(e) => {
                AppError::Internal(anyhow::Error::new(e).context("book storage failure"))
            }
        }
    }
}

/// Book routes, relative to the API prefix.
///
/// List and create answer on both `/books` and `/books/`.
pub fn router(repository: SharedRepository) -> Router {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route("/books/", get(list_books).post(create_book))
        .route(
            "/books/{id}",
            get(read_book)
                .put(update_book)
                .patch(partial_update_book)
                .delete(delete_book),
        )
        .with_state(repository)
}

async fn list_books(State(repository): State<SharedRepository>) -> AppResult<Json<Vec<Book>>> {
    Ok(Json(repository.list().await?))
}

async fn read_book(
    State(repository): State<SharedRepository>,
    PathId(id): PathId,
) -> AppResult<Json<Book>> {
    Ok(Json(repository.get(id).await?))
}

async fn create_book(
    State(repository): State<SharedRepository>,
    JsonBody(input): JsonBody<BookCreate>,
) -> AppResult<Json<Book>> {
    let book = repository.create(input).await?;
    tracing::info!(book_id = book.id, "book created");
    Ok(Json(book))
}

async fn update_book(
    State(repository): State<SharedRepository>,
    PathId(id): PathId,
    JsonBody(input): JsonBody<BookCreate>,
) -> AppResult<Json<Book>> {
    let book = repository.update(id, input).await?;
    tracing::info!(book_id = id, "book replaced");
    Ok(Json(book))
}

async fn partial_update_book(
    State(repository): State<SharedRepository>,
    PathId(id): PathId,
    JsonBody(patch): JsonBody<BookUpdate>,
) -> AppResult<Json<Book>> {
    let book = repository.partial_update(id, patch).await?;
    tracing::info!(book_id = id, "book patched");
    Ok(Json(book))
}

async fn delete_book(
    State(repository): State<SharedRepository>,
    PathId(id): PathId,
) -> AppResult<Json<DeleteStatus>> {
    repository.delete(id).await?;
    tracing::info!(book_id = id, "book deleted");
    Ok(Json(DeleteStatus::deleted()))
}
