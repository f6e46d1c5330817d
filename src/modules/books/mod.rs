pub mod models;
pub mod repository;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Migration, Module};
use serde_json::{json, Value};

use repository::BookRepository;
use routes::SharedRepository;

/// Book catalog: CRUD routes over a [`BookRepository`]
pub struct BooksModule {
    repository: SharedRepository,
}

impl BooksModule {
    pub fn new(repository: SharedRepository) -> Self {
        Self { repository }
    }
}

/// Schema for the `books` table.
pub fn schema_migrations() -> Vec<Migration> {
    vec![
        Migration {
            id: "001_create_books",
            up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    id          BIGSERIAL PRIMARY KEY,
                    title       TEXT    NOT NULL,
                    author      TEXT    NOT NULL,
                    year        INTEGER NOT NULL,
                    genre       TEXT    NOT NULL,
                    description TEXT    NOT NULL
                );
                "#,
        },
        Migration {
            id: "002_books_author_index",
            up: "CREATE INDEX IF NOT EXISTS books_author_idx ON books (author);",
        },
    ]
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            backend = ?ctx.settings.database.backend,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.repository.clone())
    }

    fn openapi(&self) -> Option<Value> {
        Some(openapi_fragment())
    }

    fn migrations(&self) -> Vec<Migration> {
        schema_migrations()
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{}", name) })
}

fn json_response(description: &str, schema: Value) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": schema } }
    })
}

fn json_body(schema: &str) -> Value {
    json!({
        "required": true,
        "content": { "application/json": { "schema": schema_ref(schema) } }
    })
}

fn not_found() -> Value {
    json_response("Book not found", schema_ref("ErrorResponse"))
}

fn unprocessable() -> Value {
    json_response("Malformed input", schema_ref("ErrorResponse"))
}

fn id_parameter() -> Value {
    json!([{
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64" }
    }])
}

fn book_fields() -> Value {
    let text = |description: &str| json!({ "type": "string", "description": description });
    json!({
        "title": text("Title of the book"),
        "author": text("Author of the book"),
        "year": { "type": "integer", "format": "int32", "description": "Publication year" },
        "genre": text("Genre of the book"),
        "description": text("Free-form description")
    })
}

fn openapi_fragment() -> Value {
    let collection = json!({
        "get": {
            "summary": "List books ordered by author",
            "tags": ["Books"],
            "responses": {
                "200": json_response("All books", json!({ "type": "array", "items": schema_ref("Book") }))
            }
        },
        "post": {
            "summary": "Create a book",
            "tags": ["Books"],
            "requestBody": json_body("BookCreate"),
            "responses": {
                "200": json_response("Created book", schema_ref("Book")),
                "422": unprocessable()
            }
        }
    });

    let mut book = book_fields();
    book["id"] = json!({ "type": "integer", "format": "int64", "description": "Storage-assigned identifier" });

    json!({
        "paths": {
            "/books/": collection,
            "/books/{id}": {
                "parameters": id_parameter(),
                "get": {
                    "summary": "Get a book",
                    "tags": ["Books"],
                    "responses": {
                        "200": json_response("The book", schema_ref("Book")),
                        "404": not_found(),
                        "422": unprocessable()
                    }
                },
                "put": {
                    "summary": "Replace every field of a book",
                    "tags": ["Books"],
                    "requestBody": json_body("BookCreate"),
                    "responses": {
                        "200": json_response("Updated book", schema_ref("Book")),
                        "404": not_found(),
                        "422": unprocessable()
                    }
                },
                "patch": {
                    "summary": "Update only the given fields of a book",
                    "tags": ["Books"],
                    "requestBody": json_body("BookUpdate"),
                    "responses": {
                        "200": json_response("Updated book", schema_ref("Book")),
                        "404": not_found(),
                        "422": unprocessable()
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "responses": {
                        "200": json_response("Deletion status", schema_ref("DeleteStatus")),
                        "404": not_found(),
                        "422": unprocessable()
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": book,
                    "required": ["id", "title", "author", "year", "genre", "description"]
                },
                "BookCreate": {
                    "type": "object",
                    "properties": book_fields(),
                    "required": ["title", "author", "year", "genre", "description"]
                },
                "BookUpdate": {
                    "type": "object",
                    "description": "Omitted or null fields keep their stored value",
                    "properties": book_fields()
                },
                "DeleteStatus": {
                    "type": "object",
                    "properties": {
                        "status": { "type": "string" },
                        "message": { "type": "string" }
                    },
                    "required": ["status", "message"]
                }
            }
        }
    })
}

/// Create a new instance of the books module over the given store
pub fn create_module(repository: Arc<dyn BookRepository>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(repository))
}
