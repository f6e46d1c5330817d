//! Wiring from settings to a running server.

use std::sync::Arc;

use anyhow::Context;
use bookshelf_kernel::{
    settings::{Settings, StorageBackend},
    InitCtx, ModuleRegistry,
};
use sqlx::PgPool;

use crate::modules::{
    self,
    books::repository::{BookRepository, InMemoryBookRepository, PgBookRepository},
};

/// Registered modules plus the pool backing them, if any.
pub struct App {
    pub registry: ModuleRegistry,
    pub pool: Option<PgPool>,
}

/// Build the storage backend selected in settings and register every module.
pub async fn build_app(settings: &Settings) -> anyhow::Result<App> {
    let (books, pool): (Arc<dyn BookRepository>, Option<PgPool>) = match settings.database.backend
    {
        StorageBackend::Postgres => {
            let pool = bookshelf_db::create_pool(&settings.database)
                .await
                .context("failed to create database pool")?;
            let books: Arc<dyn BookRepository> = Arc::new(PgBookRepository::new(pool.clone()));
            (books, Some(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory book storage; data is lost on shutdown");
            let books: Arc<dyn BookRepository> = Arc::new(InMemoryBookRepository::new());
            (books, None)
        }
    };

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, books);

    Ok(App { registry, pool })
}

/// Apply pending migrations. The in-memory backend has none to apply.
pub async fn migrate(app: &App) -> anyhow::Result<usize> {
    let Some(pool) = &app.pool else {
        tracing::info!("no database configured; skipping migrations");
        return Ok(0);
    };

    let migrations = app.registry.collect_migrations();
    let applied = bookshelf_db::run_migrations(pool, &migrations)
        .await
        .context("failed to run migrations")?;

    tracing::info!(applied, total = migrations.len(), "migrations complete");
    Ok(applied)
}

/// Run the full service lifecycle until shutdown.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let app = build_app(settings).await?;
    let ctx = InitCtx { settings };

    app.registry.init_modules(&ctx).await?;
    migrate(&app).await?;
    app.registry.start_modules(&ctx).await?;

    let served = bookshelf_http::start_server(&app.registry, settings).await;

    app.registry.stop_modules().await?;
    if let Some(pool) = app.pool {
        pool.close().await;
    }

    tracing::info!("bookshelf shutdown complete");
    served
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn memory_settings() -> Settings {
        let mut settings = Settings::default();
        settings.database.backend = StorageBackend::Memory;
        settings
    }

    #[tokio::test]
    async fn memory_backend_registers_books_without_migrations() {
        let app = build_app(&memory_settings()).await.unwrap();
        assert!(app.registry.get_module("books").is_some());
        assert!(app.pool.is_none());
        assert_eq!(migrate(&app).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn books_are_served_under_api_prefix() {
        let settings = memory_settings();
        let app = build_app(&settings).await.unwrap();
        let router = bookshelf_http::build_router(&app.registry, &settings);

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/books/")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({
                            "title": "Dune",
                            "author": "Frank Herbert",
                            "year": 1965,
                            "genre": "Science fiction",
                            "description": "Spice"
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/books/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let books: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(books.as_array().unwrap().len(), 1);
        assert_eq!(books[0]["id"], 1);
    }

    #[tokio::test]
    async fn openapi_lists_prefixed_book_paths() {
        let settings = memory_settings();
        let app = build_app(&settings).await.unwrap();
        let spec = bookshelf_http::router::merged_openapi(&app.registry, &settings.server.api_prefix);

        assert!(spec["paths"]["/api/v1/books/"]["post"].is_object());
        assert!(spec["paths"]["/api/v1/books/{id}"]["patch"].is_object());
    }

    #[tokio::test]
    async fn openapi_document_parses_for_swagger_ui() {
        let settings = memory_settings();
        let app = build_app(&settings).await.unwrap();
        let spec = bookshelf_http::router::merged_openapi(&app.registry, &settings.server.api_prefix);

        let document: utoipa::openapi::OpenApi = serde_json::from_value(spec).unwrap();
        assert!(document.paths.paths.contains_key("/api/v1/books/{id}"));
        assert!(document.paths.paths.contains_key("/api/v1/books/"));
    }
}
