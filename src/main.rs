//! MaxDoc service binary.
//!
//! Loads configuration, connects to PostgreSQL, wires the handlers, and
//! serves the document API.

use std::sync::Arc;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use maxdoc::adapters::http::document::{document_routes, DocumentHandlers};
use maxdoc::adapters::postgres::{PostgresDocumentReader, PostgresDocumentStore};
use maxdoc::application::handlers::document::{
    CreateDocumentHandler, EditDocumentHandler, GenerateVersionHandler, GetDocumentHandler,
    ListAcronymGroupsHandler, ListDocumentsHandler, SubmitDocumentHandler,
};
use maxdoc::config::AppConfig;
use maxdoc::ports::{DocumentReader, DocumentStore};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("maxdoc failed to start: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .idle_timeout(config.database.idle_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("running database migrations");
        sqlx::migrate!().run(&pool).await?;
    }

    let store: Arc<dyn DocumentStore> = Arc::new(PostgresDocumentStore::new(pool.clone()));
    let reader: Arc<dyn DocumentReader> = Arc::new(PostgresDocumentReader::new(pool));

    let handlers = DocumentHandlers::new(
        Arc::new(CreateDocumentHandler::new(store.clone())),
        Arc::new(EditDocumentHandler::new(store.clone())),
        Arc::new(SubmitDocumentHandler::new(store.clone())),
        Arc::new(GenerateVersionHandler::new(store.clone())),
        Arc::new(GetDocumentHandler::new(store)),
        Arc::new(ListDocumentsHandler::new(reader.clone())),
        Arc::new(ListAcronymGroupsHandler::new(reader)),
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api/documents", document_routes(handlers))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(config.server.request_timeout()))
                .layer(cors),
        );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "maxdoc listening");

    axum::serve(listener, app).await?;
    Ok(())
}
