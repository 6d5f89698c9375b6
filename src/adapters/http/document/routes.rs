//! HTTP routes for document endpoints.

use axum::{
    routing::{get, patch, post},
    Router,
};

use super::handlers::{
    create_document, edit_document, generate_version, get_document, list_acronym_groups,
    list_documents, submit_document, DocumentHandlers,
};

/// Creates the document router with all endpoints.
pub fn document_routes(handlers: DocumentHandlers) -> Router {
    Router::new()
        .route("/", get(list_documents).post(create_document))
        .route("/by-acronym", get(list_acronym_groups))
        .route("/:id", get(get_document).patch(edit_document))
        .route("/:id/submit", patch(submit_document))
        .route("/:id/generate-version", post(generate_version))
        .with_state(handlers)
}
