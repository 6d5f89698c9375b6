//! GetDocumentHandler - single-document lookup.

use std::sync::Arc;

use crate::domain::document::{Document, DocumentError};
use crate::domain::foundation::DocumentId;
use crate::ports::DocumentStore;

/// Query for one document by id.
#[derive(Debug, Clone, Copy)]
pub struct GetDocumentQuery {
    pub id: DocumentId,
}

/// Handler for fetching a single document.
pub struct GetDocumentHandler {
    store: Arc<dyn DocumentStore>,
}

impl GetDocumentHandler {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetDocumentQuery) -> Result<Document, DocumentError> {
        self.store
            .find_by_id(&query.id)
            .await?
            .ok_or(DocumentError::NotFound(query.id))
    }
}
