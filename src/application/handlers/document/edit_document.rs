//! EditDocumentHandler - Command handler for editing draft documents.

use std::sync::Arc;

use crate::domain::document::{Document, DocumentError};
use crate::domain::foundation::DocumentId;
use crate::ports::DocumentStore;

/// Command to replace a document's title and description.
#[derive(Debug, Clone)]
pub struct EditDocumentCommand {
    pub id: DocumentId,
    pub title: String,
    pub description: String,
}

/// Handler for editing documents.
///
/// Only DRAFT documents may be edited; everything except title and
/// description is left untouched.
pub struct EditDocumentHandler {
    store: Arc<dyn DocumentStore>,
}

impl EditDocumentHandler {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: EditDocumentCommand) -> Result<Document, DocumentError> {
        let mut document = self
            .store
            .find_by_id(&cmd.id)
            .await?
            .ok_or(DocumentError::NotFound(cmd.id))?;

        document.edit_info(cmd.title, cmd.description)?;
        let stored = self.store.update(&document).await?;

        tracing::info!(id = %stored.id(), acronym = %stored.acronym(), "document edited");
        Ok(stored)
    }
}
