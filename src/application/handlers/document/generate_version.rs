//! GenerateVersionHandler - derives a new DRAFT from an ACTIVE document.
//!
//! The new draft copies title/description/acronym from the source and takes
//! `max(version in family) + 1`. The computation and the insert run in one
//! family transaction so two concurrent calls cannot both claim the same
//! version number.

use std::sync::Arc;

use crate::domain::document::{Document, DocumentError};
use crate::domain::foundation::DocumentId;
use crate::ports::DocumentStore;

/// Command to generate the next version of a document.
#[derive(Debug, Clone, Copy)]
pub struct GenerateVersionCommand {
    pub id: DocumentId,
}

/// Handler for generating new document versions.
///
/// The source document is never mutated; it stays ACTIVE until the new
/// draft is submitted. Multiple open drafts per family are permitted.
pub struct GenerateVersionHandler {
    store: Arc<dyn DocumentStore>,
}

impl GenerateVersionHandler {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: GenerateVersionCommand) -> Result<Document, DocumentError> {
        let source = self
            .store
            .find_by_id(&cmd.id)
            .await?
            .ok_or(DocumentError::NotFound(cmd.id))?;

        if !source.phase().is_active() {
            return Err(DocumentError::invalid_phase(
                "Only ACTIVE documents may generate a new version",
            ));
        }

        let mut tx = self.store.begin_family(source.acronym()).await?;
        let family = tx.documents().await?;

        // Re-read the source under the family lock; a concurrent submit may
        // have superseded it since the check above.
        let source = family
            .iter()
            .find(|d| d.id() == &cmd.id)
            .cloned()
            .ok_or(DocumentError::NotFound(cmd.id))?;

        let max_version = family
            .iter()
            .map(Document::version)
            .max()
            .ok_or_else(|| DocumentError::empty_family(source.acronym()))?;

        let draft = source.derive_draft(max_version + 1)?;
        let stored = tx.insert(draft).await?;
        tx.commit().await?;

        tracing::info!(
            id = %stored.id(),
            source = %cmd.id,
            acronym = %stored.acronym(),
            version = stored.version(),
            "new document version generated"
        );
        Ok(stored)
    }
}
